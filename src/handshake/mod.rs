//! Request/ready handshake between the host and the coprocessor.
//!
//! Every control cell has a single writer. The two port types only expose the
//! stores their side owns, so the rule is enforced by the type system rather
//! than by convention:
//!
//! * the host stores inputs and counters, then the request ticket (release);
//! * the coprocessor loads the request (acquire), runs one pass into the back
//!   buffer, then stores the ready ticket (release);
//! * the host loads ready (acquire) and, when the ticket matches and new data
//!   was published, flips the buffer designation.
//!
//! A ready ticket that does not match the pending request is stale and ignored.

pub mod control_block;
pub mod ticket;

use log::trace;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::buffers::{DoubleBuffer, Frame};
use crate::consts::{
    COPROC_READY_ADDR, HOST_REQUEST_ADDR, INPT4_ADDR, INPT5_ADDR, MODE_ADDR, OS_TIME_ADDR,
    RUN_FUNC_ADDR, SWCHA_ADDR, SWCHB_ADDR, VB_TIME_ADDR,
};
use crate::input::InputState;

pub use control_block::ControlBlock;
pub use ticket::{Phase, Ready, Request, Ticket, TICKET_PERIOD};

fn counter_addr(phase: Phase) -> u16 {
    match phase {
        Phase::Blank => VB_TIME_ADDR,
        Phase::Visible => OS_TIME_ADDR,
    }
}

/// Creates the two ends of a link over the same control block and frames.
#[must_use]
pub fn split(block: ControlBlock, frames: Arc<DoubleBuffer<Frame>>) -> (HostPort, CoprocPort) {
    (
        HostPort {
            block: block.clone(),
            frames: frames.clone(),
        },
        CoprocPort { block, frames },
    )
}

pub struct HostPort {
    block: ControlBlock,
    frames: Arc<DoubleBuffer<Frame>>,
}

impl HostPort {
    pub fn write_input(&self, input: &InputState) {
        self.block.store(SWCHA_ADDR, input.swcha, Ordering::Relaxed);
        self.block.store(SWCHB_ADDR, input.swchb, Ordering::Relaxed);
        self.block.store(INPT4_ADDR, input.inpt4, Ordering::Relaxed);
        self.block.store(INPT5_ADDR, input.inpt5, Ordering::Relaxed);
    }

    /// Bumps the counter of `phase`, wrapping at 256. Returns the new value.
    pub fn advance_counter(&self, phase: Phase) -> u8 {
        let addr = counter_addr(phase);
        let v = self.block.load(addr, Ordering::Relaxed).wrapping_add(1);
        self.block.store(addr, v, Ordering::Relaxed);
        v
    }

    pub fn raise_request(&self, ticket: Ticket) {
        trace!("host > request 0x{:02x} {:?}", ticket.bits(), ticket.phase());
        self.block
            .store(HOST_REQUEST_ADDR, Request::Pending(ticket).into(), Ordering::Release);
    }

    pub fn withdraw_request(&self) {
        trace!("host > request idle");
        self.block
            .store(HOST_REQUEST_ADDR, Request::Idle.into(), Ordering::Release);
    }

    #[must_use]
    pub fn ready(&self) -> Ready {
        self.block.load(COPROC_READY_ADDR, Ordering::Acquire).into()
    }

    /// Only call after a matching `Ready::Done` with `published` set.
    pub fn flip(&self) -> usize {
        self.frames.flip()
    }

    pub fn read_front<R>(&self, f: impl FnOnce(&Frame) -> R) -> R {
        self.frames.read_front(f)
    }

    #[must_use]
    pub fn front_index(&self) -> usize {
        self.frames.front_index()
    }

    #[must_use]
    pub fn control_block(&self) -> &ControlBlock {
        &self.block
    }
}

pub struct CoprocPort {
    block: ControlBlock,
    frames: Arc<DoubleBuffer<Frame>>,
}

impl CoprocPort {
    #[must_use]
    pub fn request(&self) -> Request {
        self.block.load(HOST_REQUEST_ADDR, Ordering::Acquire).into()
    }

    #[must_use]
    pub fn ready(&self) -> Ready {
        self.block.load(COPROC_READY_ADDR, Ordering::Relaxed).into()
    }

    pub fn clear_ready(&self) {
        self.block
            .store(COPROC_READY_ADDR, Ready::Idle.into(), Ordering::Release);
    }

    pub fn raise_ready(&self, ticket: Ticket, published: bool) {
        let v: u8 = Ready::Done { ticket, published }.into();
        trace!("coproc > ready 0x{v:02x}");
        self.block.store(COPROC_READY_ADDR, v, Ordering::Release);
    }

    /// Inputs as stored by the host before its last request.
    #[must_use]
    pub fn input(&self) -> InputState {
        InputState {
            swcha: self.block.load(SWCHA_ADDR, Ordering::Relaxed),
            swchb: self.block.load(SWCHB_ADDR, Ordering::Relaxed),
            inpt4: self.block.load(INPT4_ADDR, Ordering::Relaxed),
            inpt5: self.block.load(INPT5_ADDR, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn counter(&self, phase: Phase) -> u8 {
        self.block.load(counter_addr(phase), Ordering::Relaxed)
    }

    #[must_use]
    pub fn mode_byte(&self) -> u8 {
        self.block.load(MODE_ADDR, Ordering::Relaxed)
    }

    pub fn set_mode_byte(&self, v: u8) {
        self.block.store(MODE_ADDR, v, Ordering::Relaxed);
    }

    pub fn set_run_func(&self, code: u8) {
        self.block.store(RUN_FUNC_ADDR, code, Ordering::Relaxed);
    }

    pub fn write_back<R>(&self, f: impl FnOnce(&mut Frame) -> R) -> R {
        self.frames.write_back(f)
    }

    pub fn write_both(&self, f: impl Fn(&mut Frame)) {
        self.frames.write_both(f);
    }

    #[must_use]
    pub fn control_block(&self) -> &ControlBlock {
        &self.block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> (HostPort, CoprocPort) {
        split(ControlBlock::new(), Arc::new(DoubleBuffer::default()))
    }

    #[test]
    fn request_and_ready_round_trip() {
        let (host, coproc) = link();
        assert_eq!(coproc.request(), Request::Idle);
        assert_eq!(host.ready(), Ready::Idle);

        let t = Ticket::new(1, Phase::Blank);
        host.raise_request(t);
        assert_eq!(coproc.request(), Request::Pending(t));

        coproc.raise_ready(t, true);
        assert_eq!(host.ready(), Ready::Done { ticket: t, published: true });

        host.withdraw_request();
        assert_eq!(coproc.request(), Request::Idle);
        coproc.clear_ready();
        assert_eq!(host.ready(), Ready::Idle);
    }

    #[test]
    fn inputs_reach_the_coprocessor() {
        let (host, coproc) = link();
        assert_eq!(coproc.input(), InputState::idle());
        let i = InputState {
            swcha: 0x7f,
            swchb: 0x0a,
            inpt4: 0x00,
            inpt5: 0x80,
        };
        host.write_input(&i);
        host.raise_request(Ticket::new(2, Phase::Blank));
        assert_eq!(coproc.input(), i);
    }

    #[test]
    fn counters_wrap_at_byte_width() {
        let (host, coproc) = link();
        for n in 1..=600u32 {
            host.advance_counter(Phase::Visible);
            if n % 2 == 0 {
                host.advance_counter(Phase::Blank);
            }
            assert_eq!(u32::from(coproc.counter(Phase::Visible)), n % 256);
            assert_eq!(u32::from(coproc.counter(Phase::Blank)), (n / 2) % 256);
        }
    }
}
