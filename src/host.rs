use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::buffers::Frame;
use crate::config::Config;
use crate::consts::{CONTROL_BLOCK_LEN, RUN_FUNC_ADDR};
use crate::dispatch::Routine;
use crate::handshake::{HostPort, Phase, Ready, Ticket};
#[cfg(feature = "image_shared_memory")]
use crate::image_export::ImageExport;
use crate::input::InputState;
use crate::shared_memory::SharedMemory;
use crate::timing::PhaseBudget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// New data was published and the front was flipped.
    Swapped,
    /// The pass finished without writing, front kept.
    Unchanged,
    /// No ready in time, the stale front is drawn again.
    TimedOut,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStats {
    pub frames: u64,
    pub phases: u64,
    pub swaps: u64,
    pub unchanged: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub blank: PhaseOutcome,
    pub visible: PhaseOutcome,
}

/// Host side of the link: raises one request per phase, waits for the
/// matching ready within the phase budget and flips the frames.
pub struct Host {
    port: HostPort,
    budget: PhaseBudget,
    pace: bool,
    seq: u8,
    pending: Option<Ticket>,
    input: InputState,
    stats: HostStats,
    #[cfg(feature = "external_input")]
    input_rx: Option<kanal::Receiver<InputState>>,
    #[cfg(feature = "image_shared_memory")]
    export: Option<ImageExport>,
}

fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if deadline > now {
        std::thread::sleep(deadline - now);
    }
}

impl Host {
    #[must_use]
    pub fn new(port: HostPort, config: &Config) -> Self {
        Self {
            port,
            budget: config.phase_budget(),
            pace: true,
            seq: 0,
            pending: None,
            input: InputState::idle(),
            stats: HostStats::default(),
            #[cfg(feature = "external_input")]
            input_rx: None,
            #[cfg(feature = "image_shared_memory")]
            export: None,
        }
    }

    /// Inputs written at the start of every following phase.
    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[cfg(feature = "external_input")]
    pub fn set_input_channel(&mut self, rx: kanal::Receiver<InputState>) {
        self.input_rx = Some(rx);
    }

    #[cfg(feature = "image_shared_memory")]
    pub fn set_image_export(&mut self, export: ImageExport) {
        self.export = Some(export);
    }

    /// When off, `run_frame` returns as soon as both phases resolved instead
    /// of sleeping until the end of each phase.
    pub fn set_pacing(&mut self, pace: bool) {
        self.pace = pace;
    }

    #[must_use]
    pub fn budget(&self) -> PhaseBudget {
        self.budget
    }

    /// Advances the phase counter, publishes inputs and raises a new request.
    pub fn begin_phase(&mut self, phase: Phase) -> Ticket {
        if self.pending.is_some() {
            self.expire();
        }
        #[cfg(feature = "external_input")]
        if let Some(rx) = &self.input_rx {
            while let Some(input) = rx.try_recv().unwrap_or_default() {
                self.input = input;
            }
        }
        self.port.advance_counter(phase);
        self.port.write_input(&self.input);
        self.seq = Ticket::next_seq(self.seq);
        let ticket = Ticket::new(self.seq, phase);
        self.port.raise_request(ticket);
        self.pending = Some(ticket);
        self.stats.phases += 1;
        ticket
    }

    /// Checks the ready cell once. Returns the outcome when the pending
    /// request was answered, `None` while still waiting.
    pub fn poll(&mut self) -> Option<PhaseOutcome> {
        let pending = self.pending?;
        match self.port.ready() {
            Ready::Done { ticket, published } if ticket == pending => {
                let outcome = if published {
                    let front = self.port.flip();
                    trace!("host: ticket {} swapped, front #{front}", ticket.seq());
                    self.stats.swaps += 1;
                    #[cfg(feature = "image_shared_memory")]
                    if self.export.is_some() {
                        let image = self.image();
                        if let Some(export) = &mut self.export {
                            export.publish(&image);
                        }
                    }
                    PhaseOutcome::Swapped
                } else {
                    self.stats.unchanged += 1;
                    PhaseOutcome::Unchanged
                };
                self.port.withdraw_request();
                self.pending = None;
                Some(outcome)
            }
            Ready::Done { ticket, .. } => {
                trace!("host: stale ready {}, waiting for {}", ticket.seq(), pending.seq());
                None
            }
            Ready::Idle => None,
        }
    }

    /// Gives up on the pending request and keeps the current front.
    pub fn expire(&mut self) -> PhaseOutcome {
        if let Some(t) = self.pending.take() {
            debug!("host: ticket {} {:?} timed out", t.seq(), t.phase());
            self.port.withdraw_request();
            self.stats.timeouts += 1;
        }
        PhaseOutcome::TimedOut
    }

    /// Busy-waits for the pending request until `deadline`.
    pub fn wait(&mut self, deadline: Instant) -> PhaseOutcome {
        let mut spins = 0u32;
        loop {
            if let Some(outcome) = self.poll() {
                return outcome;
            }
            if Instant::now() >= deadline {
                return self.expire();
            }
            spins = spins.saturating_add(1);
            if spins < 64 {
                std::hint::spin_loop();
            } else {
                std::thread::yield_now();
            }
        }
    }

    /// One television frame: blank phase, then the visible phase during
    /// which `draw` reads the front frame.
    pub fn run_frame(&mut self, draw: impl FnOnce(&Frame)) -> FrameReport {
        let start = Instant::now();
        let blank_end = start + self.budget.blank;
        let frame_end = start + self.budget.frame();

        self.begin_phase(Phase::Blank);
        let blank = self.wait(blank_end);
        if self.pace {
            sleep_until(blank_end);
        }

        self.begin_phase(Phase::Visible);
        self.port.read_front(draw);
        let visible = self.wait(frame_end);
        if self.pace {
            sleep_until(frame_end);
        }

        self.finish_frame();
        FrameReport { blank, visible }
    }

    pub(crate) fn finish_frame(&mut self) {
        self.stats.frames += 1;
    }

    pub fn read_front<R>(&self, f: impl FnOnce(&Frame) -> R) -> R {
        self.port.read_front(f)
    }

    #[must_use]
    pub fn front_index(&self) -> usize {
        self.port.front_index()
    }

    /// The display data image as the 6507 kernel would see it.
    #[must_use]
    pub fn image(&self) -> SharedMemory {
        let mut image = SharedMemory::default();
        image.copy(0, &self.port.control_block().snapshot()[..CONTROL_BLOCK_LEN]);
        self.port.read_front(|f| f.write_image(&mut image));
        image
    }

    /// Routine the coprocessor last announced in RUN_FUNC.
    #[must_use]
    pub fn routine(&self) -> Routine {
        Routine::from_code(self.port.control_block().snapshot()[RUN_FUNC_ADDR as usize])
    }

    #[must_use]
    pub fn stats(&self) -> &HostStats {
        &self.stats
    }

    #[must_use]
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::DoubleBuffer;
    use crate::handshake::{split, ControlBlock, CoprocPort};
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (Host, CoprocPort) {
        let (host, coproc) = split(ControlBlock::new(), Arc::new(DoubleBuffer::default()));
        (Host::new(host, &Config::default()), coproc)
    }

    // Host raises the request, the coprocessor writes B' and raises ready;
    // the host then reads B' from the front and the old front is the back.
    #[test]
    fn swap_exposes_new_back() {
        let (mut host, coproc) = setup();
        let old_front = host.front_index();
        let t = host.begin_phase(Phase::Blank);
        coproc.write_back(|f| f.player0.fill(0xb1));
        coproc.raise_ready(t, true);

        assert_eq!(host.poll(), Some(PhaseOutcome::Swapped));
        assert_eq!(host.read_front(|f| f.player0[0]), 0xb1);
        assert_ne!(host.front_index(), old_front);
        coproc.write_back(|f| assert_eq!(f.player0[0], 0));
        assert_eq!(host.pending(), None);
        assert_eq!(host.stats().swaps, 1);
    }

    #[test]
    fn ready_without_data_keeps_front() {
        let (mut host, coproc) = setup();
        let t = host.begin_phase(Phase::Blank);
        coproc.write_back(|f| f.player0.fill(0xb1));
        coproc.raise_ready(t, true);
        host.poll();

        let before = host.read_front(Frame::clone);
        let t = host.begin_phase(Phase::Visible);
        coproc.raise_ready(t, false);
        assert_eq!(host.poll(), Some(PhaseOutcome::Unchanged));
        assert_eq!(host.read_front(Frame::clone), before);
    }

    // The coprocessor never answers in time: the host keeps drawing the old
    // front and a late ready for the expired ticket is ignored.
    #[test]
    fn timeout_keeps_stale_front() {
        let (mut host, coproc) = setup();
        let before = host.read_front(Frame::clone);
        let t = host.begin_phase(Phase::Blank);
        coproc.write_back(|f| f.color0[..8].fill(0x5a));

        let outcome = host.wait(Instant::now() + Duration::from_millis(2));
        assert_eq!(outcome, PhaseOutcome::TimedOut);
        assert_eq!(host.read_front(Frame::clone), before);
        assert_eq!(host.stats().timeouts, 1);

        host.begin_phase(Phase::Visible);
        coproc.raise_ready(t, true);
        assert_eq!(host.poll(), None);
        assert_eq!(host.read_front(Frame::clone), before);
    }

    #[test]
    fn image_carries_control_block_and_front() {
        let (mut host, coproc) = setup();
        host.set_input(InputState::idle().with_fire(crate::input::Player::P0));
        let t = host.begin_phase(Phase::Blank);
        coproc.set_mode_byte(2);
        coproc.write_back(|f| f.scalars.ball_x = 0x33);
        coproc.raise_ready(t, true);
        host.poll();

        let image = host.image();
        assert_eq!(image.get(crate::consts::INPT4_ADDR), 0x00);
        assert_eq!(image.get(crate::consts::VB_TIME_ADDR), 1);
        assert_eq!(image.get(crate::consts::MODE_ADDR), 2);
        assert_eq!(image.get(crate::consts::BALL_X_ADDR), 0x33);
    }

    #[test]
    fn routine_is_decoded_from_run_func() {
        let (host, coproc) = setup();
        assert_eq!(host.routine(), Routine::Init);
        coproc.set_run_func(Routine::MenuBlank.code());
        assert_eq!(host.routine(), Routine::MenuBlank);
        coproc.set_run_func(0xee);
        assert_eq!(host.routine(), Routine::Init);
    }

    #[cfg(feature = "external_input")]
    #[test]
    fn channel_input_is_published_at_phase_start() {
        let (mut host, coproc) = setup();
        let (tx, rx) = kanal::unbounded();
        host.set_input_channel(rx);
        let pressed = InputState::idle().with_fire(crate::input::Player::P1);
        tx.send(InputState::idle()).unwrap();
        tx.send(pressed).unwrap();
        host.begin_phase(Phase::Blank);
        assert_eq!(coproc.input(), pressed);
        assert_eq!(host.input(), pressed);
    }
}
