use core::ops::Not;
use serde::{Deserialize, Serialize};

const SEQ_SHIFT: u8 = 2;
const SEQ_MAX: u8 = 0xff >> SEQ_SHIFT;
const PHASE_BIT: u8 = 0b0000_0010;
const DATA_BIT: u8 = 0b0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    Blank = 0,
    Visible = 1,
}

impl Not for Phase {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Phase::Blank => Phase::Visible,
            Phase::Visible => Phase::Blank,
        }
    }
}

/// Phases after which the host hands out the same ticket again: 63 sequence
/// numbers times two phases, 63 frames. A ready raised by a pass stalled for
/// that long could be taken for the current one.
pub const TICKET_PERIOD: u32 = 2 * SEQ_MAX as u32;

/// Identifies one phase request. Bits 7..2 hold a sequence number that is
/// never 0, bit 1 the phase, so a ticket is never the idle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u8);

impl Ticket {
    #[must_use]
    pub fn new(seq: u8, phase: Phase) -> Self {
        let seq = seq.clamp(1, SEQ_MAX);
        let phase_bit = match phase {
            Phase::Blank => 0,
            Phase::Visible => PHASE_BIT,
        };
        Self((seq << SEQ_SHIFT) | phase_bit)
    }

    #[must_use]
    pub fn seq(self) -> u8 {
        self.0 >> SEQ_SHIFT
    }

    #[must_use]
    pub fn phase(self) -> Phase {
        if self.0 & PHASE_BIT != 0 {
            Phase::Visible
        } else {
            Phase::Blank
        }
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Sequence number following `seq`, skipping 0.
    #[must_use]
    pub fn next_seq(seq: u8) -> u8 {
        if seq >= SEQ_MAX {
            1
        } else {
            seq + 1
        }
    }

    fn from_bits(v: u8) -> Option<Self> {
        let t = v & !DATA_BIT;
        if t >> SEQ_SHIFT == 0 {
            None
        } else {
            Some(Self(t))
        }
    }
}

/// Content of the host request cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Idle,
    Pending(Ticket),
}

impl From<u8> for Request {
    fn from(value: u8) -> Self {
        match Ticket::from_bits(value) {
            Some(t) => Request::Pending(t),
            None => Request::Idle,
        }
    }
}

impl From<Request> for u8 {
    fn from(val: Request) -> Self {
        match val {
            Request::Idle => 0,
            Request::Pending(t) => t.bits(),
        }
    }
}

/// Content of the coprocessor ready cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ready {
    Idle,
    Done { ticket: Ticket, published: bool },
}

impl From<u8> for Ready {
    fn from(value: u8) -> Self {
        match Ticket::from_bits(value) {
            Some(ticket) => Ready::Done {
                ticket,
                published: value & DATA_BIT != 0,
            },
            None => Ready::Idle,
        }
    }
}

impl From<Ready> for u8 {
    fn from(val: Ready) -> Self {
        match val {
            Ready::Idle => 0,
            Ready::Done { ticket, published } => {
                ticket.bits() | if published { DATA_BIT } else { 0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_is_never_idle() {
        let mut seq = 0;
        for _ in 0..300 {
            seq = Ticket::next_seq(seq);
            for phase in [Phase::Blank, Phase::Visible] {
                let t = Ticket::new(seq, phase);
                assert_ne!(t.bits(), 0);
                assert_eq!(t.phase(), phase);
                assert_eq!(t.seq(), seq);
                assert_eq!(Request::from(t.bits()), Request::Pending(t));
            }
        }
    }

    #[test]
    fn sequence_wraps_past_zero() {
        assert_eq!(Ticket::next_seq(0), 1);
        assert_eq!(Ticket::next_seq(62), 63);
        assert_eq!(Ticket::next_seq(63), 1);
    }

    // Same stepping as the host: next sequence number every phase, phases
    // alternating.
    #[test]
    fn tickets_repeat_after_period() {
        let mut seq = 0;
        let mut phase = Phase::Blank;
        let mut issued = Vec::new();
        for _ in 0..2 * TICKET_PERIOD {
            seq = Ticket::next_seq(seq);
            issued.push(Ticket::new(seq, phase));
            phase = !phase;
        }
        let first = issued[0];
        let again = issued.iter().skip(1).position(|t| *t == first).map(|i| i + 1);
        assert_eq!(again, Some(TICKET_PERIOD as usize));
    }

    #[test]
    fn ready_carries_data_bit() {
        let t = Ticket::new(5, Phase::Visible);
        let with: u8 = Ready::Done { ticket: t, published: true }.into();
        let without: u8 = Ready::Done { ticket: t, published: false }.into();
        assert_eq!(with & !DATA_BIT, without);
        assert_eq!(Ready::from(with), Ready::Done { ticket: t, published: true });
        assert_eq!(Ready::from(without), Ready::Done { ticket: t, published: false });
        assert_eq!(Ready::from(0), Ready::Idle);
        assert_eq!(Ready::from(DATA_BIT), Ready::Idle);
        assert_eq!(Request::from(0), Request::Idle);
    }

    #[test]
    fn phase_not() {
        assert_eq!(!Phase::Blank, Phase::Visible);
        assert_eq!(!Phase::Visible, Phase::Blank);
    }
}
