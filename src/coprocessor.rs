use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;
use crate::dispatch::{Dispatcher, Mode, PassReport};
use crate::handshake::{CoprocPort, Request, Ticket};

/// Polls the request cell and runs one logic pass per new ticket.
pub struct Coprocessor {
    port: CoprocPort,
    config: Config,
    dispatcher: Dispatcher,
    served: Option<Ticket>,
    passes: u64,
}

impl Coprocessor {
    #[must_use]
    pub fn new(port: CoprocPort, config: Config) -> Self {
        Self {
            dispatcher: Dispatcher::new(&config),
            port,
            config,
            served: None,
            passes: 0,
        }
    }

    /// One polling step. Returns the pass report when a pass ran.
    pub fn poll(&mut self) -> Option<PassReport> {
        match self.port.request() {
            Request::Idle => {
                if self.served.take().is_some() {
                    trace!("coproc: request withdrawn");
                }
                self.port.clear_ready();
                None
            }
            Request::Pending(t) if self.served == Some(t) => None,
            Request::Pending(t) => {
                self.port.clear_ready();
                let report = self.dispatcher.run_pass(&self.port, &self.config, t.phase());
                self.port.raise_ready(t, report.published);
                self.served = Some(t);
                self.passes += 1;
                trace!("coproc: {:?} for ticket {}, {:?}", report.routine, t.seq(), t.phase());
                Some(report)
            }
        }
    }

    /// Busy-waits on the request cell until `stop` is set.
    pub fn run(&mut self, stop: &AtomicBool) {
        debug!("coproc: running");
        let mut idle_spins = 0u32;
        while !stop.load(Ordering::Relaxed) {
            if self.poll().is_some() {
                idle_spins = 0;
            } else {
                idle_spins = idle_spins.saturating_add(1);
                if idle_spins < 64 {
                    std::hint::spin_loop();
                } else {
                    std::thread::yield_now();
                }
            }
        }
        debug!("coproc: stopped after {} passes", self.passes);
    }

    #[must_use]
    pub fn active_mode(&self) -> Mode {
        self.dispatcher.active()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::DoubleBuffer;
    use crate::dispatch::Routine;
    use crate::handshake::{split, ControlBlock, Phase, Ready};
    use std::sync::Arc;

    #[test]
    fn serves_each_ticket_once() {
        let (host, coproc) = split(ControlBlock::new(), Arc::new(DoubleBuffer::default()));
        let mut c = Coprocessor::new(coproc, Config::default());
        assert_eq!(c.poll(), None);

        let t = Ticket::new(1, Phase::Blank);
        host.raise_request(t);
        let r = c.poll().unwrap();
        assert_eq!(r.routine, Routine::Init);
        assert!(!r.published);
        assert_eq!(host.ready(), Ready::Done { ticket: t, published: false });

        assert_eq!(c.poll(), None);
        assert_eq!(c.passes(), 1);

        host.withdraw_request();
        assert_eq!(c.poll(), None);
        assert_eq!(host.ready(), Ready::Idle);
    }

    #[test]
    fn new_ticket_clears_stale_ready_first() {
        let (host, coproc) = split(ControlBlock::new(), Arc::new(DoubleBuffer::default()));
        let mut c = Coprocessor::new(coproc, Config::default());
        host.raise_request(Ticket::new(1, Phase::Blank));
        c.poll();
        let t2 = Ticket::new(2, Phase::Visible);
        host.raise_request(t2);
        c.poll();
        match host.ready() {
            Ready::Done { ticket, .. } => assert_eq!(ticket, t2),
            Ready::Idle => panic!("no ready"),
        }
    }
}
