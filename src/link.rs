use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::buffers::{DoubleBuffer, Frame};
use crate::config::Config;
use crate::coprocessor::Coprocessor;
use crate::dispatch::Mode;
use crate::handshake::{split, ControlBlock, Phase};
use crate::host::{FrameReport, Host, HostStats, PhaseOutcome};
use crate::input::InputState;
use crate::shared_memory::SharedMemory;

/// Both ends of the link over one control block and one pair of frames.
///
/// `step_phase`/`step_frame` interleave the two sides deterministically on
/// the calling thread; `spawn` moves the coprocessor onto its own thread.
pub struct Link {
    config: Config,
    frames: Arc<DoubleBuffer<Frame>>,
    host: Host,
    coproc: Coprocessor,
}

impl Link {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let frames = Arc::new(DoubleBuffer::default());
        let (host_port, coproc_port) = split(ControlBlock::new(), frames.clone());
        let mut host = Host::new(host_port, &config);
        host.set_pacing(false);
        Self {
            coproc: Coprocessor::new(coproc_port, config),
            config,
            frames,
            host,
        }
    }

    /// Raises the request for `phase`, lets the coprocessor serve it and
    /// resolves it on the host side.
    pub fn step_phase(&mut self, phase: Phase) -> PhaseOutcome {
        self.host.begin_phase(phase);
        self.coproc.poll();
        let outcome = match self.host.poll() {
            Some(o) => o,
            None => self.host.expire(),
        };
        // coprocessor sees the request withdrawn and drops its ready
        self.coproc.poll();
        trace!("{phase:?} phase: {outcome:?}");
        outcome
    }

    pub fn step_frame(&mut self) -> FrameReport {
        let blank = self.step_phase(Phase::Blank);
        let visible = self.step_phase(Phase::Visible);
        self.host.finish_frame();
        FrameReport { blank, visible }
    }

    pub fn set_input(&mut self, input: InputState) {
        self.host.set_input(input);
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    #[must_use]
    pub fn coprocessor(&self) -> &Coprocessor {
        &self.coproc
    }

    #[must_use]
    pub fn frames(&self) -> &DoubleBuffer<Frame> {
        &self.frames
    }

    /// Mode the coprocessor is currently dispatching.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.coproc.active_mode()
    }

    #[must_use]
    pub fn image(&self) -> SharedMemory {
        self.host.image()
    }

    #[must_use]
    pub fn stats(&self) -> &HostStats {
        self.host.stats()
    }

    /// Runs the coprocessor on its own thread and hands back the host, which
    /// then paces itself to the phase budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(self) -> Result<(Host, CoprocHandle), String> {
        let Link {
            mut host,
            mut coproc,
            ..
        } = self;
        host.set_pacing(true);
        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let stop = stop.clone();
            std::thread::Builder::new()
                .name("coproc".into())
                .spawn(move || {
                    coproc.run(&stop);
                    coproc
                })
                .map_err(|e| format!("Unable to spawn coprocessor thread : {e}"))?
        };
        debug!("link: coprocessor thread started");
        Ok((host, CoprocHandle { stop, thread }))
    }
}

impl Default for Link {
    fn default() -> Self {
        Link::new(Config::default())
    }
}

pub struct CoprocHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<Coprocessor>,
}

impl CoprocHandle {
    /// Stops the polling loop and returns the coprocessor.
    ///
    /// # Errors
    ///
    /// Returns an error if the coprocessor thread panicked.
    pub fn stop(self) -> Result<Coprocessor, &'static str> {
        self.stop.store(true, Ordering::Relaxed);
        self.thread.join().map_err(|_| "coprocessor thread panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::ScalarState;
    use crate::consts::{COLUMN_LEN, MODE_ADDR};
    use crate::dispatch::init::DEFAULT_SCALARS;
    use crate::input::{ConsoleSwitches, Player};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Starting from zeroed frames, one full frame leaves MODE at Splash and
    // both instances identical.
    #[test]
    fn first_frame_initializes_both_instances() {
        init_logger();
        let mut link = Link::default();
        let report = link.step_frame();
        assert_eq!(report.blank, PhaseOutcome::Unchanged);
        assert_eq!(report.visible, PhaseOutcome::Unchanged);
        assert_eq!(link.image().get(MODE_ADDR), u8::from(Mode::Splash));

        let a = link.frames().instance(0, Frame::clone);
        let b = link.frames().instance(1, Frame::clone);
        assert_eq!(a, b);
        assert_eq!(a.scalars, DEFAULT_SCALARS);
    }

    #[test]
    fn splash_menu_game() {
        init_logger();
        let mut link = Link::default();
        link.step_frame();
        let r = link.step_frame();
        assert_eq!(link.mode(), Mode::Splash);
        assert_eq!(r.blank, PhaseOutcome::Swapped);
        assert_eq!(link.host().read_front(|f| f.mode), Mode::Splash);

        link.set_input(InputState::idle().with_fire(Player::P0));
        let r = link.step_frame();
        assert_eq!(r.blank, PhaseOutcome::Swapped);
        assert_eq!(r.visible, PhaseOutcome::Unchanged);
        assert_eq!(link.mode(), Mode::Splash);

        link.step_frame();
        assert_eq!(link.mode(), Mode::Menu);
        assert_eq!(link.host().read_front(|f| f.mode), Mode::Menu);

        link.set_input(InputState::idle());
        link.step_frame();
        link.set_input(InputState::idle().with_switch_pressed(ConsoleSwitches::reset));
        link.step_frame();
        assert_eq!(link.mode(), Mode::Menu);
        link.step_frame();
        assert_eq!(link.mode(), Mode::Game);
        assert_eq!(link.host().read_front(|f| f.mode), Mode::Game);
        assert_eq!(link.image().get(MODE_ADDR), u8::from(Mode::Game));
    }

    // The host gives up on the first splash render; the splash still reaches
    // the front on the next frame.
    #[test]
    fn splash_recovers_from_missed_render() {
        init_logger();
        let mut link = Link::default();
        link.step_frame();

        link.host.begin_phase(Phase::Blank);
        let r = link.coproc.poll();
        assert!(r.is_some_and(|r| r.published));
        assert_eq!(link.host.expire(), PhaseOutcome::TimedOut);
        link.coproc.poll();
        link.step_phase(Phase::Visible);
        link.host.finish_frame();
        assert_eq!(link.host().read_front(|f| f.mode), Mode::Init);

        let r = link.step_frame();
        assert_eq!(r.blank, PhaseOutcome::Swapped);
        assert_eq!(link.host().read_front(|f| f.mode), Mode::Splash);
        assert_eq!(
            link.host().read_front(|f| f.splash),
            crate::dispatch::splash::splash_columns()
        );
    }

    // Blank ticket expired unseen: the first pass served is a visible one and
    // must leave the front alone.
    #[test]
    fn init_never_writes_front_in_visible_phase() {
        let mut link = Link::default();
        let before = link.host().read_front(Frame::clone);
        let front = link.host().front_index();

        link.host.begin_phase(Phase::Blank);
        link.host.begin_phase(Phase::Visible);
        let r = link.coproc.poll();
        assert!(r.is_some_and(|r| !r.published));
        assert_eq!(link.host().front_index(), front);
        assert_eq!(link.host().read_front(Frame::clone), before);
        assert_eq!(link.host.poll(), Some(PhaseOutcome::Unchanged));
        link.host.finish_frame();

        link.step_frame();
        assert_eq!(link.host().read_front(|f| f.scalars), DEFAULT_SCALARS);
        link.step_frame();
        assert_eq!(link.mode(), Mode::Splash);
    }

    #[test]
    fn splash_times_out_into_menu() {
        let mut config = Config::default();
        config.set_splash_frames(5);
        let mut link = Link::new(config);
        for _ in 0..7 {
            link.step_frame();
        }
        assert_eq!(link.mode(), Mode::Splash);
        link.step_frame();
        assert_eq!(link.mode(), Mode::Menu);
    }

    #[test]
    fn counters_follow_phases() {
        let mut link = Link::default();
        for _ in 0..300 {
            link.step_frame();
        }
        let image = link.image();
        assert_eq!(image.get(crate::consts::VB_TIME_ADDR), (300 % 256) as u8);
        assert_eq!(image.get(crate::consts::OS_TIME_ADDR), (300 % 256) as u8);
        assert_eq!(link.stats().frames, 300);
        assert_eq!(link.stats().phases, 600);
        assert_eq!(link.stats().timeouts, 0);
    }

    #[test]
    fn threaded_run() {
        init_logger();
        let mut config = Config::default();
        config.set_budget_scale(4);
        let (mut host, handle) = Link::new(config).spawn().unwrap();
        for _ in 0..10 {
            host.run_frame(|_| ());
        }
        let coproc = handle.stop().unwrap();
        let stats = *host.stats();
        assert_eq!(stats.frames, 10);
        assert_eq!(stats.phases, 20);
        assert_eq!(stats.swaps + stats.unchanged + stats.timeouts, stats.phases);
        assert!(coproc.passes() > 0);
    }

    fn assert_complete(frame: &Frame) {
        match frame.mode {
            Mode::Init => {
                assert!(frame.scalars == ScalarState::default() || frame.scalars == DEFAULT_SCALARS);
                assert_eq!(frame.splash, [[0; COLUMN_LEN]; 4]);
            }
            Mode::Splash => {
                assert_eq!(frame.splash, crate::dispatch::splash::splash_columns());
            }
            Mode::Menu => {
                assert!(frame.menu_graphics.iter().any(|b| *b != 0));
                assert!(frame.menu_colors.iter().any(|b| *b != 0));
            }
            Mode::Game => {
                assert!(frame.player0.iter().any(|b| *b != 0));
            }
        }
    }

    // The coprocessor regularly stalls for longer than a whole frame, so
    // requests time out and readies arrive late. Every frame the host draws
    // must still be one complete render, modes only moving forward.
    #[test]
    fn host_only_draws_complete_frames_with_slow_coprocessor() {
        init_logger();
        let link = Link::default();
        let Link {
            mut host,
            mut coproc,
            ..
        } = link;
        host.set_pacing(true);

        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let stop = stop.clone();
            std::thread::spawn(move || {
                let mut served = 0u32;
                while !stop.load(Ordering::Relaxed) {
                    if coproc.poll().is_some() {
                        served += 1;
                        if served % 7 == 0 {
                            std::thread::sleep(std::time::Duration::from_millis(20));
                        }
                    } else {
                        std::thread::yield_now();
                    }
                }
                coproc
            })
        };

        let mut last_mode = Mode::Init;
        for n in 0..90 {
            if n >= 10 {
                host.set_input(InputState::idle().with_fire(Player::P0));
            }
            host.run_frame(|frame| {
                assert_complete(frame);
                assert!(u8::from(frame.mode) >= u8::from(last_mode));
                last_mode = frame.mode;
            });
        }
        stop.store(true, Ordering::Relaxed);
        let coproc = thread.join().unwrap();

        let stats = *host.stats();
        assert!(stats.timeouts > 0);
        assert!(stats.swaps > 0);
        assert_eq!(stats.swaps + stats.unchanged + stats.timeouts, stats.phases);
        assert_eq!(coproc.active_mode(), Mode::Menu);
        assert_eq!(last_mode, Mode::Menu);
    }
}
