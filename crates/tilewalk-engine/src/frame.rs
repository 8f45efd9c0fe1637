//! The frame loop: sample input, update, render, pace.
//!
//! Each frame the [`FrameLoop`]:
//!
//! 1. Pulls the next [`InputFrame`](crate::input::InputFrame) from the feed
//!    and advances its [`InputState`].
//! 2. Stops if the quit key is held.
//! 3. Updates the active state by the fixed `dt`.
//! 4. Clears the renderer, renders the active state and presents.
//! 5. Waits on the [`FramePacer`].
//!
//! Whatever stops the loop, every state on the stack is exited (top first)
//! before [`FrameLoop::run`] returns.
//!
//! ```
//! use tilewalk_engine::prelude::*;
//!
//! let config = EngineConfig { headless: true, ..Default::default() };
//! let mut frame_loop = FrameLoop::new(config.clone());
//! frame_loop.states_mut().push(Box::new(tilewalk_engine::demo::bedroom(&config)));
//!
//! let mut feed = ScriptedInput::repeat(&[KeyCode::D], 10);
//! let mut renderer = RecordingRenderer::new();
//! let summary = frame_loop.run(&mut feed, &mut renderer, &mut Unpaced);
//!
//! assert_eq!(summary.frames, 10);
//! assert_eq!(summary.reason, StopReason::InputClosed);
//! assert!(frame_loop.states().is_empty());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::input::{InputFeed, InputSource, InputState};
use crate::render::Renderer;
use crate::state::StateManager;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Waits between frames.
pub trait FramePacer {
    /// Block until the next frame may start.
    ///
    /// # Errors
    ///
    /// [`EngineError::Pacing`] if the wait was interrupted; the loop stops.
    fn wait(&mut self) -> Result<(), EngineError>;
}

/// No waiting at all, for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl FramePacer for Unpaced {
    fn wait(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Handle that interrupts a [`SleepPacer`] from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct PacerInterrupt(Arc<AtomicBool>);

impl PacerInterrupt {
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sleeps so that frames start one interval apart.
#[derive(Debug)]
pub struct SleepPacer {
    interval: Duration,
    last: Option<Instant>,
    interrupt: PacerInterrupt,
}

impl SleepPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            interrupt: PacerInterrupt::default(),
        }
    }

    /// A handle whose [`interrupt`](PacerInterrupt::interrupt) makes the next
    /// [`wait`](FramePacer::wait) fail.
    pub fn interrupt_handle(&self) -> PacerInterrupt {
        self.interrupt.clone()
    }
}

impl FramePacer for SleepPacer {
    fn wait(&mut self) -> Result<(), EngineError> {
        if self.interrupt.is_interrupted() {
            return Err(EngineError::Pacing("frame wait interrupted".to_owned()));
        }
        let now = Instant::now();
        let sleep_for = match self.last {
            Some(last) => self.interval.saturating_sub(now.duration_since(last)),
            None => self.interval,
        };
        std::thread::sleep(sleep_for);
        self.last = Some(Instant::now());
        if self.interrupt.is_interrupted() {
            return Err(EngineError::Pacing("frame wait interrupted".to_owned()));
        }
        Ok(())
    }
}

/// The pacer matching `config`: [`Unpaced`] when headless, otherwise a
/// [`SleepPacer`] at `frame_interval_ms`.
pub fn pacer_for(config: &EngineConfig) -> Box<dyn FramePacer> {
    if config.headless {
        Box::new(Unpaced)
    } else {
        Box::new(SleepPacer::new(config.frame_interval()))
    }
}

// ---------------------------------------------------------------------------
// StopReason / RunSummary
// ---------------------------------------------------------------------------

/// Why [`FrameLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The quit key was held at a frame boundary.
    QuitRequested,
    /// The input feed ran out.
    InputClosed,
    /// The pacer reported an interruption.
    PacingInterrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::QuitRequested => "quit requested",
            StopReason::InputClosed => "input closed",
            StopReason::PacingInterrupted => "pacing interrupted",
        })
    }
}

/// Outcome of a [`FrameLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames fully updated and rendered.
    pub frames: u64,
    pub reason: StopReason,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Single-threaded fixed-timestep frame loop over a [`StateManager`].
#[derive(Debug)]
pub struct FrameLoop {
    config: EngineConfig,
    states: StateManager,
    input: InputState,
    frames: u64,
}

impl FrameLoop {
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(config: EngineConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            config,
            states: StateManager::new(),
            input: InputState::new(),
            frames: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    /// Frames completed over the lifetime of this loop.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame with already-advanced input. Returns `false` if the
    /// quit key is held, in which case nothing is updated or drawn.
    fn step(&mut self, renderer: &mut dyn Renderer) -> bool {
        if self.input.is_key_pressed(self.config.bindings.quit) {
            return false;
        }
        self.states.update(self.config.fixed_dt, &self.input);
        renderer.clear();
        self.states.render(renderer);
        renderer.present();
        self.frames += 1;
        true
    }

    /// Run until quit, input end or a pacing failure, then exit every state.
    pub fn run(
        &mut self,
        feed: &mut dyn InputFeed,
        renderer: &mut dyn Renderer,
        pacer: &mut dyn FramePacer,
    ) -> RunSummary {
        tracing::info!(
            fixed_dt = self.config.fixed_dt,
            headless = self.config.headless,
            states = ?self.states.names(),
            "frame loop starting"
        );
        let start_frames = self.frames;

        let reason = loop {
            let Some(frame) = feed.next_frame() else {
                break StopReason::InputClosed;
            };
            self.input.advance(frame);
            if !self.step(renderer) {
                tracing::info!(key = %self.config.bindings.quit, "quit key pressed");
                break StopReason::QuitRequested;
            }
            if let Err(e) = pacer.wait() {
                tracing::warn!(error = %e, "stopping frame loop");
                break StopReason::PacingInterrupted;
            }
        };

        self.states.clear();
        let summary = RunSummary {
            frames: self.frames - start_frames,
            reason,
        };
        tracing::info!(frames = summary.frames, reason = %summary.reason, "frame loop stopped");
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::{InputFrame, KeyCode, ScriptedInput};
    use crate::render::RecordingRenderer;
    use crate::state::test_support::Probe;

    struct FailAfter(usize);

    impl FramePacer for FailAfter {
        fn wait(&mut self) -> Result<(), EngineError> {
            if self.0 == 0 {
                return Err(EngineError::Pacing("interrupted".to_owned()));
            }
            self.0 -= 1;
            Ok(())
        }
    }

    fn setup() -> (FrameLoop, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut frame_loop = FrameLoop::new(EngineConfig::default());
        frame_loop.states_mut().push(Probe::boxed("main", &log));
        (frame_loop, log)
    }

    #[test]
    fn quit_stops_at_frame_boundary_and_exits_states() {
        let (mut frame_loop, log) = setup();
        let mut feed = ScriptedInput::new([
            InputFrame::new(),
            InputFrame::new().with(KeyCode::Escape),
            InputFrame::new(),
        ]);
        let mut renderer = RecordingRenderer::new();
        let summary = frame_loop.run(&mut feed, &mut renderer, &mut Unpaced);

        assert_eq!(summary, RunSummary { frames: 1, reason: StopReason::QuitRequested });
        assert_eq!(feed.remaining(), 1);
        assert_eq!(
            *log.borrow(),
            vec!["main:enter", "main:update", "main:render", "main:exit"]
        );
        assert_eq!(renderer.frames_presented(), 1);
    }

    #[test]
    fn pacing_failure_stops_and_exits_states() {
        let (mut frame_loop, log) = setup();
        let mut feed = ScriptedInput::repeat(&[], 10);
        let summary = frame_loop.run(&mut feed, &mut RecordingRenderer::new(), &mut FailAfter(2));

        assert_eq!(summary.reason, StopReason::PacingInterrupted);
        assert_eq!(summary.frames, 3);
        assert_eq!(log.borrow().last().map(String::as_str), Some("main:exit"));
        assert!(frame_loop.states().is_empty());
    }

    #[test]
    fn input_end_stops_the_loop() {
        let (mut frame_loop, _) = setup();
        let summary = frame_loop.run(
            &mut ScriptedInput::repeat(&[KeyCode::W], 4),
            &mut RecordingRenderer::new(),
            &mut Unpaced,
        );
        assert_eq!(summary, RunSummary { frames: 4, reason: StopReason::InputClosed });
        assert_eq!(frame_loop.frame_count(), 4);
    }

    #[test]
    fn interrupted_sleep_pacer_fails() {
        let mut pacer = SleepPacer::new(Duration::from_millis(1));
        pacer.wait().unwrap();
        pacer.interrupt_handle().interrupt();
        assert!(matches!(pacer.wait(), Err(EngineError::Pacing(_))));
    }

    #[test]
    fn headless_config_is_unpaced() {
        let config = EngineConfig { headless: true, ..Default::default() };
        let mut pacer = pacer_for(&config);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.wait().unwrap();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive and finite")]
    fn rejects_non_positive_dt() {
        FrameLoop::new(EngineConfig { fixed_dt: 0.0, ..Default::default() });
    }
}
