//! Input recording and deterministic replay of a [`Scene`].
//!
//! [`record`] drives an entered scene over a list of [`InputFrame`]s and
//! writes a [`ReplayLog`]: the snapshot the run started from, every non-empty
//! input, and a state hash every `checkpoint_interval` frames. [`replay`]
//! restores that snapshot, feeds the same inputs and compares hashes at each
//! checkpoint, stopping at the first mismatch.
//!
//! ```
//! use tilewalk_engine::prelude::*;
//! use tilewalk_engine::replay::{record, replay};
//!
//! let config = EngineConfig::default();
//! let mut scene = tilewalk_engine::demo::overworld(&config);
//! scene.enter();
//!
//! let frames = vec![InputFrame::new().with(KeyCode::D); 60];
//! let log = record(&mut scene, &frames, 10);
//!
//! let result = replay(&mut scene, &log).unwrap();
//! assert!(result.completed);
//! assert!(result.first_divergence.is_none());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::input::{InputFrame, InputState};
use crate::scene::Scene;
use crate::snapshot::SceneSnapshot;
use crate::state::GameState;
use crate::EngineError;

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded run: starting snapshot plus inputs and checkpoints in frame
/// order. Serializable to JSON for fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Replay starts by restoring this.
    pub initial_snapshot: SceneSnapshot,
    /// Seconds per update during recording.
    pub fixed_dt: f32,
    /// Number of updates replay runs, whatever the entries hold.
    pub total_frames: u64,
    pub entries: Vec<ReplayEntry>,
}

/// One input or checkpoint in a [`ReplayLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// Keys held during `frame`. Frames with nothing held are not stored.
    Input { frame: u64, input: InputFrame },
    /// State hash taken before `frame` was updated.
    Checkpoint { frame: u64, state_hash: String },
}

impl ReplayEntry {
    pub fn frame(&self) -> u64 {
        match self {
            ReplayEntry::Input { frame, .. } | ReplayEntry::Checkpoint { frame, .. } => *frame,
        }
    }
}

/// Outcome of [`replay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// Every frame ran and every checkpoint matched.
    pub completed: bool,
    pub frames_replayed: u64,
    pub first_divergence: Option<ReplayDivergence>,
}

/// The first checkpoint whose replayed hash differs from the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub frame: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Builds a [`ReplayLog`] one frame at a time.
///
/// Frames must be recorded in strictly increasing order.
#[derive(Debug)]
pub struct ReplayRecorder {
    log: ReplayLog,
    checkpoint_interval: u64,
    frames_recorded: u64,
    last_frame: Option<u64>,
}

impl ReplayRecorder {
    /// `checkpoint_interval` of 0 checkpoints every frame a hash is given
    /// for; otherwise only frames divisible by it are checkpointed.
    pub fn new(snapshot: SceneSnapshot, fixed_dt: f32, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                initial_snapshot: snapshot,
                fixed_dt,
                total_frames: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            frames_recorded: 0,
            last_frame: None,
        }
    }

    /// Record `frame` before it is updated.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not greater than the previously recorded frame.
    pub fn record_frame(&mut self, frame: u64, input: &InputFrame, state_hash: Option<String>) {
        if let Some(prev) = self.last_frame {
            assert!(
                frame > prev,
                "ReplayRecorder::record_frame: frame {frame} is not strictly greater than previous frame {prev}"
            );
        }
        self.last_frame = Some(frame);
        self.frames_recorded += 1;

        if !input.is_empty() {
            self.log.entries.push(ReplayEntry::Input {
                frame,
                input: input.clone(),
            });
        }

        if let Some(state_hash) = state_hash {
            if self.checkpoint_interval == 0 || frame % self.checkpoint_interval == 0 {
                self.log.entries.push(ReplayEntry::Checkpoint { frame, state_hash });
            }
        }
    }

    pub fn finish(mut self) -> ReplayLog {
        self.log.total_frames = self.frames_recorded;
        self.log
    }
}

// ---------------------------------------------------------------------------
// record() / replay()
// ---------------------------------------------------------------------------

/// Run `scene` over `frames` at its configured `fixed_dt`, recording as it
/// goes. The scene is left in its final state.
pub fn record(scene: &mut Scene, frames: &[InputFrame], checkpoint_interval: u64) -> ReplayLog {
    let dt = scene.config().fixed_dt;
    let mut recorder = ReplayRecorder::new(scene.capture_snapshot(), dt, checkpoint_interval);
    let mut input = InputState::new();

    for frame_input in frames {
        recorder.record_frame(scene.frame(), frame_input, Some(scene.state_hash()));
        input.advance(frame_input.clone());
        scene.update(dt, &input);
    }

    let log = recorder.finish();
    tracing::debug!(
        scene = scene.name(),
        frames = log.total_frames,
        entries = log.entries.len(),
        "replay recorded"
    );
    log
}

/// Replay `log` on `scene`, checking every checkpoint.
///
/// The log is validated before the scene is touched.
///
/// # Errors
///
/// [`EngineError::Replay`] for duplicate entries, entries outside the
/// replayed frames or a frame range that overflows. [`EngineError::Snapshot`]
/// if the initial snapshot cannot be restored.
pub fn replay(scene: &mut Scene, log: &ReplayLog) -> Result<ReplayResult, EngineError> {
    let start = log.initial_snapshot.frame;
    let end = start.checked_add(log.total_frames).ok_or_else(|| {
        EngineError::Replay(format!(
            "frame range overflow: start {start} + {} frames",
            log.total_frames
        ))
    })?;

    let mut inputs: BTreeMap<u64, &InputFrame> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();

    for entry in &log.entries {
        let frame = entry.frame();
        if !(start..end).contains(&frame) {
            return Err(EngineError::Replay(format!(
                "entry at frame {frame} lies outside the replayed range {start}..{end}"
            )));
        }
        match entry {
            ReplayEntry::Input { frame, input } => {
                if inputs.insert(*frame, input).is_some() {
                    return Err(EngineError::Replay(format!(
                        "duplicate input entry at frame {frame}"
                    )));
                }
            }
            ReplayEntry::Checkpoint { frame, state_hash } => {
                if checkpoints.insert(*frame, state_hash).is_some() {
                    return Err(EngineError::Replay(format!(
                        "duplicate checkpoint entry at frame {frame}"
                    )));
                }
            }
        }
    }

    scene.restore_from_snapshot(&log.initial_snapshot)?;

    let empty = InputFrame::new();
    let mut input = InputState::new();
    let mut frames_replayed = 0;

    for frame in start..end {
        if let Some(expected) = checkpoints.get(&frame) {
            let actual_hash = scene.state_hash();
            if actual_hash != *expected {
                tracing::warn!(frame, expected = %expected, actual = %actual_hash, "replay diverged");
                return Ok(ReplayResult {
                    completed: false,
                    frames_replayed,
                    first_divergence: Some(ReplayDivergence {
                        frame,
                        expected_hash: (*expected).to_owned(),
                        actual_hash,
                    }),
                });
            }
        }
        let frame_input = inputs.get(&frame).copied().unwrap_or(&empty);
        input.advance(frame_input.clone());
        scene.update(log.fixed_dt, &input);
        frames_replayed += 1;
    }

    Ok(ReplayResult {
        completed: true,
        frames_replayed,
        first_divergence: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
