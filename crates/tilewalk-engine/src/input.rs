//! Keyboard input: key codes, per-frame key sets, and the sources systems
//! read from.
//!
//! The frame loop pulls one [`InputFrame`] per frame from an [`InputFeed`] and
//! advances an [`InputState`]. Systems only ever see the [`InputSource`]
//! trait, so a scripted feed and a real keyboard adapter are interchangeable.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// KeyCode
// ---------------------------------------------------------------------------

/// Keys the engine can bind actions to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    E,
    Q,
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    /// Display name used in control hints.
    pub fn name(self) -> &'static str {
        match self {
            KeyCode::W => "W",
            KeyCode::A => "A",
            KeyCode::S => "S",
            KeyCode::D => "D",
            KeyCode::E => "E",
            KeyCode::Q => "Q",
            KeyCode::Space => "Space",
            KeyCode::Enter => "Enter",
            KeyCode::Escape => "Escape",
            KeyCode::Up => "Up",
            KeyCode::Down => "Down",
            KeyCode::Left => "Left",
            KeyCode::Right => "Right",
        }
    }
}

impl fmt::Debug for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// InputFrame
// ---------------------------------------------------------------------------

/// The set of keys held down during one frame.
///
/// Kept ordered so recorded frames serialize identically across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub held: BTreeSet<KeyCode>,
}

impl InputFrame {
    /// A frame with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a held key (builder style).
    pub fn with(mut self, key: KeyCode) -> Self {
        self.held.insert(key);
        self
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<KeyCode> for InputFrame {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// Read-only keyboard queries available to systems and states.
pub trait InputSource {
    /// Whether `key` is held this frame.
    fn is_key_pressed(&self, key: KeyCode) -> bool;
    /// Whether `key` is held this frame but was not held the frame before.
    fn is_key_just_pressed(&self, key: KeyCode) -> bool;
}

/// Current and previous frame of held keys.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: InputFrame,
    previous: InputFrame,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next frame: the current keys become the previous ones.
    pub fn advance(&mut self, frame: InputFrame) {
        self.previous = std::mem::replace(&mut self.current, frame);
    }

    /// Keys held this frame.
    pub fn current(&self) -> &InputFrame {
        &self.current
    }
}

impl InputSource for InputState {
    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.current.is_held(key)
    }

    fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.current.is_held(key) && !self.previous.is_held(key)
    }
}

// ---------------------------------------------------------------------------
// InputFeed
// ---------------------------------------------------------------------------

/// Produces one [`InputFrame`] per frame. `None` means the input device is
/// gone and the loop should stop.
pub trait InputFeed {
    fn next_frame(&mut self) -> Option<InputFrame>;
}

/// A feed that plays back a fixed list of frames, then closes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// `count` frames holding exactly `keys`.
    pub fn repeat(keys: &[KeyCode], count: usize) -> Self {
        let frame: InputFrame = keys.iter().copied().collect();
        Self::new(std::iter::repeat(frame).take(count))
    }

    /// Append frames to the end of the script.
    pub fn extend(&mut self, frames: impl IntoIterator<Item = InputFrame>) {
        self.frames.extend(frames);
    }

    /// Frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputFeed for ScriptedInput {
    fn next_frame(&mut self) -> Option<InputFrame> {
        self.frames.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_pressed_is_an_edge() {
        let mut input = InputState::new();
        input.advance(InputFrame::new().with(KeyCode::Space));
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_just_pressed(KeyCode::Space));

        input.advance(InputFrame::new().with(KeyCode::Space));
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(!input.is_key_just_pressed(KeyCode::Space));

        input.advance(InputFrame::new());
        input.advance(InputFrame::new().with(KeyCode::Space));
        assert!(input.is_key_just_pressed(KeyCode::Space));
    }

    #[test]
    fn scripted_input_plays_back_then_closes() {
        let mut feed = ScriptedInput::repeat(&[KeyCode::D, KeyCode::W], 2);
        assert_eq!(feed.remaining(), 2);
        let frame = feed.next_frame().unwrap();
        assert!(frame.is_held(KeyCode::D) && frame.is_held(KeyCode::W));
        assert!(feed.next_frame().is_some());
        assert!(feed.next_frame().is_none());
    }

    #[test]
    fn frame_serializes_as_sorted_key_names() {
        let frame: InputFrame = [KeyCode::Space, KeyCode::A].into_iter().collect();
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"held":["A","Space"]}"#);
    }
}
