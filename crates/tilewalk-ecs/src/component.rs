//! Component kinds and values.
//!
//! The component set is closed: every value an entity can carry is one of the
//! variants of [`Component`], and each variant has exactly one
//! [`ComponentKind`]. An entity holds at most one value per kind.
//!
//! Component values are never edited in place once stored. "Updating" a
//! component means building a new value (often with one of the `with_*` /
//! `advanced` helpers below) and replacing the stored one, so a reader always
//! sees a complete value.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ComponentKind
// ---------------------------------------------------------------------------

/// Discriminant of a [`Component`]; the key of an entity's component slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Position,
    Render,
    Input,
    Animation,
    Ai,
    Interaction,
}

impl ComponentKind {
    /// Number of component kinds.
    pub const COUNT: usize = 6;

    /// Every kind, in slot order.
    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Position,
        ComponentKind::Render,
        ComponentKind::Input,
        ComponentKind::Animation,
        ComponentKind::Ai,
        ComponentKind::Interaction,
    ];

    /// Slot index of this kind inside an entity.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Position => "position",
            ComponentKind::Render => "render",
            ComponentKind::Input => "input",
            ComponentKind::Animation => "animation",
            ComponentKind::Ai => "ai",
            ComponentKind::Interaction => "interaction",
        }
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Component values
// ---------------------------------------------------------------------------

/// World-space position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan_distance(&self, other: &Position) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Visual identity: which texture to blit and at what size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Render {
    pub texture_path: String,
    pub width: u32,
    pub height: u32,
}

impl Render {
    pub fn new(texture_path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            texture_path: texture_path.into(),
            width,
            height,
        }
    }

    /// A copy of this render component showing a different texture.
    pub fn with_texture(&self, texture_path: impl Into<String>) -> Self {
        Self {
            texture_path: texture_path.into(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Marks an entity as driven by player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub controllable: bool,
}

impl Input {
    pub fn new(controllable: bool) -> Self {
        Self { controllable }
    }
}

/// Frame-based texture animation.
///
/// The frame list is shared behind an [`Arc`] so producing the next value of
/// the animation each tick does not copy the frame names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frames: Arc<[String]>,
    /// Seconds each frame stays on screen.
    pub frame_time: f32,
    pub looping: bool,
    /// Seconds accumulated on the current frame.
    pub current_time: f32,
    pub current_frame: usize,
}

impl Animation {
    /// A fresh animation positioned at frame 0 with no accumulated time.
    pub fn new<I, S>(frames: I, frame_time: f32, looping: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            frame_time,
            looping,
            current_time: 0.0,
            current_frame: 0,
        }
    }

    /// The animation after `dt` more seconds.
    ///
    /// At most one frame is advanced per call. The time past `frame_time`
    /// carries over to the next frame, capped at one `frame_time` so a `dt`
    /// longer than a frame cannot build up a backlog. Past the last frame the index wraps to
    /// 0 when looping and stays on the last frame otherwise. An animation with
    /// no frames only accumulates time.
    pub fn advanced(&self, dt: f32) -> Self {
        let new_time = self.current_time + dt;
        if self.frames.is_empty() || new_time < self.frame_time {
            return Self {
                current_time: new_time,
                ..self.clone()
            };
        }

        let last = self.frames.len() - 1;
        let next = self.current_frame + 1;
        let next = if next <= last {
            next
        } else if self.looping {
            0
        } else {
            last
        };

        Self {
            frames: Arc::clone(&self.frames),
            frame_time: self.frame_time,
            looping: self.looping,
            current_time: (new_time - self.frame_time).min(self.frame_time).max(0.0),
            current_frame: next,
        }
    }

    /// Texture of the frame currently shown, if there are any frames.
    pub fn current_texture(&self) -> Option<&str> {
        self.frames.get(self.current_frame).map(String::as_str)
    }
}

/// Behavior selector for [`Ai`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiBehavior {
    /// Stand still; only the timer runs.
    Idle,
    /// Walk towards a random nearby point, picking a new one every 2 seconds.
    Wander,
    /// Declared but not driven by any system yet.
    Patrol,
    /// Declared but not driven by any system yet.
    FollowPlayer,
}

/// Per-entity AI state.
///
/// `seed` is the entity's private random state: the AI system derives all
/// random choices from it, on a generator stream picked by the entity index,
/// and stores the successor seed in the replacement value. No generator is
/// shared between entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ai {
    pub behavior: AiBehavior,
    pub timer: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub seed: u64,
}

impl Ai {
    /// AI with a zeroed timer, target at the origin and seed 0.
    pub fn new(behavior: AiBehavior) -> Self {
        Self {
            behavior,
            timer: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            seed: 0,
        }
    }

    pub fn with_target(self, target_x: f32, target_y: f32) -> Self {
        Self {
            target_x,
            target_y,
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

/// Something the player can inspect by walking up to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub message: String,
    pub can_interact: bool,
}

impl Interaction {
    /// An enabled interaction showing `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            can_interact: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Component (tagged union)
// ---------------------------------------------------------------------------

/// Any component value, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Position(Position),
    Render(Render),
    Input(Input),
    Animation(Animation),
    Ai(Ai),
    Interaction(Interaction),
}

impl Component {
    /// The kind of this value.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Position(_) => ComponentKind::Position,
            Component::Render(_) => ComponentKind::Render,
            Component::Input(_) => ComponentKind::Input,
            Component::Animation(_) => ComponentKind::Animation,
            Component::Ai(_) => ComponentKind::Ai,
            Component::Interaction(_) => ComponentKind::Interaction,
        }
    }
}

// ---------------------------------------------------------------------------
// ComponentData -- typed access to one variant
// ---------------------------------------------------------------------------

/// Implemented by every concrete component type so worlds and queries can be
/// addressed by Rust type instead of by [`ComponentKind`].
pub trait ComponentData: Into<Component> + 'static {
    /// The kind this type is stored under.
    const KIND: ComponentKind;

    /// Borrow `component` as this type if it is the matching variant.
    fn from_component(component: &Component) -> Option<&Self>;
}

macro_rules! impl_component_data {
    ($($ty:ident),* $(,)?) => {
        $(
            impl ComponentData for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;

                #[inline]
                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$ty(value) => Some(value),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Component {
                #[inline]
                fn from(value: $ty) -> Self {
                    Component::$ty(value)
                }
            }
        )*
    };
}

impl_component_data!(Position, Render, Input, Animation, Ai, Interaction);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
