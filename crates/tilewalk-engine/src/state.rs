//! Application states and the stack that runs them.
//!
//! Only the top state of the [`StateManager`] is updated and rendered.
//! Pushing calls [`GameState::enter`] before the state becomes active and
//! popping calls [`GameState::exit`] as it leaves; a popped state is handed
//! back to the caller and never called again by the manager.

use crate::input::InputSource;
use crate::render::Renderer;

/// One screen of the game with its own entities, tiles and systems.
pub trait GameState {
    /// Name used in logs.
    fn name(&self) -> &str;
    /// Build the state's contents. Called once, before any update.
    fn enter(&mut self);
    /// Advance by `dt` seconds.
    fn update(&mut self, dt: f32, input: &dyn InputSource);
    /// Issue this state's draw calls.
    fn render(&self, renderer: &mut dyn Renderer);
    /// Tear the state down. Called once; no calls follow.
    fn exit(&mut self);
}

/// Stack of states; the top one is active.
#[derive(Default)]
pub struct StateManager {
    states: Vec<Box<dyn GameState>>,
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.states.iter().map(|s| s.name()))
            .finish()
    }
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `state` and make it the active one.
    pub fn push(&mut self, mut state: Box<dyn GameState>) {
        tracing::info!(state = state.name(), depth = self.states.len() + 1, "entering state");
        state.enter();
        self.states.push(state);
    }

    /// Exit and remove the active state. The one below, if any, becomes
    /// active.
    pub fn pop(&mut self) -> Option<Box<dyn GameState>> {
        let mut state = self.states.pop()?;
        tracing::info!(state = state.name(), depth = self.states.len(), "exiting state");
        state.exit();
        Some(state)
    }

    /// Pop every state, top first.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Update the active state, if any.
    pub fn update(&mut self, dt: f32, input: &dyn InputSource) {
        if let Some(state) = self.states.last_mut() {
            state.update(dt, input);
        }
    }

    /// Render the active state, if any.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(state) = self.states.last() {
            state.render(renderer);
        }
    }

    pub fn active(&self) -> Option<&dyn GameState> {
        self.states.last().map(|s| s.as_ref())
    }

    /// State names, bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
