use anyhow::Result;

use crate::{engine::EngineContext, render::DrawList};

/// Trait for types that can manage state transitions.
/// This allows states to transition without direct access to StateMachine.
pub trait StateMachineLike {
    /// Push a new state onto the stack.
    fn push(&mut self, state: Box<dyn State>);

    /// Pop the current top state.
    fn pop(&mut self);
}

/// A mode of the application managed by a [`StateMachine`].
pub trait State {
    /// Called when this state is pushed onto the stack.
    fn on_enter(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Called when this state is popped from the stack.
    fn on_exit(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Called when the state above this one was popped.
    fn on_resume(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Update this state. Called every frame while it is on top.
    /// The state machine is provided so states can transition to other states.
    fn update(&mut self, ctx: &mut EngineContext, state_machine: &mut dyn StateMachineLike) -> Result<()>;

    /// Queue this frame's drawing.
    fn draw(&self, list: &mut DrawList);
}

/// Internal helper to allow states to queue transitions without borrow conflicts.
struct StateTransitionHelper<'a> {
    pending_push: &'a mut Option<Box<dyn State>>,
    pending_pop: &'a mut bool,
}

impl<'a> StateMachineLike for StateTransitionHelper<'a> {
    fn push(&mut self, state: Box<dyn State>) {
        *self.pending_push = Some(state);
    }

    fn pop(&mut self) {
        *self.pending_pop = true;
    }
}

/// Stack of application states.
///
/// Only the top state is updated and drawn. Transitions requested during an
/// update are applied at the start of the next frame.
pub struct StateMachine {
    states: Vec<Box<dyn State>>,
    pending_push: Option<Box<dyn State>>,
    pending_pop: bool,
}

impl StateMachine {
    /// Create a new empty state machine.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            pending_push: None,
            pending_pop: false,
        }
    }

    /// Create a state machine with an initial state.
    pub fn with_initial_state(initial: Box<dyn State>) -> Self {
        let mut sm = Self::new();
        // on_enter runs in init_top_state once the engine starts
        sm.states.push(initial);
        sm
    }

    /// Queue a push, applied at the start of the next frame.
    pub fn push(&mut self, state: Box<dyn State>) {
        self.pending_push = Some(state);
    }

    /// Queue a pop, applied at the start of the next frame.
    pub fn pop(&mut self) {
        self.pending_pop = true;
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Apply pending state transitions.
    pub fn apply_transitions(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if self.pending_pop {
            self.pending_pop = false;
            if let Some(mut state) = self.states.pop() {
                state.on_exit(ctx)?;
            }
            if let Some(state) = self.states.last_mut() {
                state.on_resume(ctx)?;
            }
        }

        if let Some(mut new_state) = self.pending_push.take() {
            new_state.on_enter(ctx)?;
            self.states.push(new_state);
        }

        Ok(())
    }

    /// Update the top state (if any).
    pub fn update_top(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if let Some(state) = self.states.last_mut() {
            let mut helper = StateTransitionHelper {
                pending_push: &mut self.pending_push,
                pending_pop: &mut self.pending_pop,
            };
            state.update(ctx, &mut helper)?;
        }
        Ok(())
    }

    /// Draw the top state (if any).
    pub fn draw_top(&self, list: &mut DrawList) {
        if let Some(state) = self.states.last() {
            state.draw(list);
        }
    }

    /// Call on_enter for the top state (used for initial state initialization).
    pub fn init_top_state(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if let Some(state) = self.states.last_mut() {
            state.on_enter(ctx)?;
        }
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
