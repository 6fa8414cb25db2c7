use serde::{Deserialize, Serialize};

/// Boolean movement intents sampled once per frame.
///
/// `jump_pressed` is an edge (true only on the frame the button went down);
/// everything else is a held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump_pressed: bool,
    pub dash: bool,
    pub glide: bool,
    pub slide: bool,
}

impl InputSnapshot {
    /// Copy of this snapshot with the one-frame edge flags cleared. Used for
    /// every substep after the first so a single press is not applied twice.
    pub fn without_edges(&self) -> Self {
        Self {
            jump_pressed: false,
            ..*self
        }
    }
}

/// Turns a held jump button into a single-tick `jump_pressed` edge.
///
/// A press that arrives between ticks is kept until the next call to
/// [`JumpLatch::take`], so a quick tap is not lost when input is sampled
/// faster than the simulation runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpLatch {
    held: bool,
    pending: bool,
}

impl JumpLatch {
    /// Record the current raw button state.
    pub fn observe(&mut self, jump_held: bool) {
        if jump_held && !self.held {
            self.pending = true;
        }
        self.held = jump_held;
    }

    /// Consume the pending edge, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_edges_clears_jump_only() {
        let input = InputSnapshot {
            right: true,
            jump_pressed: true,
            glide: true,
            ..Default::default()
        };
        let rest = input.without_edges();
        assert!(!rest.jump_pressed);
        assert!(rest.right);
        assert!(rest.glide);
    }

    #[test]
    fn latch_fires_once_per_press() {
        let mut latch = JumpLatch::default();
        latch.observe(true);
        assert!(latch.take());
        latch.observe(true);
        assert!(!latch.take(), "held button must not re-trigger");
        latch.observe(false);
        latch.observe(true);
        assert!(latch.take());
    }

    #[test]
    fn latch_keeps_tap_between_ticks() {
        let mut latch = JumpLatch::default();
        latch.observe(true);
        latch.observe(false);
        assert!(latch.take(), "press released before the tick still counts");
        assert!(!latch.take());
    }
}
