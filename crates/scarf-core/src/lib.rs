pub mod context;
pub mod events;
pub mod input;
pub mod math;
pub mod scene;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::context::GameContext;
    use crate::events::GameEvent;
    use crate::input::InputSnapshot;
    use crate::scene::{Scene, run_frame};

    /// Run `n` frames with the same input, returning all accumulated events.
    pub fn run_frames(
        scene: &mut dyn Scene,
        ctx: &mut GameContext,
        n: usize,
        dt: f32,
        input: &InputSnapshot,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(run_frame(scene, ctx, dt, input));
        }
        all_events
    }

    // ================================================================
    // Scene Contract Tests
    // ================================================================
    // Generic checks every Scene implementation must pass. Scene crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(scene: &mut dyn Scene, ctx: &mut GameContext) {
        scene.init(ctx);
        let state = scene.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// update() with dt>0 must advance the simulation.
    pub fn contract_update_advances_state(scene: &mut dyn Scene, ctx: &mut GameContext) {
        let before = scene.serialize_state();
        scene.update(ctx, 0.1, &InputSnapshot::default());
        let after = scene.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance scene state");
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves(scene: &mut dyn Scene) {
        let state_a = scene.serialize_state();
        scene.apply_state(&state_a);
        let state_b = scene.serialize_state();
        assert_eq!(state_a, state_b, "State must survive a snapshot roundtrip");
    }

    /// Garbage snapshots must be ignored rather than corrupt the scene.
    pub fn contract_malformed_state_ignored(scene: &mut dyn Scene) {
        let before = scene.serialize_state();
        scene.apply_state(&[0xc1, 0xff, 0x00]);
        assert_eq!(before, scene.serialize_state());
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(scene: &mut dyn Scene, ctx: &mut GameContext) {
        let input = InputSnapshot::default();
        scene.pause();
        let before = scene.serialize_state();
        scene.update(ctx, 0.1, &input);
        let during_pause = scene.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        scene.resume();
        scene.update(ctx, 0.1, &input);
        let after_resume = scene.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }
}
