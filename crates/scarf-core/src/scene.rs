use crate::context::GameContext;
use crate::events::GameEvent;
use crate::input::InputSnapshot;

/// Core trait implemented by every playable scene.
///
/// The application owns the [`GameContext`] and the frame clock; the scene
/// only handles its own simulation.
pub trait Scene {
    /// Human-readable scene name for logs.
    fn name(&self) -> &str;

    /// Called once before the first update, and again on reload.
    fn init(&mut self, ctx: &mut GameContext);

    /// Called each frame with the wall-clock delta in seconds. Returns the
    /// events produced during this frame.
    fn update(&mut self, ctx: &mut GameContext, dt: f32, input: &InputSnapshot)
    -> Vec<GameEvent>;

    /// Snapshot of the simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore a snapshot produced by [`Scene::serialize_state`]. Malformed
    /// bytes are ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Whether the scene has reached its end (level complete).
    fn is_complete(&self) -> bool;
}

/// Update `scene` for one frame and route its events through the context's
/// dispatcher. Returns the events for callers that also want to inspect them.
pub fn run_frame(
    scene: &mut dyn Scene,
    ctx: &mut GameContext,
    dt: f32,
    input: &InputSnapshot,
) -> Vec<GameEvent> {
    let events = scene.update(ctx, dt, input);
    ctx.elapsed += dt.max(0.0);
    ctx.emit(&events);
    events
}

/// Generates the snapshot/pause/complete `Scene` methods shared by scenes.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and `$StateType` to have a `complete: bool` field.
#[macro_export]
macro_rules! scene_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("scene state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed scene snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_complete(&self) -> bool {
            self.state.complete
        }
    };
}
