use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which side of the player a wall is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    Left,
    Right,
}

/// Gameplay events emitted by a scene during `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: u32 },
    Landed { impact_speed: f32 },
    Jumped,
    WallJumped { away_from: WallSide },
    Dashed { direction: i8 },
    WallSlideStarted { side: WallSide },
    ClimbStarted,
    FellOutOfWorld,
    Respawned,
    GoalReached { time: f32 },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::LevelLoaded { .. } => EventKind::LevelLoaded,
            GameEvent::Landed { .. } => EventKind::Landed,
            GameEvent::Jumped => EventKind::Jumped,
            GameEvent::WallJumped { .. } => EventKind::WallJumped,
            GameEvent::Dashed { .. } => EventKind::Dashed,
            GameEvent::WallSlideStarted { .. } => EventKind::WallSlideStarted,
            GameEvent::ClimbStarted => EventKind::ClimbStarted,
            GameEvent::FellOutOfWorld => EventKind::FellOutOfWorld,
            GameEvent::Respawned => EventKind::Respawned,
            GameEvent::GoalReached { .. } => EventKind::GoalReached,
        }
    }
}

/// Payload-free discriminant of [`GameEvent`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LevelLoaded,
    Landed,
    Jumped,
    WallJumped,
    Dashed,
    WallSlideStarted,
    ClimbStarted,
    FellOutOfWorld,
    Respawned,
    GoalReached,
}

/// Boxed event callback.
pub type EventHandler = Box<dyn FnMut(&GameEvent) + Send>;

/// Observer table: handlers registered per [`EventKind`], invoked in
/// registration order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every event of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Invoke every handler registered for this event's kind. Returns the
    /// number of handlers run.
    pub fn dispatch(&mut self, event: &GameEvent) -> usize {
        match self.handlers.get_mut(&event.kind()) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(event);
                }
                handlers.len()
            },
            None => {
                tracing::trace!(kind = ?event.kind(), "No handlers for event");
                0
            },
        }
    }

    pub fn dispatch_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.dispatch(event);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(EventKind, usize)> =
            self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(k, _)| format!("{k:?}"));
        f.debug_struct("EventDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}
