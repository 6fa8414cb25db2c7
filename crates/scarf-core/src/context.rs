use std::collections::BTreeMap;

use crate::events::{EventDispatcher, GameEvent};

/// Application-wide state handed to scenes by reference.
///
/// Constructed once by the top-level application and passed `&mut` into
/// every scene call; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct GameContext {
    pub dispatcher: EventDispatcher,
    /// Level the active scene should load.
    pub current_level: u32,
    /// Seconds the current run has been simulated.
    pub elapsed: f32,
    /// Fastest completion time per level, in seconds. In memory only.
    best_times: BTreeMap<u32, f32>,
}

impl GameContext {
    pub fn new(current_level: u32) -> Self {
        Self {
            current_level,
            ..Self::default()
        }
    }

    /// Route scene events to their registered handlers.
    pub fn emit(&mut self, events: &[GameEvent]) {
        self.dispatcher.dispatch_all(events);
    }

    /// Record a completion time for `level`. Returns true when it is a new
    /// best (or the first) time for that level.
    pub fn record_time(&mut self, level: u32, time: f32) -> bool {
        if !time.is_finite() || time < 0.0 {
            tracing::debug!(level, time, "Ignoring invalid completion time");
            return false;
        }
        match self.best_times.get(&level) {
            Some(&best) if best <= time => false,
            _ => {
                self.best_times.insert(level, time);
                true
            },
        }
    }

    pub fn best_time(&self, level: u32) -> Option<f32> {
        self.best_times.get(&level).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::events::EventKind;

    #[test]
    fn record_time_keeps_fastest() {
        let mut ctx = GameContext::new(1);
        assert!(ctx.record_time(1, 42.0));
        assert!(!ctx.record_time(1, 50.0));
        assert!(ctx.record_time(1, 30.0));
        assert_eq!(ctx.best_time(1), Some(30.0));
        assert_eq!(ctx.best_time(2), None);
    }

    #[test]
    fn record_time_rejects_nan() {
        let mut ctx = GameContext::new(1);
        assert!(!ctx.record_time(1, f32::NAN));
        assert_eq!(ctx.best_time(1), None);
    }

    #[test]
    fn emit_dispatches_through_context() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ctx = GameContext::new(1);
        {
            let count = Arc::clone(&count);
            ctx.dispatcher.on(EventKind::Respawned, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        ctx.emit(&[GameEvent::Respawned, GameEvent::Jumped, GameEvent::Respawned]);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
