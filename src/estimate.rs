//! Debounce and staleness guards for live gas estimation.
//!
//! The form re-estimates gas while the user types. Estimation only fires
//! after an idle window with no further edits, and each attempt carries a
//! generation so a slow, superseded response can never overwrite a newer one.

use std::time::{Duration, Instant};

/// Idle-window debouncer. Each edit restarts the window; `ready` fires at
/// most once per window.
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an edit, restarting the idle window.
    pub fn mark_edit(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True once the idle window has elapsed since the last edit. Consumes
    /// the pending deadline so each window fires exactly once.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Monotonic attempt counter; only the newest attempt's result may be
/// applied to displayed state.
#[derive(Default)]
pub struct GenerationGate {
    latest: u64,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for a new estimation attempt.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether an attempt's result is still the newest one.
    pub fn admit(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(800);

    // ==================== Debouncer tests ====================

    #[test]
    fn test_debouncer_fires_after_idle_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.mark_edit(t0);
        assert!(!debouncer.ready(t0 + Duration::from_millis(799)));
        assert!(debouncer.ready(t0 + Duration::from_millis(800)));
    }

    #[test]
    fn test_debouncer_three_rapid_edits_fire_once() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.mark_edit(t0);
        debouncer.mark_edit(t0 + Duration::from_millis(100));
        debouncer.mark_edit(t0 + Duration::from_millis(200));

        // Window restarts from the last edit, so 800ms after the first edit
        // nothing fires yet.
        assert!(!debouncer.ready(t0 + Duration::from_millis(800)));
        assert!(debouncer.ready(t0 + Duration::from_millis(1000)));
        // And only once per window.
        assert!(!debouncer.ready(t0 + Duration::from_millis(1100)));
    }

    #[test]
    fn test_debouncer_pending_tracks_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.pending());

        debouncer.mark_edit(t0);
        assert!(debouncer.pending());

        assert!(debouncer.ready(t0 + WINDOW));
        assert!(!debouncer.pending());
    }

    // ==================== GenerationGate tests ====================

    #[test]
    fn test_generation_gate_admits_newest_only() {
        let mut gate = GenerationGate::new();
        let first = gate.next();
        let second = gate.next();

        // The slow first attempt completes after the second was issued; its
        // result must be discarded.
        assert!(!gate.admit(first));
        assert!(gate.admit(second));
    }

    #[test]
    fn test_generation_gate_single_attempt_admitted() {
        let mut gate = GenerationGate::new();
        let only = gate.next();
        assert!(gate.admit(only));
    }
}
