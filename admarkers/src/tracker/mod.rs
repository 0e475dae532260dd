//! Position tracking against the marker timeline.
//!
//! The [`PositionTracker`] consumes clock samples and decides whether each
//! sample has moved into a different marker interval than the last resolved
//! one. Markers partition the timeline into half-open intervals
//! `[time(i), time(i + 1))`, with the last interval closed by the media
//! duration; a sample before the first marker (or past the end of the
//! timeline) resolves to no interval at all.
//!
//! The cursor is derived state, not authoritative: it can always be
//! recomputed from the store and the latest sample, which is exactly what
//! happens whenever the O(1) containment fast path fails. Backward seeks
//! therefore need no special casing.

use tracing::debug;

use crate::marker::MarkerStore;

/// Resolves clock samples to marker intervals and reports transitions.
///
/// # Example
///
/// ```
/// use admarkers::marker::MarkerStore;
/// use admarkers::tracker::PositionTracker;
///
/// let mut store = MarkerStore::new(|t: &f64| *t);
/// store.add(vec![10.0, 20.0]);
///
/// let mut tracker = PositionTracker::new();
/// assert_eq!(tracker.observe(5.0, &store, 40.0), None);
/// assert_eq!(tracker.observe(12.0, &store, 40.0), Some(0));
/// assert_eq!(tracker.observe(15.0, &store, 40.0), None); // same interval
/// assert_eq!(tracker.observe(20.0, &store, 40.0), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct PositionTracker {
    /// Index of the currently resolved interval; `None` until a marker has
    /// been reached, and again after a seek to before the first marker.
    current: Option<usize>,
}

impl PositionTracker {
    /// Create a tracker in the unresolved state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently resolved interval index.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Return the cursor to the unresolved state.
    ///
    /// Called after markers are removed: removal shifts positions, so any
    /// previously resolved index is meaningless. The next sample re-resolves
    /// from scratch and fires again even for an interval that was already
    /// current before the removal.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Feed one clock sample, returning the index of a newly entered marker
    /// interval.
    ///
    /// Returns `Some(index)` exactly when the sample resolved to a marker
    /// interval different from the current one; moving into the unresolved
    /// state (before the first marker, past the end, or on an empty store)
    /// updates the cursor but returns `None`. Repeated samples inside the
    /// resolved interval are rejected by an O(1) containment check without
    /// rescanning.
    pub fn observe<M: 'static>(
        &mut self,
        t: f64,
        store: &MarkerStore<M>,
        duration: f64,
    ) -> Option<usize> {
        if let Some(index) = self.current {
            if let Some(start) = store.time_at(index) {
                let end = store.time_at(index + 1).unwrap_or(duration);
                if t >= start && t < end {
                    return None;
                }
            }
        }

        let resolved = Self::resolve(t, store, duration);
        if resolved == self.current {
            return None;
        }
        debug!(from = ?self.current, to = ?resolved, time = t, "interval transition");
        self.current = resolved;
        resolved
    }

    /// Resolve a sample to the interval containing it, scanning the sorted
    /// sequence.
    ///
    /// Linear over the markers; counts are small in practice, and the fast
    /// path in [`observe`](Self::observe) keeps steady-state sampling O(1).
    fn resolve<M: 'static>(t: f64, store: &MarkerStore<M>, duration: f64) -> Option<usize> {
        let markers = store.markers();
        let first = markers.first()?;
        if t < store.time_of(first) {
            return None;
        }
        markers.iter().enumerate().find_map(|(index, marker)| {
            let start = store.time_of(marker);
            let end = markers
                .get(index + 1)
                .map(|next| store.time_of(next))
                .unwrap_or(duration);
            (t >= start && t < end).then_some(index)
        })
    }
}
