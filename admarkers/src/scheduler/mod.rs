//! Two-phase ad scheduling.
//!
//! The [`AdScheduler`] layers a prepare/fire protocol on top of position
//! tracking: for each upcoming cue it emits a [`Prepare`](AdAction::Prepare)
//! action well before the cue is due, so the collaborator can pre-load the
//! ad content, and a [`Fire`](AdAction::Fire) action at the crossing
//! instant. Firing sets the `ad_active` gate; the scheduler then ignores
//! clock samples until the collaborator reports ad completion by clearing
//! the gate, at which point the pending prepare for the following cue goes
//! out on the next sample.
//!
//! The scheduler itself is effect-free: it returns at most one [`AdAction`]
//! per sample and the engine layer maps actions to the configured
//! callbacks.

use tracing::debug;

use crate::marker::{Marker, MarkerStore};
use crate::player::NO_TIME;
use crate::tracker::PositionTracker;

/// What the engine should do in response to a clock sample.
#[derive(Debug, Clone)]
pub enum AdAction<M> {
    /// Pre-load content for this upcoming cue.
    Prepare(Marker<M>),
    /// Hand playback over to this cue's content now.
    Fire(Marker<M>),
}

/// Drives the prepare → fire protocol over the marker sequence.
///
/// Holds an owned copy of the cue it will act on next, mirroring the
/// marker's state at scheduling time: a cue removed from the store after
/// being scheduled still prepares and fires. Store mutations do not
/// recompute the upcoming cue; only [`initialize`](Self::initialize) and
/// [`reset`](Self::reset) re-derive it from the start of the timeline, so a
/// marker added earlier than the scheduled cue after tracking has started
/// is not picked up.
#[derive(Debug, Default)]
pub struct AdScheduler<M> {
    /// Interval cursor, kept consistent while scheduling is live.
    tracker: PositionTracker,
    /// The cue to prepare/fire next, or `None` once exhausted.
    next: Option<Marker<M>>,
    /// Whether the prepare for `next` has yet to be issued.
    prepare_pending: bool,
    /// Set on fire; cleared externally when the inserted content finishes.
    ad_active: bool,
}

impl<M: Clone + 'static> AdScheduler<M> {
    /// Create a scheduler with no cue scheduled.
    pub fn new() -> Self {
        Self {
            tracker: PositionTracker::new(),
            next: None,
            prepare_pending: false,
            ad_active: false,
        }
    }

    /// Derive the first cue from the start of the timeline.
    ///
    /// Picks the earliest marker at or after time zero; if one exists, the
    /// prepare for it is issued immediately through the returned action.
    /// Called once the host's metadata is known, and again on an explicit
    /// reset.
    pub fn initialize(&mut self, store: &MarkerStore<M>) -> Option<AdAction<M>> {
        self.tracker.reset();
        self.prepare_pending = false;
        self.ad_active = false;
        self.next = store
            .markers()
            .iter()
            .find(|m| store.time_of(m) >= 0.0)
            .cloned();
        self.next.as_ref().map(|m| {
            debug!(time = store.time_of(m), "scheduling first ad cue");
            AdAction::Prepare(m.clone())
        })
    }

    /// Feed one clock sample, returning at most one action.
    ///
    /// No-op while an ad occupies playback or once the cue sequence is
    /// exhausted. A sample equal to [`NO_TIME`] is skipped when checking
    /// whether the cue is due, so hosts that report `0.0` before playback
    /// starts never trigger a spurious fire.
    pub fn sample(
        &mut self,
        t: f64,
        store: &MarkerStore<M>,
        duration: f64,
    ) -> Option<AdAction<M>> {
        if self.ad_active {
            return None;
        }
        self.tracker.observe(t, store, duration);

        let next = self.next.as_ref()?;
        if self.prepare_pending {
            self.prepare_pending = false;
            debug!(time = store.time_of(next), "preparing next ad cue");
            return Some(AdAction::Prepare(next.clone()));
        }
        if t == NO_TIME {
            return None;
        }
        if t >= store.time_of(next) {
            let fired = self.next.take();
            self.ad_active = true;
            self.next = fired
                .as_ref()
                .and_then(|m| Self::advance_past(m, store, t));
            self.prepare_pending = self.next.is_some();
            debug!(time = t, more = self.next.is_some(), "ad cue fired");
            return fired.map(AdAction::Fire);
        }
        None
    }

    /// First marker with time at or after `t`, scanning forward from the
    /// cue that just fired.
    ///
    /// The scan starts after the fired cue's position, so a sample landing
    /// exactly on the cue's time never re-selects it, and an equal-time cue
    /// behind it is still picked up. A fired cue no longer in the store
    /// (removed after scheduling) falls back to scanning the whole
    /// sequence.
    fn advance_past(
        fired: &Marker<M>,
        store: &MarkerStore<M>,
        t: f64,
    ) -> Option<Marker<M>> {
        let markers = store.markers();
        let start = markers
            .iter()
            .position(|m| m.key() == fired.key())
            .map_or(0, |index| index + 1);
        markers[start..]
            .iter()
            .find(|m| store.time_of(m) >= t)
            .cloned()
    }

    /// Whether a fired ad currently occupies playback.
    pub fn ad_active(&self) -> bool {
        self.ad_active
    }

    /// Externally settable completion gate.
    ///
    /// The collaborator clears this once the inserted content finishes;
    /// the scheduler performs no completion detection of its own.
    pub fn set_ad_active(&mut self, active: bool) {
        self.ad_active = active;
    }

    /// The cue scheduled to prepare/fire next.
    pub fn upcoming(&self) -> Option<&Marker<M>> {
        self.next.as_ref()
    }

    /// The interval cursor maintained alongside scheduling.
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Drop the interval cursor after marker removal.
    ///
    /// Scheduling state is untouched: the upcoming cue keeps its owned copy
    /// and still fires.
    pub fn reset_tracking(&mut self) {
        self.tracker.reset();
    }

    /// Drop all scheduling state, returning to the uninitialized position.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.next = None;
        self.prepare_pending = false;
        self.ad_active = false;
    }
}
