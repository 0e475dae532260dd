//! Ad-insertion engine (two-phase prepare → fire protocol).

use tracing::{debug, info};

use super::config::{AdEngineConfig, MarkerCallback};
use super::surface::MarkerSurface;
use super::Lifecycle;
use crate::marker::{Marker, MarkerKey};
use crate::player::PlayerClock;
use crate::render::MarkerRenderer;
use crate::scheduler::{AdAction, AdScheduler};

/// Schedules ad cues against the host clock: a prepare callback ahead of
/// each cue, a play callback at the crossing instant, and a pause in
/// tracking while the inserted content runs.
///
/// The host signals ad completion by clearing [`set_ad_active`](Self::set_ad_active);
/// the engine performs no completion detection of its own. Adding or
/// removing markers after initialization does not reschedule the upcoming
/// cue: only construction and [`reset`](Self::reset) re-derive the
/// schedule from the start of the timeline.
pub struct AdEngine<M> {
    surface: MarkerSurface<M>,
    scheduler: AdScheduler<M>,
    /// Dropped on destroy; no clock, no further samples.
    clock: Option<Box<dyn PlayerClock>>,
    state: Lifecycle,
    initial_markers: Vec<M>,
    prepare_next_ad: Option<MarkerCallback<M>>,
    play_ad: Option<MarkerCallback<M>>,
    on_marker_click: Option<MarkerCallback<M>>,
}

impl<M: Clone + 'static> AdEngine<M> {
    /// Create an engine handle. Scheduling starts when the host reports
    /// metadata via [`handle_metadata_ready`](Self::handle_metadata_ready).
    pub fn new(
        clock: impl PlayerClock + 'static,
        renderer: impl MarkerRenderer<M> + 'static,
        config: AdEngineConfig<M>,
    ) -> Self {
        Self {
            surface: MarkerSurface::new(config.get_marker_time, Box::new(renderer)),
            scheduler: AdScheduler::new(),
            clock: Some(Box::new(clock)),
            state: Lifecycle::Uninitialized,
            initial_markers: config.markers,
            prepare_next_ad: config.prepare_next_ad,
            play_ad: config.play_ad,
            on_marker_click: config.on_marker_click,
        }
    }

    /// Host notification: media metadata (duration) is known.
    ///
    /// Adds the configured cues and derives the first upcoming cue,
    /// issuing its prepare immediately. Ignored while Active (a second
    /// initialization mid-playback would desynchronize the schedule from
    /// the ads the host has already played) and after destroy.
    pub fn handle_metadata_ready(&mut self) {
        match self.state {
            Lifecycle::Uninitialized => {}
            Lifecycle::Active => {
                debug!("metadata notification ignored; engine already active");
                return;
            }
            Lifecycle::Destroyed => return,
        }
        self.state = Lifecycle::Active;
        self.surface.remove_all();
        let initial = std::mem::take(&mut self.initial_markers);
        let duration = self.duration();
        self.surface.add(initial, duration);
        info!(cues = self.surface.store.len(), "ad engine initialized");
        if let Some(action) = self.scheduler.initialize(&self.surface.store) {
            self.dispatch(action);
        }
    }

    /// Host notification: playback time advanced (or jumped).
    pub fn handle_time_update(&mut self) {
        if self.state != Lifecycle::Active {
            return;
        }
        let Some(clock) = self.clock.as_ref() else {
            return;
        };
        let t = clock.current_time();
        let duration = clock.duration();
        if let Some(action) = self.scheduler.sample(t, &self.surface.store, duration) {
            self.dispatch(action);
        }
    }

    /// Insert cues, rendering one element per cue.
    ///
    /// Does not reschedule: a cue added earlier than the currently upcoming
    /// one is not picked up until a [`reset`](Self::reset).
    pub fn add(&mut self, payloads: Vec<M>) {
        if self.state != Lifecycle::Active {
            debug!("add ignored; engine not active");
            return;
        }
        let duration = self.duration();
        self.surface.add(payloads, duration);
    }

    /// Remove cues by position in the current sorted sequence.
    ///
    /// Drops the interval cursor (positions shifted) but keeps the upcoming
    /// cue: a scheduled cue fires even after its marker is removed.
    pub fn remove(&mut self, indices: &[usize]) {
        if self.state != Lifecycle::Active {
            debug!("remove ignored; engine not active");
            return;
        }
        self.surface.remove(indices);
        self.scheduler.reset_tracking();
    }

    /// Remove every cue.
    pub fn remove_all(&mut self) {
        if self.state != Lifecycle::Active {
            return;
        }
        self.surface.remove_all();
        self.scheduler.reset_tracking();
    }

    /// Replace all cues and re-derive the schedule from the start of the
    /// timeline, issuing the prepare for the new first cue immediately.
    pub fn reset(&mut self, payloads: Vec<M>) {
        if self.state != Lifecycle::Active {
            return;
        }
        self.surface.remove_all();
        let duration = self.duration();
        self.surface.add(payloads, duration);
        if let Some(action) = self.scheduler.initialize(&self.surface.store) {
            self.dispatch(action);
        }
    }

    /// The cues in ascending time order.
    pub fn markers(&self) -> &[Marker<M>] {
        self.surface.store.markers()
    }

    /// The cue scheduled to prepare/fire next.
    pub fn upcoming_marker(&self) -> Option<&Marker<M>> {
        self.scheduler.upcoming()
    }

    /// The marker whose interval contains the last resolved sample.
    pub fn current_marker(&self) -> Option<&Marker<M>> {
        self.scheduler
            .tracker()
            .current()
            .and_then(|index| self.surface.store.get(index))
    }

    /// Whether a fired ad currently occupies playback.
    pub fn ad_active(&self) -> bool {
        self.scheduler.ad_active()
    }

    /// Externally settable completion gate; clear it once the inserted
    /// content finishes to resume tracking.
    pub fn set_ad_active(&mut self, active: bool) {
        if self.state != Lifecycle::Active {
            return;
        }
        debug!(active, "ad occupancy changed");
        self.scheduler.set_ad_active(active);
    }

    /// Host notification: the element for `key` was clicked.
    pub fn notify_marker_click(&mut self, key: MarkerKey) {
        if self.state != Lifecycle::Active {
            return;
        }
        if let Some(marker) = self.surface.store.get_by_key(key) {
            if let Some(callback) = self.on_marker_click.as_mut() {
                callback(marker);
            }
        }
    }

    /// Tear down: remove all cues and detach from the clock.
    pub fn destroy(&mut self) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.surface.remove_all();
        self.scheduler.reset();
        self.clock = None;
        self.state = Lifecycle::Destroyed;
        info!("ad engine destroyed");
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    fn duration(&self) -> f64 {
        self.clock.as_ref().map(|c| c.duration()).unwrap_or(0.0)
    }

    fn dispatch(&mut self, action: AdAction<M>) {
        match action {
            AdAction::Prepare(marker) => {
                if let Some(callback) = self.prepare_next_ad.as_mut() {
                    callback(&marker);
                }
            }
            AdAction::Fire(marker) => {
                if let Some(callback) = self.play_ad.as_mut() {
                    callback(&marker);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{RecordingRenderer, SharedLog, TestClock};

    fn ad_engine(times: &[f64], clock: &TestClock, log: &SharedLog) -> AdEngine<f64> {
        let prepared = log.clone();
        let played = log.clone();
        let config = AdEngineConfig::new(|t: &f64| *t)
            .with_markers(times.to_vec())
            .with_prepare_next_ad(move |marker| {
                prepared.push(format!("prepare {}", marker.payload()));
            })
            .with_play_ad(move |marker| {
                played.push(format!("play {}", marker.payload()));
            });
        AdEngine::new(clock.clone(), RecordingRenderer::new(log.clone()), config)
    }

    fn advance(engine: &mut AdEngine<f64>, clock: &TestClock, t: f64) {
        clock.set_time(t);
        engine.handle_time_update();
    }

    #[test]
    fn test_initialization_prepares_first_cue() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);

        engine.handle_metadata_ready();
        assert_eq!(
            log.take(),
            vec!["create 5 @50.0%", "prepare 5"]
        );
    }

    #[test]
    fn test_two_phase_order() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        for t in [1.0, 2.0, 4.5] {
            advance(&mut engine, &clock, t);
        }
        assert!(log.take().is_empty());
        assert!(!engine.ad_active());

        advance(&mut engine, &clock, 6.0);
        assert_eq!(log.take(), vec!["play 5"]);
        assert!(engine.ad_active());

        // Ignored while the ad occupies playback.
        advance(&mut engine, &clock, 7.0);
        advance(&mut engine, &clock, 8.0);
        assert!(log.take().is_empty());

        engine.set_ad_active(false);
        advance(&mut engine, &clock, 9.0);
        assert!(log.take().is_empty());
    }

    #[test]
    fn test_pre_start_sample_never_fires() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[0.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        advance(&mut engine, &clock, 0.0);
        assert!(log.take().is_empty());
        advance(&mut engine, &clock, 0.25);
        assert_eq!(log.take(), vec!["play 0"]);
    }

    #[test]
    fn test_second_cue_prepares_after_completion() {
        let clock = TestClock::new(30.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0, 20.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        advance(&mut engine, &clock, 6.0);
        assert_eq!(log.take(), vec!["play 5"]);

        engine.set_ad_active(false);
        advance(&mut engine, &clock, 7.0);
        assert_eq!(log.take(), vec!["prepare 20"]);
        advance(&mut engine, &clock, 21.0);
        assert_eq!(log.take(), vec!["play 20"]);
    }

    #[test]
    fn test_double_initialization_is_ignored() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        engine.handle_metadata_ready();
        assert!(log.take().is_empty());
        assert_eq!(engine.markers().len(), 1);
    }

    #[test]
    fn test_reset_rederives_schedule_from_start() {
        let clock = TestClock::new(30.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);
        engine.handle_metadata_ready();
        advance(&mut engine, &clock, 6.0);
        log.take();

        engine.reset(vec![8.0, 25.0]);
        // Fresh schedule from time zero: ad occupancy cleared, first cue
        // prepared immediately.
        assert!(!engine.ad_active());
        assert_eq!(engine.markers().len(), 2);
        let events = log.take();
        assert!(events.contains(&"prepare 8".to_string()));

        advance(&mut engine, &clock, 9.0);
        assert_eq!(log.take(), vec!["play 8"]);
    }

    #[test]
    fn test_add_does_not_reschedule() {
        let clock = TestClock::new(30.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[20.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        // An earlier cue added after initialization is not picked up.
        engine.add(vec![5.0]);
        advance(&mut engine, &clock, 6.0);
        assert_eq!(log.take(), vec!["create 5 @16.7%"]);
        assert_eq!(
            engine.upcoming_marker().map(|m| *m.payload()),
            Some(20.0)
        );
    }

    #[test]
    fn test_current_marker_tracks_intervals_while_scheduling() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);
        engine.handle_metadata_ready();

        advance(&mut engine, &clock, 2.0);
        assert!(engine.current_marker().is_none());
        advance(&mut engine, &clock, 6.0);
        assert_eq!(engine.current_marker().map(|m| *m.payload()), Some(5.0));
    }

    #[test]
    fn test_click_invokes_callback() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let clicked = log.clone();
        let config = AdEngineConfig::new(|t: &f64| *t)
            .with_markers(vec![5.0])
            .with_on_marker_click(move |marker| {
                clicked.push(format!("clicked {}", marker.payload()));
            });
        let mut engine = AdEngine::new(
            clock.clone(),
            RecordingRenderer::new(log.clone()),
            config,
        );
        engine.handle_metadata_ready();
        log.take();

        let key = engine.markers()[0].key();
        engine.notify_marker_click(key);
        assert_eq!(log.take(), vec!["clicked 5"]);
    }

    #[test]
    fn test_destroy_detaches() {
        let clock = TestClock::new(10.0);
        let log = SharedLog::new();
        let mut engine = ad_engine(&[5.0], &clock, &log);
        engine.handle_metadata_ready();
        log.take();

        engine.destroy();
        assert_eq!(log.take(), vec!["remove 5"]);
        advance(&mut engine, &clock, 6.0);
        assert!(log.take().is_empty());
    }
}
