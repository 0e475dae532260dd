//! Marker-reached engine (direct transition callbacks).

use tracing::{debug, info};

use super::config::{MarkerCallback, MarkerEngineConfig};
use super::surface::MarkerSurface;
use super::Lifecycle;
use crate::marker::{Marker, MarkerKey};
use crate::player::PlayerClock;
use crate::render::MarkerRenderer;
use crate::tracker::PositionTracker;

/// Tracks the host clock against the marker timeline and invokes the
/// configured callback once per interval crossing.
///
/// # Example
///
/// ```no_run
/// use admarkers::engine::{MarkerEngine, MarkerEngineConfig};
/// use admarkers::render::NullRenderer;
/// # struct HostClock;
/// # impl admarkers::player::PlayerClock for HostClock {
/// #     fn current_time(&self) -> f64 { 0.0 }
/// #     fn duration(&self) -> f64 { 0.0 }
/// # }
///
/// #[derive(Debug, Clone)]
/// struct Cue { time: f64 }
///
/// let config = MarkerEngineConfig::new(|cue: &Cue| cue.time)
///     .with_markers(vec![Cue { time: 30.0 }])
///     .with_on_marker_reached(|marker| println!("reached {:?}", marker.payload()));
///
/// let mut engine = MarkerEngine::new(HostClock, NullRenderer, config);
/// engine.handle_metadata_ready();
/// // ...the host now forwards every time-advanced notification:
/// engine.handle_time_update();
/// ```
pub struct MarkerEngine<M> {
    surface: MarkerSurface<M>,
    tracker: PositionTracker,
    /// Dropped on destroy; no clock, no further samples.
    clock: Option<Box<dyn PlayerClock>>,
    state: Lifecycle,
    announce_time: f64,
    initial_markers: Vec<M>,
    on_marker_reached: Option<MarkerCallback<M>>,
    on_marker_click: Option<MarkerCallback<M>>,
}

impl<M: 'static> MarkerEngine<M> {
    /// Create an engine handle. Nothing fires until the host reports
    /// metadata via [`handle_metadata_ready`](Self::handle_metadata_ready).
    pub fn new(
        clock: impl PlayerClock + 'static,
        renderer: impl MarkerRenderer<M> + 'static,
        config: MarkerEngineConfig<M>,
    ) -> Self {
        Self {
            surface: MarkerSurface::new(config.get_marker_time, Box::new(renderer)),
            tracker: PositionTracker::new(),
            clock: Some(Box::new(clock)),
            state: Lifecycle::Uninitialized,
            announce_time: config.announce_time,
            initial_markers: config.markers,
            on_marker_reached: config.on_marker_reached,
            on_marker_click: config.on_marker_click,
        }
    }

    /// Host notification: media metadata (duration) is known.
    ///
    /// Adds the configured markers and evaluates the clock once, so an
    /// engine attached mid-playback fires for the interval it lands in.
    /// Ignored while Active and after destroy.
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
        self.tracker.reset();
        let initial = std::mem::take(&mut self.initial_markers);
        let duration = self.duration();
        self.surface.add(initial, duration);
        info!(markers = self.surface.store.len(), "marker engine initialized");
        self.evaluate_clock();
    }

    /// Host notification: playback time advanced (or jumped).
    pub fn handle_time_update(&mut self) {
        if self.state != Lifecycle::Active {
            return;
        }
        self.evaluate_clock();
    }

    /// Insert markers, rendering one element per marker.
    pub fn add(&mut self, payloads: Vec<M>) {
        if self.state != Lifecycle::Active {
            debug!("add ignored; engine not active");
            return;
        }
        let duration = self.duration();
        self.surface.add(payloads, duration);
    }

    /// Remove markers by position in the current sorted sequence.
    ///
    /// Removal shifts positions, so the interval cursor is dropped; the
    /// next sample re-resolves and may fire again for a surviving interval.
    pub fn remove(&mut self, indices: &[usize]) {
        if self.state != Lifecycle::Active {
            debug!("remove ignored; engine not active");
            return;
        }
        self.surface.remove(indices);
        self.tracker.reset();
    }

    /// Remove every marker.
    pub fn remove_all(&mut self) {
        if self.state != Lifecycle::Active {
            return;
        }
        self.surface.remove_all();
        self.tracker.reset();
    }

    /// Replace all markers: clear, then add.
    pub fn reset(&mut self, payloads: Vec<M>) {
        if self.state != Lifecycle::Active {
            return;
        }
        self.surface.remove_all();
        self.tracker.reset();
        let duration = self.duration();
        self.surface.add(payloads, duration);
    }

    /// The markers in ascending time order.
    pub fn markers(&self) -> &[Marker<M>] {
        self.surface.store.markers()
    }

    /// The marker whose interval contains the last resolved sample.
    pub fn current_marker(&self) -> Option<&Marker<M>> {
        self.tracker
            .current()
            .and_then(|index| self.surface.store.get(index))
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

    /// Tear down: remove all markers and detach from the clock.
    ///
    /// Safe to call at any point, including before initialization. After
    /// destroy the handle is inert and must not be reused.
    pub fn destroy(&mut self) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.surface.remove_all();
        self.tracker.reset();
        self.clock = None;
        self.state = Lifecycle::Destroyed;
        info!("marker engine destroyed");
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    /// The configured advance-notice hint, in seconds.
    pub fn announce_time(&self) -> f64 {
        self.announce_time
    }

    fn duration(&self) -> f64 {
        self.clock.as_ref().map(|c| c.duration()).unwrap_or(0.0)
    }

    fn evaluate_clock(&mut self) {
        let Some(clock) = self.clock.as_ref() else {
            return;
        };
        let t = clock.current_time();
        let duration = clock.duration();
        if let Some(index) = self.tracker.observe(t, &self.surface.store, duration) {
            if let Some(marker) = self.surface.store.get(index) {
                if let Some(callback) = self.on_marker_reached.as_mut() {
                    callback(marker);
                }
            }
        }
    }
}
