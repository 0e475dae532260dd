//! Engine configuration.
//!
//! Configs bundle the caller's marker payloads, the time-extraction
//! function, and the callbacks an engine invokes. Callbacks run
//! synchronously inside the clock-sample handler and must return promptly;
//! long-running work is the collaborator's to offload. A callback that
//! fails does so on the collaborator's terms; the engine catches and
//! retries nothing.

use crate::marker::{Marker, TimeExtractor};

/// Default advance notice before a marker, in seconds.
pub const DEFAULT_ANNOUNCE_TIME: f64 = 15.0;

/// Callback invoked with a marker.
pub type MarkerCallback<M> = Box<dyn FnMut(&Marker<M>) + Send>;

/// Configuration for a [`MarkerEngine`](super::MarkerEngine).
pub struct MarkerEngineConfig<M> {
    /// Initial marker payloads, added when the host reports metadata.
    pub markers: Vec<M>,
    /// Advance notice before a marker, in seconds. Recognized for
    /// configuration compatibility; the tracker does not currently consult
    /// it.
    pub announce_time: f64,
    /// Extracts the timeline offset from a payload.
    pub get_marker_time: TimeExtractor<M>,
    /// Invoked when the clock crosses into a marker's interval.
    pub on_marker_reached: Option<MarkerCallback<M>>,
    /// Invoked when the host forwards a click on a marker's element.
    pub on_marker_click: Option<MarkerCallback<M>>,
}

impl<M: 'static> MarkerEngineConfig<M> {
    /// Create a config with the given time extraction and no callbacks.
    pub fn new(get_marker_time: impl Fn(&M) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            markers: Vec::new(),
            announce_time: DEFAULT_ANNOUNCE_TIME,
            get_marker_time: Box::new(get_marker_time),
            on_marker_reached: None,
            on_marker_click: None,
        }
    }

    /// Set the initial markers.
    pub fn with_markers(mut self, markers: Vec<M>) -> Self {
        self.markers = markers;
        self
    }

    /// Set the advance-notice hint.
    pub fn with_announce_time(mut self, seconds: f64) -> Self {
        self.announce_time = seconds;
        self
    }

    /// Set the marker-reached callback.
    pub fn with_on_marker_reached(
        mut self,
        callback: impl FnMut(&Marker<M>) + Send + 'static,
    ) -> Self {
        self.on_marker_reached = Some(Box::new(callback));
        self
    }

    /// Set the marker-click callback.
    pub fn with_on_marker_click(
        mut self,
        callback: impl FnMut(&Marker<M>) + Send + 'static,
    ) -> Self {
        self.on_marker_click = Some(Box::new(callback));
        self
    }
}

/// Configuration for an [`AdEngine`](super::AdEngine).
pub struct AdEngineConfig<M> {
    /// Initial cue payloads, added when the host reports metadata.
    pub markers: Vec<M>,
    /// Extracts the timeline offset from a payload.
    pub get_marker_time: TimeExtractor<M>,
    /// Invoked ahead of a cue so the collaborator can pre-load content.
    pub prepare_next_ad: Option<MarkerCallback<M>>,
    /// Invoked at the crossing instant to hand playback to the ad.
    pub play_ad: Option<MarkerCallback<M>>,
    /// Invoked when the host forwards a click on a marker's element.
    pub on_marker_click: Option<MarkerCallback<M>>,
}

impl<M: 'static> AdEngineConfig<M> {
    /// Create a config with the given time extraction and no callbacks.
    pub fn new(get_marker_time: impl Fn(&M) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            markers: Vec::new(),
            get_marker_time: Box::new(get_marker_time),
            prepare_next_ad: None,
            play_ad: None,
            on_marker_click: None,
        }
    }

    /// Set the initial cues.
    pub fn with_markers(mut self, markers: Vec<M>) -> Self {
        self.markers = markers;
        self
    }

    /// Set the prepare callback.
    pub fn with_prepare_next_ad(
        mut self,
        callback: impl FnMut(&Marker<M>) + Send + 'static,
    ) -> Self {
        self.prepare_next_ad = Some(Box::new(callback));
        self
    }

    /// Set the fire callback.
    pub fn with_play_ad(mut self, callback: impl FnMut(&Marker<M>) + Send + 'static) -> Self {
        self.play_ad = Some(Box::new(callback));
        self
    }

    /// Set the marker-click callback.
    pub fn with_on_marker_click(
        mut self,
        callback: impl FnMut(&Marker<M>) + Send + 'static,
    ) -> Self {
        self.on_marker_click = Some(Box::new(callback));
        self
    }
}
