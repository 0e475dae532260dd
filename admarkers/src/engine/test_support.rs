//! Shared fixtures for engine unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::marker::{Marker, MarkerKey};
use crate::player::PlayerClock;
use crate::render::{MarkerPosition, MarkerRenderer};

/// Append-only event log shared between callbacks and assertions.
#[derive(Clone, Default)]
pub(crate) struct SharedLog(Arc<Mutex<Vec<String>>>);

impl SharedLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    /// Drain and return everything logged so far.
    pub(crate) fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Scriptable host clock.
#[derive(Clone)]
pub(crate) struct TestClock {
    time: Arc<Mutex<f64>>,
    duration: f64,
}

impl TestClock {
    pub(crate) fn new(duration: f64) -> Self {
        Self {
            time: Arc::new(Mutex::new(0.0)),
            duration,
        }
    }

    pub(crate) fn set_time(&self, t: f64) {
        *self.time.lock().unwrap() = t;
    }
}

impl PlayerClock for TestClock {
    fn current_time(&self) -> f64 {
        *self.time.lock().unwrap()
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Renderer that records element creation and removal in the shared log.
pub(crate) struct RecordingRenderer {
    log: SharedLog,
    labels: HashMap<MarkerKey, String>,
}

impl RecordingRenderer {
    pub(crate) fn new(log: SharedLog) -> Self {
        Self {
            log,
            labels: HashMap::new(),
        }
    }
}

impl MarkerRenderer<f64> for RecordingRenderer {
    fn create(&mut self, marker: &Marker<f64>, position: MarkerPosition) {
        let label = marker.payload().to_string();
        self.log
            .push(format!("create {} @{:.1}%", label, position.percent));
        self.labels.insert(marker.key(), label);
    }

    fn remove(&mut self, key: MarkerKey) {
        let label = self
            .labels
            .remove(&key)
            .unwrap_or_else(|| "?".to_string());
        self.log.push(format!("remove {}", label));
    }
}
