//! Simulated host player.
//!
//! The simulator stands in for a real media framework: a lock-free clock
//! the tick loop advances and the engine reads, plus a renderer that
//! narrates timeline elements on stdout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use admarkers::cuesheet::CueMarker;
use admarkers::marker::{Marker, MarkerKey};
use admarkers::player::PlayerClock;
use admarkers::render::{MarkerPosition, MarkerRenderer};

/// Playback clock backed by bit-cast `f64` atomics, shared between the
/// tick loop (writer) and the engine (reader).
pub struct SimClock {
    time_bits: AtomicU64,
    duration_bits: AtomicU64,
}

impl SimClock {
    pub fn new(duration: f64) -> Arc<Self> {
        Arc::new(Self {
            time_bits: AtomicU64::new(0.0_f64.to_bits()),
            duration_bits: AtomicU64::new(duration.to_bits()),
        })
    }

    pub fn set_time(&self, t: f64) {
        self.time_bits.store(t.to_bits(), Ordering::Relaxed);
    }

    pub fn time(&self) -> f64 {
        f64::from_bits(self.time_bits.load(Ordering::Relaxed))
    }

    pub fn duration(&self) -> f64 {
        f64::from_bits(self.duration_bits.load(Ordering::Relaxed))
    }
}

/// Clock handle handed to the engine; shares state with the tick loop.
pub struct SharedClock(pub Arc<SimClock>);

impl PlayerClock for SharedClock {
    fn current_time(&self) -> f64 {
        self.0.time()
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }
}

/// Renderer that narrates element creation and removal on stdout.
pub struct ConsoleRenderer {
    labels: HashMap<MarkerKey, String>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerRenderer<CueMarker> for ConsoleRenderer {
    fn create(&mut self, marker: &Marker<CueMarker>, position: MarkerPosition) {
        let label = describe(marker.payload());
        println!("  timeline + {} at {:.1}%", label, position.percent);
        self.labels.insert(marker.key(), label);
    }

    fn remove(&mut self, key: MarkerKey) {
        if let Some(label) = self.labels.remove(&key) {
            println!("  timeline - {}", label);
        }
    }
}

/// Human-readable cue description for simulator output.
pub fn describe(cue: &CueMarker) -> String {
    match &cue.label {
        Some(label) => format!("{} (t={}s)", label, cue.time),
        None => format!("cue at {}s", cue.time),
    }
}
