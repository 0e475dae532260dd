//! Marker timeline model.
//!
//! This module contains the marker data model and the [`MarkerStore`], the
//! exclusive owner of all markers on a timeline. Markers carry an opaque
//! caller-defined payload; the store learns each marker's timeline offset
//! through a configurable extraction function and keeps the sequence sorted
//! ascending by that offset after every mutation.
//!
//! # Example
//!
//! ```
//! use admarkers::marker::MarkerStore;
//!
//! #[derive(Debug, Clone)]
//! struct Cue { time: f64, label: String }
//!
//! let mut store = MarkerStore::new(|cue: &Cue| cue.time);
//! store.add(vec![
//!     Cue { time: 30.0, label: "midroll".into() },
//!     Cue { time: 5.0, label: "preroll".into() },
//! ]);
//!
//! // Always sorted ascending by extracted time.
//! assert_eq!(store.markers()[0].payload().label, "preroll");
//! ```

mod model;
mod store;

pub use model::{Marker, MarkerKey, TimeExtractor};
pub use store::MarkerStore;
