//! Core marker value types.

use std::fmt;

use uuid::Uuid;

/// Unique identifier for a marker, assigned by the store on insertion.
///
/// Keys are opaque and stable for the marker's lifetime. Collaborators use
/// them to correlate visual elements with markers and to identify markers
/// for removal after index-based lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey(Uuid);

impl MarkerKey {
    /// Generate a fresh, non-colliding key.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single timed event on the timeline.
///
/// The payload type `M` is caller-defined and opaque to the engine; the
/// timeline offset is obtained through the store's [`TimeExtractor`] rather
/// than a fixed field, so callers keep whatever marker shape they already
/// have.
#[derive(Debug, Clone)]
pub struct Marker<M> {
    key: MarkerKey,
    payload: M,
}

impl<M> Marker<M> {
    pub(crate) fn new(key: MarkerKey, payload: M) -> Self {
        Self { key, payload }
    }

    /// The store-assigned unique key.
    pub fn key(&self) -> MarkerKey {
        self.key
    }

    /// The caller-defined payload.
    pub fn payload(&self) -> &M {
        &self.payload
    }
}

/// Extracts the timeline offset from a marker payload.
///
/// The unit matches the external clock, conventionally seconds. The result
/// for a given payload must not change after insertion; the store sorts on
/// insertion and does not re-extract on external payload mutation.
pub type TimeExtractor<M> = Box<dyn Fn(&M) -> f64 + Send + Sync>;
