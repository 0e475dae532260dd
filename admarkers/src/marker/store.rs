//! Sorted marker storage.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::model::{Marker, MarkerKey, TimeExtractor};

/// Owns the set of markers for one timeline, sorted ascending by extracted
/// time.
///
/// All mutation goes through the store; no other component touches the
/// sequence directly. Every mutation re-establishes the sort invariant as an
/// explicit final step. The sort is stable, so markers with equal times keep
/// their relative insertion order.
pub struct MarkerStore<M> {
    /// Markers in ascending time order.
    markers: Vec<Marker<M>>,
    /// Keys of all live markers, for uniqueness checks.
    keys: HashSet<MarkerKey>,
    /// Timeline-offset extraction for the caller's payload shape.
    extract: TimeExtractor<M>,
}

impl<M: 'static> MarkerStore<M> {
    /// Create an empty store with the given time-extraction function.
    pub fn new(extract: impl Fn(&M) -> f64 + Send + Sync + 'static) -> Self {
        Self::from_extractor(Box::new(extract))
    }

    /// Create an empty store from an already-boxed extractor.
    pub fn from_extractor(extract: TimeExtractor<M>) -> Self {
        Self {
            markers: Vec::new(),
            keys: HashSet::new(),
            extract,
        }
    }

    /// Insert payloads as new markers, assigning a fresh key to each, then
    /// re-sort the sequence.
    ///
    /// An empty input is a no-op. Returns the inserted keys in input order
    /// so the caller can create one visual element per marker.
    pub fn add(&mut self, payloads: impl IntoIterator<Item = M>) -> Vec<MarkerKey> {
        let mut inserted = Vec::new();
        for payload in payloads {
            let key = self.fresh_key();
            self.keys.insert(key);
            self.markers.push(Marker::new(key, payload));
            inserted.push(key);
        }
        if inserted.is_empty() {
            return inserted;
        }
        self.sort();
        debug!(added = inserted.len(), total = self.markers.len(), "markers added");
        inserted
    }

    /// Remove markers by position in the current sorted sequence.
    ///
    /// All indices are interpreted against the sequence as it was when the
    /// call started: slots are nulled first, then the sequence is compacted
    /// preserving relative order, then re-sorted. Out-of-bounds and
    /// duplicate indices are ignored. Returns the removed keys so the caller
    /// can drop the corresponding visual elements.
    pub fn remove(&mut self, indices: &[usize]) -> Vec<MarkerKey> {
        let mut slots: Vec<Option<Marker<M>>> = self.markers.drain(..).map(Some).collect();
        let mut removed = Vec::new();
        for &index in indices {
            if let Some(slot) = slots.get_mut(index) {
                if let Some(marker) = slot.take() {
                    self.keys.remove(&marker.key());
                    removed.push(marker.key());
                }
            }
        }
        self.markers = slots.into_iter().flatten().collect();
        self.sort();
        if !removed.is_empty() {
            debug!(removed = removed.len(), total = self.markers.len(), "markers removed");
        }
        removed
    }

    /// Remove every marker.
    pub fn remove_all(&mut self) -> Vec<MarkerKey> {
        let indices: Vec<usize> = (0..self.markers.len()).collect();
        self.remove(&indices)
    }

    /// The markers in ascending time order (read-only view).
    pub fn markers(&self) -> &[Marker<M>] {
        &self.markers
    }

    /// Number of live markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the store holds no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker at `index` in the sorted sequence.
    pub fn get(&self, index: usize) -> Option<&Marker<M>> {
        self.markers.get(index)
    }

    /// Look up a marker by its store-assigned key.
    pub fn get_by_key(&self, key: MarkerKey) -> Option<&Marker<M>> {
        self.markers.iter().find(|m| m.key() == key)
    }

    /// The extracted time of the marker at `index`, if one exists there.
    pub fn time_at(&self, index: usize) -> Option<f64> {
        self.markers.get(index).map(|m| self.time_of(m))
    }

    /// The extracted time of a marker.
    ///
    /// Works for markers no longer held by the store, since extraction only
    /// reads the payload.
    pub fn time_of(&self, marker: &Marker<M>) -> f64 {
        (self.extract)(marker.payload())
    }

    /// Re-establish ascending time order. Stable on equal times.
    fn sort(&mut self) {
        let extract = &self.extract;
        self.markers
            .sort_by(|a, b| extract(a.payload()).total_cmp(&extract(b.payload())));
    }

    fn fresh_key(&self) -> MarkerKey {
        loop {
            let key = MarkerKey::generate();
            if !self.keys.contains(&key) {
                return key;
            }
        }
    }
}

impl<M> fmt::Debug for MarkerStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerStore")
            .field("len", &self.markers.len())
            .finish_non_exhaustive()
    }
}
