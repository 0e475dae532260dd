//! AdMarkers - timed marker tracking and ad insertion for media players
//!
//! This library tracks time-coded markers against an externally-driven
//! playback clock. The host player forwards its clock notifications; the
//! engines resolve each sample to a marker interval and invoke callbacks
//! on crossings: either a plain "marker reached" event
//! ([`MarkerEngine`](engine::MarkerEngine)) or a two-phase prepare/fire
//! ad-insertion protocol ([`AdEngine`](engine::AdEngine)).
//!
//! # Architecture
//!
//! ```text
//! host clock ──time samples──► PositionTracker ──transitions──► callbacks
//!                                    │                    (reached / prepare / fire)
//!                              MarkerStore ◄──add/remove/reset── caller
//!                                    │
//!                              MarkerRenderer (visual elements)
//! ```
//!
//! Everything is single-threaded and callback-driven: all mutation happens
//! synchronously inside one host notification or one explicit API call.

pub mod cuesheet;
pub mod engine;
pub mod marker;
pub mod player;
pub mod render;
pub mod scheduler;
pub mod tracker;

pub use engine::{AdEngine, AdEngineConfig, Lifecycle, MarkerEngine, MarkerEngineConfig};
pub use marker::{Marker, MarkerKey, MarkerStore};
pub use player::{PlayerClock, NO_TIME};
pub use render::{MarkerPosition, MarkerRenderer, NullRenderer};
pub use scheduler::{AdAction, AdScheduler};
pub use tracker::PositionTracker;

/// Crate version, exposed for host banners and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
