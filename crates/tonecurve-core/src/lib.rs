//! Tonecurve Core — domain layer for the per-channel tone curve editor.
//!
//! Holds the four channel control-point lists, the pixel ⇄ normalized
//! mapping, the Catmull-Rom sampler, and the pointer-driven edit state
//! machine. Painting and window layout stay with the host; this crate
//! only produces geometry and events.

pub mod channel;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod geometry;
pub mod lut;
pub mod scene;
pub mod spline;
pub mod store;

// Re-exports for convenience.
pub use channel::Channel;
pub use config::EditorConfig;
pub use editor::{EditPhase, TOUCH_SLOP, ToneCurveEditor};
pub use error::ToneCurveError;
pub use events::{ChangeNotifier, CurveEvent, CurveEventQueue, ToneCurveListener};
pub use geometry::PlotBounds;
pub use lut::{DEFAULT_LUT_SIZE, ToneLut, bake_lut};
pub use scene::{CurveRenderer, CurveScene};
pub use spline::sample_curve;
pub use store::{ChannelState, CurveStore, MAX_POINTS, MIN_POINTS};
