//! Interactive measurement and origin tools.
//!
//! Left click on the model surface is the single selection gesture; what it
//! does depends on the current `OriginMode`:
//!
//! ```text
//! Left click (hit on model)
//!   └─> surface_click_system()
//!       ├─ SettingOrigin  -> confirm origin, replace blue marker
//!       ├─ OriginSet      -> append measurement point (max 2), red marker
//!       └─ AwaitingOrigin -> advisory: set an origin first
//! ```
//!
//! A click that misses the model is a silent no-op. Clicks before the model
//! has finished loading are ignored.
//!
//! ## Actions
//!
//! `ViewerActionEvent` carries the three viewer actions from UI buttons, RPC,
//! or native keyboard shortcuts (`R`/`O`/`C`):
//! - `reset_measurement`: empties the point set and its markers, origin untouched
//! - `set_origin`: next surface click defines the origin; clears in-progress points
//! - `reset_origin`: origin forced to world zero, confirmed; points kept
//!
//! State changes feed the readout panel via resource change detection and are
//! mirrored to the host page as RPC notifications.

/// Reset and origin action events with a single handler system.
pub mod actions;

/// Marker entity lifecycle: red measurement spheres, singular blue origin sphere.
pub mod markers;

/// Measurement point set, surface-click raycasting, and rejection reasons.
pub mod measure;

/// Origin workflow state machine gating measurement capture.
pub mod origin;
