//! JSON-RPC 2.0 communication layer for host-page integration.
//!
//! Implements bidirectional messaging between the viewer and the embedding
//! page via iframe postMessage, supporting both request-response and
//! notification patterns.
//!
//! ## Incoming methods
//!
//! - `viewer_action`: dispatch `reset_measurement` / `set_origin` /
//!   `reset_origin`
//! - `get_measurement`: full selection state (raw + origin-relative points,
//!   distance, origin)
//! - `get_fps`: current frame rate
//!
//! ## Outgoing notifications
//!
//! - `viewer_ready` / `model_load_failed`: load lifecycle, naming the file
//! - `measurement_changed` / `measurement_rejected`: selection updates
//! - `origin_changed`: origin confirmations and resets
//! - `status_message`: every advisory shown in the in-app status line

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
