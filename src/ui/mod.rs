//! In-app readout overlay: point coordinates, distance, origin, status, and
//! the three action buttons. The same state is mirrored to the host page via
//! RPC notifications, so the overlay and the DOM never disagree.

/// Panel layout, action buttons, and interaction handling.
pub mod panel;

/// Formatting of points/distances and the change-driven text update system.
pub mod readout;
