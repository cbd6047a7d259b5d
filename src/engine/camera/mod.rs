//! Orbit camera for model inspection.
//!
//! Right drag orbits, middle drag pans, mouse wheel dollies. Left click is
//! reserved for surface point selection.

/// Orbit camera resource, controller system, and cursor-to-ray helper.
pub mod orbit_camera;
