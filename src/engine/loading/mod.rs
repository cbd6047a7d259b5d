//! Model loading: launch-parameter selection, glTF scene load, recentring.

/// Launch parameters from the page query string or process arguments.
pub mod launch_options;

/// Scene load state, failure reporting, mesh tagging, and model recentring.
pub mod model_loader;
