use bevy::prelude::*;

/// Asset loaded when no `model` parameter is supplied.
pub const DEFAULT_MODEL_PATH: &str = "models/sample.glb";

/// Launch parameters: which asset to load and whether the origin workflow is
/// enabled. On WASM these come from the page query string
/// (`?model=scan.glb&origin=1`), on native from process arguments
/// (`--model scan.glb --origin`).
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub model_path: String,
    pub origin_workflow: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            origin_workflow: false,
        }
    }
}

impl LaunchOptions {
    pub fn from_query_string(query: &str) -> Self {
        let mut options = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            match key {
                "model" if !value.is_empty() => options.model_path = value.to_string(),
                "origin" => options.origin_workflow = matches!(value, "" | "1" | "true"),
                _ => {}
            }
        }
        options
    }

    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::from_query_string(&query)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        let mut options = Self::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--model" => {
                    if let Some(path) = args.next() {
                        options.model_path = path;
                    }
                }
                "--origin" => options.origin_workflow = true,
                _ => {}
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_uses_defaults() {
        let options = LaunchOptions::from_query_string("");
        assert_eq!(options.model_path, DEFAULT_MODEL_PATH);
        assert!(!options.origin_workflow);
    }

    #[test]
    fn model_parameter_selects_the_asset() {
        let options = LaunchOptions::from_query_string("?model=models/turbine.glb");
        assert_eq!(options.model_path, "models/turbine.glb");
    }

    #[test]
    fn origin_flag_enables_the_workflow() {
        assert!(LaunchOptions::from_query_string("?origin").origin_workflow);
        assert!(LaunchOptions::from_query_string("?origin=1").origin_workflow);
        assert!(LaunchOptions::from_query_string("?origin=true").origin_workflow);
        assert!(!LaunchOptions::from_query_string("?origin=0").origin_workflow);
    }

    #[test]
    fn parameters_combine_in_any_order() {
        let options = LaunchOptions::from_query_string("?origin=1&model=scan.glb");
        assert_eq!(options.model_path, "scan.glb");
        assert!(options.origin_workflow);
    }

    #[test]
    fn empty_model_value_falls_back_to_default() {
        let options = LaunchOptions::from_query_string("?model=");
        assert_eq!(options.model_path, DEFAULT_MODEL_PATH);
    }
}
