use crate::engine::loading::launch_options::LaunchOptions;
use crate::rpc::web_rpc::{WebRpcInterface, measurement_payload};
use crate::tools::markers::MarkerSet;
use crate::tools::measure::MeasureState;
use crate::tools::origin::OriginMode;
use crate::ui::readout::StatusLine;
use bevy::prelude::*;

/// Viewer-level actions reachable from UI buttons, RPC, and (native builds)
/// keyboard shortcuts. RPC naming goes through `from_string`/`as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    ResetMeasurement,
    SetOrigin,
    ResetOrigin,
}

impl ViewerAction {
    /// Convert string identifier to action for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "reset_measurement" => Some(Self::ResetMeasurement),
            "set_origin" => Some(Self::SetOrigin),
            "reset_origin" => Some(Self::ResetOrigin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResetMeasurement => "reset_measurement",
            Self::SetOrigin => "set_origin",
            Self::ResetOrigin => "reset_origin",
        }
    }
}

/// Source of an action for debugging and notifications.
#[derive(Debug, Clone, Copy)]
pub enum ActionSource {
    Ui,
    Rpc,
    Keyboard,
}

#[derive(Event)]
pub struct ViewerActionEvent {
    pub action: ViewerAction,
    pub source: ActionSource,
}

/// Applies reset and origin actions to the selection state and markers.
///
/// Measurement reset leaves the origin untouched; origin reset keeps any
/// existing measurement points. Entering origin capture clears the in-progress
/// measurement and suppresses measurement reset until the origin click lands.
pub fn handle_viewer_actions(
    mut commands: Commands,
    mut events: EventReader<ViewerActionEvent>,
    mut measure: ResMut<MeasureState>,
    mut origin_mode: ResMut<OriginMode>,
    mut markers: ResMut<MarkerSet>,
    mut status: ResMut<StatusLine>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    options: Res<LaunchOptions>,
) {
    for event in events.read() {
        match event.action {
            ViewerAction::ResetMeasurement => {
                if origin_mode.is_setting() {
                    status.set("Finish setting the origin first.");
                    continue;
                }
                measure.clear();
                markers.clear_measure(&mut commands);
                status.clear();
                info!("Measurement reset via {:?}", event.source);
                rpc_interface.send_notification(
                    "measurement_changed",
                    measurement_payload(&measure, &origin_mode),
                );
            }
            ViewerAction::SetOrigin => {
                if !options.origin_workflow {
                    continue;
                }
                origin_mode.begin_setting();
                measure.clear();
                markers.clear_measure(&mut commands);
                status.set("Click the model to set the origin.");
                info!("Origin capture started via {:?}", event.source);
                rpc_interface.send_notification(
                    "origin_changed",
                    serde_json::json!({ "setting": true }),
                );
                // Points were cleared; tell the host page so it drops them too
                rpc_interface.send_notification(
                    "measurement_changed",
                    measurement_payload(&measure, &origin_mode),
                );
            }
            ViewerAction::ResetOrigin => {
                if !options.origin_workflow {
                    continue;
                }
                origin_mode.reset();
                markers.clear_origin(&mut commands);
                status.set("Origin reset to world zero.");
                info!("Origin reset via {:?}", event.source);
                rpc_interface.send_notification(
                    "origin_changed",
                    serde_json::json!({ "origin": [0.0, 0.0, 0.0], "confirmed": true }),
                );
                // Kept points are now relative to world zero; refresh the display
                rpc_interface.send_notification(
                    "measurement_changed",
                    measurement_payload(&measure, &origin_mode),
                );
            }
        }
    }
}

/// Keyboard shortcuts for the three actions (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_action_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut actions: EventWriter<ViewerActionEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        actions.write(ViewerActionEvent {
            action: ViewerAction::ResetMeasurement,
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        actions.write(ViewerActionEvent {
            action: ViewerAction::SetOrigin,
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        actions.write(ViewerActionEvent {
            action: ViewerAction::ResetOrigin,
            source: ActionSource::Keyboard,
        });
    }
}

/// Shortcuts are disabled on WASM; the host page drives actions via RPC.
#[cfg(target_arch = "wasm32")]
pub fn handle_action_keyboard_shortcuts() {}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_app(origin_mode: OriginMode) -> App {
        let mut app = App::new();
        app.init_resource::<MeasureState>()
            .insert_resource(origin_mode)
            .init_resource::<MarkerSet>()
            .init_resource::<StatusLine>()
            .init_resource::<WebRpcInterface>()
            .insert_resource(LaunchOptions {
                origin_workflow: true,
                ..Default::default()
            })
            .add_event::<ViewerActionEvent>()
            .add_systems(Update, handle_viewer_actions);
        app
    }

    fn dispatch(app: &mut App, action: ViewerAction) {
        app.world_mut().send_event(ViewerActionEvent {
            action,
            source: ActionSource::Ui,
        });
        app.update();
    }

    fn notification_params(app: &App, method: &str) -> serde_json::Value {
        app.world()
            .resource::<WebRpcInterface>()
            .queued_notifications()
            .iter()
            .find(|n| n.method == method)
            .unwrap_or_else(|| panic!("no {method} notification queued"))
            .params
            .clone()
    }

    #[test]
    fn set_origin_clears_displayed_points_on_the_host_page() {
        let mut app = action_app(OriginMode::OriginSet { origin: Vec3::ZERO });
        app.world_mut()
            .resource_mut::<MeasureState>()
            .try_add_point(Vec3::ONE)
            .unwrap();

        dispatch(&mut app, ViewerAction::SetOrigin);

        assert!(app.world().resource::<MeasureState>().is_empty());
        let payload = notification_params(&app, "measurement_changed");
        assert_eq!(payload["points"], serde_json::json!([]));
        assert_eq!(payload["distance"], serde_json::Value::Null);
    }

    #[test]
    fn reset_origin_refreshes_relative_coordinates() {
        let mut app = action_app(OriginMode::OriginSet {
            origin: Vec3::new(1.0, 0.0, 0.0),
        });
        app.world_mut()
            .resource_mut::<MeasureState>()
            .try_add_point(Vec3::new(1.0, 2.0, 0.0))
            .unwrap();

        dispatch(&mut app, ViewerAction::ResetOrigin);

        // The kept point is re-reported relative to the new world-zero origin
        let payload = notification_params(&app, "measurement_changed");
        assert_eq!(payload["points"], serde_json::json!([[1.0, 2.0, 0.0]]));
        assert_eq!(
            payload["relative_points"],
            serde_json::json!([[1.0, 2.0, 0.0]])
        );
        assert_eq!(payload["origin"], serde_json::json!([0.0, 0.0, 0.0]));
    }

    #[test]
    fn reset_measurement_reports_the_emptied_set() {
        let mut app = action_app(OriginMode::OriginSet { origin: Vec3::ZERO });
        app.world_mut()
            .resource_mut::<MeasureState>()
            .try_add_point(Vec3::ONE)
            .unwrap();

        dispatch(&mut app, ViewerAction::ResetMeasurement);

        let payload = notification_params(&app, "measurement_changed");
        assert_eq!(payload["points"], serde_json::json!([]));
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            ViewerAction::ResetMeasurement,
            ViewerAction::SetOrigin,
            ViewerAction::ResetOrigin,
        ] {
            assert_eq!(ViewerAction::from_string(action.as_str()), Some(action));
        }
        assert_eq!(ViewerAction::from_string("unknown"), None);
    }
}
