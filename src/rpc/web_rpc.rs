use crate::tools::actions::{ActionSource, ViewerAction, ViewerActionEvent};
use crate::tools::measure::MeasureState;
use crate::tools::origin::OriginMode;
use crate::ui::readout::StatusLine;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page
/// and the viewer. Handles both request-response patterns and notification
/// broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Notifications queued since the last transmission pass.
    pub fn queued_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Full viewer state as the host page sees it: raw and origin-relative
/// points, distance, and the confirmed origin.
pub fn measurement_payload(measure: &MeasureState, origin_mode: &OriginMode) -> serde_json::Value {
    let triple = |v: Vec3| serde_json::json!([v.x, v.y, v.z]);
    serde_json::json!({
        "points": measure.points().iter().map(|p| triple(*p)).collect::<Vec<_>>(),
        "relative_points": measure
            .points()
            .iter()
            .map(|p| triple(origin_mode.relative(*p)))
            .collect::<Vec<_>>(),
        "distance": measure.distance(),
        "origin": origin_mode.origin().map(triple),
        "origin_confirmed": origin_mode.accepts_measurement(),
    })
}

/// Plugin establishing the WebRPC communication layer for iframe-based
/// deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    publish_status_changes,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    measure: Res<MeasureState>,
    origin_mode: Res<OriginMode>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut action_events: EventWriter<ViewerActionEvent>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(
                    &request,
                    &diagnostics,
                    &measure,
                    &origin_mode,
                    &mut action_events,
                ) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Ignoring malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    measure: &MeasureState,
    origin_mode: &OriginMode,
    action_events: &mut EventWriter<ViewerActionEvent>,
) -> Option<RpcResponse> {
    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "viewer_action" => handle_viewer_action(&request.params, action_events),
        "get_measurement" => Ok(measurement_payload(measure, origin_mode)),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Handle viewer action RPC method with parameter validation and event dispatch.
fn handle_viewer_action(
    params: &serde_json::Value,
    action_events: &mut EventWriter<ViewerActionEvent>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ViewerActionParams {
        action: String,
    }

    let action_params = serde_json::from_value::<ViewerActionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'action' parameter"))?;

    let action = ViewerAction::from_string(&action_params.action).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown action: {}", action_params.action))
    })?;

    action_events.write(ViewerActionEvent {
        action,
        source: ActionSource::Rpc,
    });

    info!("Viewer action dispatched via RPC: {:?}", action);

    Ok(serde_json::json!({
        "success": true,
        "action": action.as_str(),
    }))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Mirror every status-line change to the host page. An empty message is
/// forwarded too, so the host page clears its status display in step.
fn publish_status_changes(status: Res<StatusLine>, mut rpc_interface: ResMut<WebRpcInterface>) {
    if status.is_changed() && !status.is_added() {
        rpc_interface.send_notification(
            "status_message",
            serde_json::json!({ "message": status.message() }),
        );
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window (host page).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_raw_and_relative_points() {
        let mut measure = MeasureState::default();
        measure.try_add_point(Vec3::new(1.0, 2.0, 0.0)).unwrap();
        let origin = OriginMode::OriginSet {
            origin: Vec3::new(1.0, 0.0, 0.0),
        };

        let payload = measurement_payload(&measure, &origin);
        assert_eq!(payload["points"][0], serde_json::json!([1.0, 2.0, 0.0]));
        assert_eq!(
            payload["relative_points"][0],
            serde_json::json!([0.0, 2.0, 0.0])
        );
        assert_eq!(payload["origin"], serde_json::json!([1.0, 0.0, 0.0]));
        assert_eq!(payload["origin_confirmed"], serde_json::json!(true));
        assert_eq!(payload["distance"], serde_json::Value::Null);
    }

    #[test]
    fn status_clear_reaches_the_host_page() {
        let mut app = App::new();
        app.init_resource::<StatusLine>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, publish_status_changes);
        app.update();

        app.world_mut()
            .resource_mut::<StatusLine>()
            .set("Set an origin before measuring.");
        app.update();
        app.world_mut().resource_mut::<StatusLine>().clear();
        app.update();

        let messages: Vec<String> = app
            .world()
            .resource::<WebRpcInterface>()
            .queued_notifications()
            .iter()
            .filter(|n| n.method == "status_message")
            .map(|n| n.params["message"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(messages, ["Set an origin before measuring.", ""]);
    }

    #[test]
    fn payload_reports_distance_with_two_points() {
        let mut measure = MeasureState::default();
        measure.try_add_point(Vec3::ZERO).unwrap();
        measure.try_add_point(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        let payload = measurement_payload(&measure, &OriginMode::AwaitingOrigin);
        assert_eq!(payload["distance"], serde_json::json!(2.0));
        assert_eq!(payload["origin"], serde_json::Value::Null);
        assert_eq!(payload["origin_confirmed"], serde_json::json!(false));
    }
}
