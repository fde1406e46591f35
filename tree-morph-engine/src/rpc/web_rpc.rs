use std::collections::HashSet;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::field::elements::PhotoId;
use crate::engine::field::morph_field::MorphField;
use crate::engine::gesture::landmarks::DetectionResult;
use crate::engine::morph::state_machine::{
    CommandSource, MorphAction, MorphCommand, MorphState, MorphStateMachine,
};
use crate::engine::scene::photo_panels::{PhotoUploadRequest, UploadSource};
use crate::engine::systems::status::StatusSources;
use crate::engine::tracking::session::TrackingController;
use crate::engine::tracking::systems::{TrackingAction, TrackingRequest};
use crate::engine::tuning::MorphTuning;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure. A request without an id is a notification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
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

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page
/// and Bevy. Handles both request-response patterns and notification
/// broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
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

    #[cfg(test)]
    pub fn drain_notifications(&mut self) -> Vec<RpcNotification> {
        std::mem::take(&mut self.outgoing_notifications)
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .run_if(in_state(crate::engine::core::app_state::AppState::Running)),
            )
            .add_systems(Last, send_outgoing_messages);

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

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(error) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", error);
        }
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

/// Everything an RPC handler may read or request.
#[derive(SystemParam)]
struct RpcContext<'w, 's> {
    morph_commands: EventWriter<'w, MorphCommand>,
    tracking_requests: EventWriter<'w, TrackingRequest>,
    uploads: EventWriter<'w, PhotoUploadRequest>,
    machine: Res<'w, MorphStateMachine>,
    controller: Res<'w, TrackingController>,
    field: Option<Res<'w, MorphField>>,
    tuning: Res<'w, MorphTuning>,
    status: StatusSources<'w>,
    /// Uploads accepted over RPC that the field has not picked up yet.
    queued_photos: Local<'s, HashSet<PhotoId>>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    if let Some(field) = context.field.as_deref() {
        context.queued_photos.retain(|id| field.photo(id).is_none());
    }

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {parse_error}");
                rpc_interface.queue_response(RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: None,
                    error: Some(RpcError::parse_error(&parse_error.to_string())),
                    id: None,
                });
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    // Notifications have no id and never get a response.
    let Some(id) = request.id.clone() else {
        handle_rpc_notification(request, context);
        return None;
    };

    let result = match request.method.as_str() {
        "toggle_morph" => handle_toggle_morph(context),
        "set_morph_state" => handle_set_morph_state(&request.params, context),
        "add_photo" => handle_add_photo(&request.params, context),
        "start_tracking" => handle_tracking(TrackingAction::Start, context),
        "stop_tracking" => handle_tracking(TrackingAction::Stop, context),
        "get_status" => handle_get_status(context),
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

fn handle_rpc_notification(request: &RpcRequest, context: &mut RpcContext) {
    match request.method.as_str() {
        "hand_landmarks" => {
            let detection = match serde_json::from_value::<DetectionResult>(request.params.clone())
            {
                Ok(detection) => detection,
                Err(error) => {
                    warn!("Dropping malformed landmark frame: {error}");
                    return;
                }
            };
            // Frames outside a remote session are dropped by the controller.
            if let Some(reason) = detection.error.as_deref() {
                warn!("Host page reported a tracking error: {reason}");
                context.controller.report_pushed_failure(reason);
                return;
            }
            let min_confidence = context.tuning.tracking.min_confidence;
            context
                .controller
                .ingest(detection.confident_hand(min_confidence));
        }
        _ => debug!("Ignoring RPC notification: {}", request.method),
    }
}

fn handle_toggle_morph(context: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    let from = context.machine.state();
    context.morph_commands.write(MorphCommand {
        action: MorphAction::Toggle,
        source: CommandSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "from": from,
        "to": from.opposite()
    }))
}

fn handle_set_morph_state(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetMorphStateParams {
        state: String,
    }

    let parsed = serde_json::from_value::<SetMorphStateParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'state' parameter"))?;
    let state = MorphState::from_string(&parsed.state)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown state: {}", parsed.state)))?;

    context.morph_commands.write(MorphCommand {
        action: MorphAction::Set(state),
        source: CommandSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "state": state
    }))
}

fn handle_add_photo(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct AddPhotoParams {
        id: String,
        url: String,
    }

    let parsed = serde_json::from_value::<AddPhotoParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' and 'url' parameters"))?;
    if parsed.id.is_empty() || parsed.url.is_empty() {
        return Err(RpcError::invalid_params("'id' and 'url' must not be empty"));
    }

    let id = PhotoId(parsed.id);
    let exists = context
        .field
        .as_ref()
        .is_some_and(|field| field.photo(&id).is_some());
    if exists || context.queued_photos.contains(&id) {
        return Err(RpcError::invalid_params(&format!("Photo '{id}' already exists")));
    }
    context.queued_photos.insert(id.clone());

    context.uploads.write(PhotoUploadRequest {
        id: id.clone(),
        url: parsed.url,
        source: UploadSource::Rpc,
    });
    info!("Photo upload queued: {id}");

    Ok(serde_json::json!({
        "success": true,
        "id": id
    }))
}

fn handle_tracking(
    action: TrackingAction,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    context.tracking_requests.write(TrackingRequest { action });

    // The request is applied later this frame; the outcome arrives as a
    // `tracking_status` notification.
    Ok(serde_json::json!({
        "success": true,
        "previous": context.controller.status()
    }))
}

fn handle_get_status(context: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(context.status.snapshot())
        .map_err(|error| RpcError::internal_error(&error.to_string()))
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

/// Send serialized message to parent window (host page).
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
    pub fn parse_error(message: &str) -> Self {
        Self {
            code: -32700,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gesture::classifier::{GestureKind, GestureSample};
    use crate::engine::gesture::latch::GestureLatch;
    use crate::engine::tracking::session::RemoteLandmarkFeed;
    use crate::engine::tracking::systems::CurrentGesture;

    fn app() -> App {
        let latch = GestureLatch::default();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<WebRpcInterface>()
            .init_resource::<MorphStateMachine>()
            .init_resource::<CurrentGesture>()
            .init_resource::<MorphTuning>()
            .insert_resource(latch.clone())
            .insert_resource(TrackingController::new(latch))
            .add_event::<IncomingRpcMessage>()
            .add_event::<MorphCommand>()
            .add_event::<TrackingRequest>()
            .add_event::<PhotoUploadRequest>()
            .add_systems(Update, handle_rpc_messages);
        app
    }

    fn call(app: &mut App, message: serde_json::Value) -> Option<RpcResponse> {
        app.world_mut().send_event(IncomingRpcMessage {
            content: message.to_string(),
        });
        app.update();
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .outgoing_responses
            .pop()
    }

    fn error_code(response: Option<RpcResponse>) -> Option<i32> {
        response.and_then(|response| response.error).map(|error| error.code)
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "paint_it_blue", "id": 1}),
        );
        assert_eq!(error_code(response), Some(-32601));
    }

    #[test]
    fn malformed_params_are_invalid_params() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "set_morph_state",
                "params": {"state": "SIDEWAYS"}, "id": 2}),
        );
        assert_eq!(error_code(response), Some(-32602));

        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "add_photo",
                "params": {"id": 5}, "id": 3}),
        );
        assert_eq!(error_code(response), Some(-32602));
    }

    #[test]
    fn toggle_queues_a_morph_command_and_echoes_the_id() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "toggle_morph", "id": "t-1"}),
        )
        .expect("requests with an id get a response");

        assert!(response.error.is_none());
        assert_eq!(response.id, Some(serde_json::json!("t-1")));
        let result = response.result.expect("result present");
        assert_eq!(result["to"], "TREE_SHAPE");

        let commands = app.world().resource::<Events<MorphCommand>>();
        let queued: Vec<_> = commands.iter_current_update_events().collect();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].source, CommandSource::Rpc);
    }

    #[test]
    fn landmark_notifications_feed_a_remote_session() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<TrackingController>()
            .start(Box::new(RemoteLandmarkFeed));

        let fist = crate::engine::gesture::classifier::tests::hand_with([false; 4], Vec3::ZERO);
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "hand_landmarks",
                "params": {"hands": [{"landmarks": fist}]}}),
        );
        assert!(response.is_none());

        let read = app
            .world()
            .resource::<GestureLatch>()
            .try_read()
            .expect("uncontended read");
        assert_eq!(read.sample.map(|sample| sample.kind), Some(GestureKind::Fist));
    }

    #[test]
    fn low_scoring_landmarks_are_not_published() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<TrackingController>()
            .start(Box::new(RemoteLandmarkFeed));

        let fist = crate::engine::gesture::classifier::tests::hand_with([false; 4], Vec3::ZERO);
        call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "hand_landmarks",
                "params": {"hands": [{"score": 0.1, "landmarks": fist}]}}),
        );

        let read = app
            .world()
            .resource::<GestureLatch>()
            .try_read()
            .expect("uncontended read");
        assert_eq!(read.sample, Some(GestureSample::NEUTRAL));
    }

    #[test]
    fn reported_tracking_error_makes_tracking_unavailable() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<TrackingController>()
            .start(Box::new(RemoteLandmarkFeed));

        call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "hand_landmarks",
                "params": {"hands": [], "error": "camera permission denied"}}),
        );

        let mut controller = app.world_mut().resource_mut::<TrackingController>();
        controller.supervise();
        assert!(!controller.status().is_active());
        assert_eq!(controller.status().label(), "unavailable");
    }

    #[test]
    fn same_photo_twice_in_one_frame_is_rejected() {
        let mut app = app();
        for id in [1, 2] {
            app.world_mut().send_event(IncomingRpcMessage {
                content: serde_json::json!({"jsonrpc": "2.0", "method": "add_photo",
                    "params": {"id": "tree", "url": "photos/tree.jpg"}, "id": id})
                .to_string(),
            });
        }
        app.update();

        let responses = &app.world().resource::<WebRpcInterface>().outgoing_responses;
        assert_eq!(responses.len(), 2);
        assert!(responses[0].error.is_none());
        assert_eq!(responses[1].error.as_ref().map(|error| error.code), Some(-32602));

        let uploads = app.world().resource::<Events<PhotoUploadRequest>>();
        assert_eq!(uploads.iter_current_update_events().count(), 1);
    }

    #[test]
    fn unparseable_messages_answer_parse_error() {
        let mut app = app();
        let response = call_raw(&mut app, "{\"jsonrpc\": \"2.0\", \"method\": ");
        assert_eq!(error_code(response), Some(-32700));
    }

    fn call_raw(app: &mut App, content: &str) -> Option<RpcResponse> {
        app.world_mut().send_event(IncomingRpcMessage {
            content: content.to_string(),
        });
        app.update();
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .outgoing_responses
            .pop()
    }
}
