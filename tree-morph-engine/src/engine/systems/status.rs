use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::Serialize;

use crate::engine::field::elements::PhotoId;
use crate::engine::field::morph_field::MorphField;
use crate::engine::gesture::classifier::{GestureKind, GestureSample};
use crate::engine::loading::photo_textures::PhotoTextureStateChanged;
use crate::engine::morph::state_machine::{MorphState, MorphStateChanged, MorphStateMachine};
use crate::engine::tracking::session::{TrackingController, TrackingStatus};
use crate::engine::tracking::systems::{CurrentGesture, TrackingStatusChanged};
use crate::rpc::web_rpc::WebRpcInterface;

/// Seconds between periodic `status_update` notifications.
const STATUS_INTERVAL_SECS: f32 = 0.5;

#[derive(Component)]
pub struct StatusText;

/// Everything the UI collaborator shows, in one serialisable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub state: MorphState,
    pub gesture: GestureSample,
    pub tracking_active: bool,
    pub tracking: TrackingStatus,
    pub photos: usize,
    pub focused_photo: Option<PhotoId>,
    pub fps: Option<f32>,
}

/// Read-only view over the resources a status snapshot is built from.
#[derive(SystemParam)]
pub struct StatusSources<'w> {
    machine: Res<'w, MorphStateMachine>,
    gesture: Res<'w, CurrentGesture>,
    controller: Res<'w, TrackingController>,
    field: Option<Res<'w, MorphField>>,
    diagnostics: Option<Res<'w, DiagnosticsStore>>,
}

impl StatusSources<'_> {
    pub fn snapshot(&self) -> StatusSnapshot {
        let fps = self
            .diagnostics
            .as_ref()
            .and_then(|diagnostics| diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS))
            .and_then(|fps| fps.smoothed())
            .map(|value| value as f32);

        StatusSnapshot {
            state: self.machine.state(),
            gesture: self.gesture.0,
            tracking_active: self.controller.status().is_active(),
            tracking: self.controller.status().clone(),
            photos: self.field.as_ref().map_or(0, |field| field.photos().len()),
            focused_photo: self
                .field
                .as_ref()
                .and_then(|field| field.focused_photo().cloned()),
            fps,
        }
    }
}

pub fn status_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    sources: StatusSources,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    if current_time - *last_send_time >= STATUS_INTERVAL_SECS {
        match serde_json::to_value(sources.snapshot()) {
            Ok(params) => rpc_interface.send_notification("status_update", params),
            Err(error) => error!("Failed to serialise status snapshot: {error}"),
        }
        *last_send_time = current_time;
    }
}

/// Forwards state edges to the host page as they happen.
pub fn broadcast_state_changes(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut morph_events: EventReader<MorphStateChanged>,
    mut tracking_events: EventReader<TrackingStatusChanged>,
    mut texture_events: EventReader<PhotoTextureStateChanged>,
    gesture: Res<CurrentGesture>,
    mut last_gesture: Local<GestureKind>,
) {
    for event in morph_events.read() {
        rpc_interface.send_notification(
            "morph_state_changed",
            serde_json::json!({
                "from": event.from,
                "to": event.to,
                "source": event.source,
            }),
        );
    }

    for TrackingStatusChanged(status) in tracking_events.read() {
        rpc_interface.send_notification(
            "tracking_status",
            serde_json::json!({
                "active": status.is_active(),
                "status": status,
            }),
        );
    }

    for event in texture_events.read() {
        rpc_interface.send_notification(
            "photo_texture_state",
            serde_json::json!({
                "id": event.id,
                "state": event.state,
            }),
        );
    }

    let kind = gesture.0.kind;
    if kind != *last_gesture {
        *last_gesture = kind;
        rpc_interface.send_notification("gesture_changed", serde_json::json!({ "gesture": kind }));
    }
}

pub fn status_text_update_system(
    sources: StatusSources,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let snapshot = sources.snapshot();
    let fps = snapshot
        .fps
        .map_or_else(|| "--".to_string(), |value| format!("{value:.1}"));

    for mut text in &mut query {
        text.0 = format!(
            "FPS: {fps}\n{} | gesture {} | tracking {}",
            snapshot.state.as_str(),
            snapshot.gesture.kind.as_str(),
            snapshot.tracking.label()
        );
    }
}
