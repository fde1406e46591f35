use bevy::prelude::*;

use crate::engine::gesture::classifier::GestureSample;
use crate::engine::gesture::latch::GestureLatch;
use crate::engine::tracking::session::{HandTrackingSession, TrackingController, TrackingStatus};
use crate::engine::tuning::MorphTuning;

/// Snapshot of the newest gesture, refreshed once per frame from the latch.
/// Everything downstream reads this instead of the latch.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentGesture(pub GestureSample);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingAction {
    Start,
    Stop,
    Toggle,
}

/// Request to start or stop hand tracking from the keyboard or RPC.
#[derive(Event, Debug, Clone, Copy)]
pub struct TrackingRequest {
    pub action: TrackingAction,
}

/// Fired whenever the controller's status changes.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TrackingStatusChanged(pub TrackingStatus);

/// Platform session for a start request: the configured child process on
/// native builds, the page-fed remote feed on the web.
fn create_session(tuning: &MorphTuning) -> Result<Box<dyn HandTrackingSession>, String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use crate::engine::tracking::subprocess::SubprocessTracker;

        SubprocessTracker::from_config(&tuning.tracking)
            .map(|tracker| Box::new(tracker) as Box<dyn HandTrackingSession>)
            .ok_or_else(|| "no landmark producer configured".to_string())
    }

    #[cfg(target_arch = "wasm32")]
    {
        use crate::engine::tracking::session::RemoteLandmarkFeed;

        let _ = tuning;
        Ok(Box::new(RemoteLandmarkFeed))
    }
}

fn start_tracking(controller: &mut TrackingController, tuning: &MorphTuning) {
    match create_session(tuning) {
        Ok(session) => {
            controller.start(session);
        }
        Err(reason) => controller.mark_unavailable(reason),
    }
}

pub fn autostart_tracking(mut controller: ResMut<TrackingController>, tuning: Res<MorphTuning>) {
    if tuning.tracking.autostart {
        start_tracking(&mut controller, &tuning);
    }
}

pub fn handle_tracking_requests(
    mut requests: EventReader<TrackingRequest>,
    mut controller: ResMut<TrackingController>,
    tuning: Res<MorphTuning>,
) {
    for request in requests.read() {
        let start = match request.action {
            TrackingAction::Start => true,
            TrackingAction::Stop => false,
            TrackingAction::Toggle => !controller.is_running(),
        };

        if start {
            start_tracking(&mut controller, &tuning);
        } else {
            controller.stop();
        }
    }
}

/// Promotes, demotes and reports the tracking status.
pub fn supervise_tracking(
    mut controller: ResMut<TrackingController>,
    mut last_reported: Local<Option<TrackingStatus>>,
    mut changed: EventWriter<TrackingStatusChanged>,
) {
    controller.supervise();

    let status = controller.status();
    if last_reported.as_ref() != Some(status) {
        *last_reported = Some(status.clone());
        changed.write(TrackingStatusChanged(status.clone()));
    }
}

/// Copies the newest sample out of the latch without waiting. A contended
/// read keeps last frame's snapshot; an empty latch reads as neutral.
pub fn sample_gesture_latch(latch: Res<GestureLatch>, mut current: ResMut<CurrentGesture>) {
    if let Some(read) = latch.try_read() {
        let sample = read.sample.unwrap_or(GestureSample::NEUTRAL);
        if current.0 != sample {
            current.0 = sample;
        }
    }
}
