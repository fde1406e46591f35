use bevy::prelude::*;
use serde::Serialize;

use crate::engine::gesture::landmarks::Landmark;
use crate::engine::gesture::latch::{FrameSink, GestureLatch};

/// A source of hand landmark frames with start/stop semantics.
///
/// `start` must return quickly; capture and inference run on the session's
/// own cadence and publish through the sink.
pub trait HandTrackingSession: Send + Sync {
    /// Short label used in logs and status notifications.
    fn name(&self) -> &str;

    fn start(&mut self, sink: FrameSink) -> anyhow::Result<()>;

    fn stop(&mut self);

    /// Whether frames arrive by being pushed through the controller
    /// instead of from the session's own producer.
    fn accepts_pushed_frames(&self) -> bool {
        false
    }
}

/// Session whose frames are pushed in from outside, e.g. by the host page
/// over the RPC bridge.
#[derive(Debug, Default)]
pub struct RemoteLandmarkFeed;

impl HandTrackingSession for RemoteLandmarkFeed {
    fn name(&self) -> &str {
        "remote"
    }

    fn start(&mut self, _sink: FrameSink) -> anyhow::Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn accepts_pushed_frames(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackingStatus {
    #[default]
    Idle,
    /// Session started, no frame seen yet.
    Starting { source: String },
    Active { source: String },
    Unavailable { reason: String },
}

impl TrackingStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TrackingStatus::Active { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Idle => "idle",
            TrackingStatus::Starting { .. } => "starting",
            TrackingStatus::Active { .. } => "active",
            TrackingStatus::Unavailable { .. } => "unavailable",
        }
    }
}

/// Owns the live session, its sink and the reported status.
#[derive(Resource, Default)]
pub struct TrackingController {
    latch: GestureLatch,
    session: Option<Box<dyn HandTrackingSession>>,
    sink: Option<FrameSink>,
    status: TrackingStatus,
}

impl TrackingController {
    pub fn new(latch: GestureLatch) -> Self {
        Self {
            latch,
            ..default()
        }
    }

    pub fn status(&self) -> &TrackingStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Replaces any live session with `session`. A failed start is logged and
    /// reported as unavailable; it never propagates.
    pub fn start(&mut self, mut session: Box<dyn HandTrackingSession>) -> &TrackingStatus {
        self.stop_session();

        let sink = self.latch.open_session();
        match session.start(sink.clone()) {
            Ok(()) => {
                info!("Hand tracking started ({})", session.name());
                self.status = TrackingStatus::Starting {
                    source: session.name().to_string(),
                };
                self.session = Some(session);
                self.sink = Some(sink);
            }
            Err(error) => {
                self.latch.close_session();
                self.mark_unavailable(format!("{error:#}"));
            }
        }

        &self.status
    }

    /// Stops the live session; frames still in flight are discarded.
    pub fn stop(&mut self) -> &TrackingStatus {
        if self.session.is_some() {
            self.stop_session();
            info!("Hand tracking stopped");
        }
        self.status = TrackingStatus::Idle;
        &self.status
    }

    /// Tears the session down and records why. Manual control keeps working.
    pub fn mark_unavailable(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Hand tracking unavailable: {reason}");
        self.stop_session();
        self.status = TrackingStatus::Unavailable { reason };
    }

    /// Feeds a pushed frame to the live session. `None` is a frame without a
    /// hand. Returns `false` when no push-fed session is live.
    pub fn ingest(&self, landmarks: Option<&[Landmark]>) -> bool {
        let Some(sink) = self.pushed_sink() else {
            return false;
        };

        match landmarks {
            Some(landmarks) => sink.publish_landmarks(landmarks),
            None => sink.publish_no_hand(),
        }
    }

    /// Records a failure reported by the pushing side. The next `supervise`
    /// marks tracking unavailable. Returns `false` when no push-fed session
    /// is live.
    pub fn report_pushed_failure(&self, reason: impl Into<String>) -> bool {
        let Some(sink) = self.pushed_sink() else {
            return false;
        };

        sink.report_failure(reason);
        true
    }

    fn pushed_sink(&self) -> Option<&FrameSink> {
        let accepts = self
            .session
            .as_ref()
            .is_some_and(|session| session.accepts_pushed_frames());
        self.sink.as_ref().filter(|_| accepts)
    }

    /// Picks up asynchronous failures and promotes `Starting` to `Active`
    /// once the first frame lands. Returns whether the status changed.
    pub fn supervise(&mut self) -> bool {
        if let Some(reason) = self.latch.take_failure() {
            self.mark_unavailable(reason);
            return true;
        }

        if let TrackingStatus::Starting { source } = &self.status {
            let has_frames = self
                .latch
                .try_read()
                .is_some_and(|read| read.frames > 0);
            if has_frames {
                self.status = TrackingStatus::Active {
                    source: source.clone(),
                };
                return true;
            }
        }

        false
    }

    fn stop_session(&mut self) {
        self.latch.close_session();
        self.sink = None;
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }
}
