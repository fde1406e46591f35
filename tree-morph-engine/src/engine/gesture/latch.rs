use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use bevy::prelude::*;

use crate::engine::gesture::classifier::{GestureSample, classify};
use crate::engine::gesture::landmarks::Landmark;

#[derive(Debug, Default)]
struct LatchSlot {
    sample: Option<GestureSample>,
    frames: u64,
    failure: Option<String>,
}

/// Most recent gesture sample, shared between one producer session and the
/// render loop.
///
/// Samples are copied in and out whole under the lock, so a reader never sees
/// a torn value. Each tracking session publishes through a [`FrameSink`]
/// stamped with the generation it was opened under; closing the session bumps
/// the generation under the same lock, so late frames from a stopped session
/// are dropped.
#[derive(Resource, Clone, Default)]
pub struct GestureLatch {
    slot: Arc<Mutex<LatchSlot>>,
    generation: Arc<AtomicU64>,
}

/// Result of a non-blocking read.
#[derive(Debug, Clone, PartialEq)]
pub struct LatchRead {
    /// Newest sample of the live session, `None` if nothing arrived yet.
    pub sample: Option<GestureSample>,
    /// Frames published by the live session so far.
    pub frames: u64,
}

impl GestureLatch {
    fn lock(&self) -> MutexGuard<'_, LatchSlot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a new session, invalidating every earlier sink.
    pub fn open_session(&self) -> FrameSink {
        let mut slot = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = LatchSlot::default();
        FrameSink {
            latch: self.clone(),
            generation,
        }
    }

    /// Ends the live session. Frames still in flight are discarded.
    pub fn close_session(&self) {
        let mut slot = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = LatchSlot::default();
    }

    /// Reads without waiting. `None` means the producer holds the lock this
    /// instant and the caller should keep its previous sample.
    pub fn try_read(&self) -> Option<LatchRead> {
        let slot = match self.slot.try_lock() {
            Ok(slot) => slot,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };

        Some(LatchRead {
            sample: slot.sample,
            frames: slot.frames,
        })
    }

    /// Takes the failure reported by the live session, if any.
    pub fn take_failure(&self) -> Option<String> {
        match self.slot.try_lock() {
            Ok(mut slot) => slot.failure.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().failure.take(),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

/// Producer handle for one tracking session.
#[derive(Clone)]
pub struct FrameSink {
    latch: GestureLatch,
    generation: u64,
}

impl FrameSink {
    /// Whether the session this sink belongs to is still live.
    pub fn is_current(&self) -> bool {
        self.latch.generation.load(Ordering::SeqCst) == self.generation
    }

    /// Stores `sample` as the newest. Returns `false` if the session is stale.
    pub fn publish(&self, sample: GestureSample) -> bool {
        let mut slot = self.latch.lock();
        if self.latch.generation.load(Ordering::SeqCst) != self.generation {
            return false;
        }

        slot.sample = Some(sample);
        slot.frames += 1;
        true
    }

    /// Classifies and publishes one landmark frame.
    pub fn publish_landmarks(&self, landmarks: &[Landmark]) -> bool {
        self.publish(classify(landmarks))
    }

    /// Publishes the neutral sample for a frame without a hand.
    pub fn publish_no_hand(&self) -> bool {
        self.publish(GestureSample::NEUTRAL)
    }

    /// Records an asynchronous session failure for the render loop to pick up.
    pub fn report_failure(&self, reason: impl Into<String>) {
        let mut slot = self.latch.lock();
        if self.latch.generation.load(Ordering::SeqCst) == self.generation {
            slot.failure = Some(reason.into());
        }
    }
}
