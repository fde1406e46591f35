//! Hand gesture input: landmark frames in, discrete gesture samples out.
//!
//! The classifier is a pure per-frame function. History lives on the
//! consumer side: the latch keeps only the newest sample and the edge
//! detector remembers only the previous kind.

/// MediaPipe hand landmark layout.
pub mod landmarks;

/// Finger-count heuristic producing `GestureSample`s.
pub mod classifier;

/// Consumer-side detection of the first frame of a new gesture.
pub mod edge;

/// Single-slot handoff between the tracking thread and the render loop.
pub mod latch;
