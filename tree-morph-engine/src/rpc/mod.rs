//! JSON-RPC 2.0 bridge between the engine and the host page.
//!
//! On wasm the engine runs in an iframe and exchanges messages with its parent
//! window over `postMessage`. Native builds keep the plumbing but never send
//! anything; the keyboard and drag-and-drop stand in for the page.
//!
//! Requests carry an `id` and always get a response. Messages without an `id`
//! are notifications and never do. Malformed JSON answers `-32700` with a null
//! id, unknown methods `-32601`, bad params `-32602`.
//!
//! Requests:
//! - `toggle_morph`: flip between the scattered and tree formations.
//! - `set_morph_state {state}`: `SCATTERED` or `TREE_SHAPE`.
//! - `add_photo {id, url}`: append a panel. An id already on the field, or
//!   already accepted and still queued, is rejected.
//! - `start_tracking` / `stop_tracking`: run or stop the page-fed session.
//! - `get_status`: morph state, gesture, tracking, photos and FPS.
//!
//! Inbound notification `hand_landmarks` carries one detection frame,
//! `{"hands": [{"score", "landmarks": [{x, y, z}; 21]}], "error"}`. Hands below
//! the tuned confidence are skipped; an `error` makes tracking unavailable.
//!
//! Outbound notifications: `status_update` (periodic), `morph_state_changed`,
//! `gesture_changed`, `tracking_status`, `photo_texture_state`.

/// Message types, the plugin and the request handlers.
pub mod web_rpc;
