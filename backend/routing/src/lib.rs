//! Request routing: session-token extraction and intent resolution.
//!
//! Maps an inbound webhook payload to the conversation it belongs to and the
//! handler that should serve it.

pub mod intent;
pub mod session_key;

pub use intent::Intent;
pub use session_key::extract_session_id;
