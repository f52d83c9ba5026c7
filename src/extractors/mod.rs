//! Request extractors that reject with the gateway's JSON error body.

mod json;
mod record_id;

pub use json::JsonBody;
pub use record_id::RecordId;
