//! Encoding and request shaping for the contents endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::contract::{PutContentRequest, RemoteFile};

pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// # Errors
/// Fails when `encoded` is not valid padded standard base64.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

pub fn commit_message(remote_path: &str) -> String {
    format!("Update {remote_path}")
}

/// Builds the write body. `existing` is the lookup result: when the remote
/// already has the file its `sha` is echoed back so the write is an update.
pub fn put_request(
    remote_path: &str,
    bytes: &[u8],
    branch: &str,
    existing: Option<RemoteFile>,
) -> PutContentRequest {
    PutContentRequest {
        message: commit_message(remote_path),
        content: encode_content(bytes),
        branch: branch.to_string(),
        sha: existing.map(|f| f.sha),
    }
}
