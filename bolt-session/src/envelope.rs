//! Profile Envelope v1 (`spec.md` §4.5.4, §6.1).

use serde::{Deserialize, Serialize};

use bolt_core::crypto::{open_box_payload, seal_box_payload};

use crate::errors::SessionError;

pub const ENVELOPE_TYPE: &str = "profile-envelope";
pub const ENVELOPE_VERSION: u32 = 1;
pub const ENVELOPE_ENCODING: &str = "base64";

/// The `{type:"profile-envelope", version:1, encoding:"base64", payload}`
/// wire wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEnvelopeV1 {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub version: u32,
    pub encoding: String,
    pub payload: String,
}

/// Wrap `inner_json` for the remote ephemeral key, using our ephemeral
/// secret.
pub fn wrap(inner_json: &str, remote_eph_pub: &[u8; 32], local_eph_secret: &[u8; 32]) -> Result<ProfileEnvelopeV1, SessionError> {
    let payload = seal_box_payload(inner_json.as_bytes(), remote_eph_pub, local_eph_secret)?;
    Ok(ProfileEnvelopeV1 {
        msg_type: ENVELOPE_TYPE.to_string(),
        version: ENVELOPE_VERSION,
        encoding: ENVELOPE_ENCODING.to_string(),
        payload,
    })
}

/// Outcome of validating then opening an inbound envelope.
pub enum UnwrapFailure {
    /// `version != 1`, `encoding != "base64"`, or `payload` not a string.
    Invalid,
    /// Well-formed envelope, but decryption failed.
    DecryptFailed,
}

/// Validate envelope shape, then decrypt and return the inner JSON string.
pub fn unwrap(
    envelope: &ProfileEnvelopeV1,
    remote_eph_pub: &[u8; 32],
    local_eph_secret: &[u8; 32],
) -> Result<String, UnwrapFailure> {
    if envelope.version != ENVELOPE_VERSION || envelope.encoding != ENVELOPE_ENCODING {
        return Err(UnwrapFailure::Invalid);
    }
    let plaintext = open_box_payload(&envelope.payload, remote_eph_pub, local_eph_secret)
        .map_err(|_| UnwrapFailure::DecryptFailed)?;
    String::from_utf8(plaintext).map_err(|_| UnwrapFailure::DecryptFailed)
}
