//! Capability advertisement and negotiation (`spec.md` §3, §4.5.3 step 6-8).

use crate::errors::SessionError;

/// SHA-256 end-to-end file integrity.
pub const CAP_FILE_HASH: &str = "bolt.file-hash";
/// Profile Envelope v1 wrapping of post-HELLO messages.
pub const CAP_PROFILE_ENVELOPE_V1: &str = "bolt.profile-envelope-v1";

/// `spec.md` §3: hard bound on the number of advertised capabilities.
pub const MAX_CAPABILITIES: usize = 32;
/// `spec.md` §3: hard bound on each capability's UTF-8 byte length.
pub const MAX_CAPABILITY_BYTES: usize = 64;

/// The two capabilities this engine advertises in its own HELLO.
pub fn local_capabilities() -> Vec<String> {
    vec![CAP_FILE_HASH.to_string(), CAP_PROFILE_ENVELOPE_V1.to_string()]
}

/// `spec.md` §4.5.3 step 6: missing/non-array capabilities are treated as
/// `[]` upstream (in `hello::extract_schema`); here we only enforce the
/// size bounds once we have a `Vec<String>`.
pub fn validate_remote_capabilities(capabilities: &[String]) -> Result<(), SessionError> {
    if capabilities.len() > MAX_CAPABILITIES {
        return Err(SessionError::Protocol("too many capabilities".into()));
    }
    for cap in capabilities {
        if cap.len() > MAX_CAPABILITY_BYTES {
            return Err(SessionError::Protocol("capability too long".into()));
        }
    }
    Ok(())
}

/// `spec.md` §4.5.3 step 7: the downgrade defence. If the local instance
/// is identity-configured, the remote MUST advertise envelope support.
pub fn enforce_envelope_required(remote_capabilities: &[String]) -> Result<(), SessionError> {
    if !remote_capabilities.iter().any(|c| c == CAP_PROFILE_ENVELOPE_V1) {
        return Err(SessionError::Protocol(format!(
            "Missing required capability: {CAP_PROFILE_ENVELOPE_V1}"
        )));
    }
    Ok(())
}

/// Intersect `remote` with `local`, preserving remote order
/// (`spec.md` §4.5.3 step 8). Immutable for the remainder of the session
/// once computed.
pub fn negotiate(remote: &[String], local: &[String]) -> Vec<String> {
    remote.iter().filter(|c| local.iter().any(|l| l == *c)).cloned().collect()
}
