//! HELLO frame construction, parsing, and schema validation
//! (`spec.md` §4.5.2, §4.5.3).
//!
//! `process_hello` itself — the stateful, reentrancy-guarded, single-entry
//! handler — lives on [`crate::engine::Session`], since it needs the
//! session's keys, pin store, and capability/verification-state fields.
//! This module provides the pure, testable pieces: building the outbound
//! frame and validating an inbound one step by step, each failure
//! carrying the exact wire code `spec.md` assigns to that step.

use serde::{Deserialize, Serialize};

use bolt_core::encoding::{from_base64, to_base64};

use crate::capabilities;

pub const HELLO_TYPE: &str = "hello";
pub const HELLO_VERSION: u32 = 1;

/// The decrypted inner HELLO payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloInner {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub version: u32,
    pub identity_public_key: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// The plaintext-outer `{type:"hello", payload}` wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloOuter {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub payload: String,
}

/// Precisely which step of `processHello` (`spec.md` §4.5.3) failed, each
/// tagged with its canonical wire code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelloFailure {
    /// Step 1/2: no keys present, or decryption failed.
    DecryptFailed,
    /// Step 3: payload did not parse as JSON.
    ParseError,
    /// Step 4: `type`/`version`/`identityPublicKey` missing or wrong, or
    /// the identity key did not decode to 32 bytes.
    SchemaError,
    /// Step 6/7: capability bounds exceeded, or the downgrade defence
    /// (missing `bolt.profile-envelope-v1` when identity is configured),
    /// carrying the specific reason for `onError`.
    ProtocolViolation(String),
}

impl HelloFailure {
    pub fn wire_code(&self) -> &'static str {
        match self {
            HelloFailure::DecryptFailed => "HELLO_DECRYPT_FAIL",
            HelloFailure::ParseError => "HELLO_PARSE_ERROR",
            HelloFailure::SchemaError => "HELLO_SCHEMA_ERROR",
            HelloFailure::ProtocolViolation(_) => "PROTOCOL_VIOLATION",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            HelloFailure::DecryptFailed => "HELLO payload failed to decrypt",
            HelloFailure::ParseError => "HELLO payload was not valid JSON",
            HelloFailure::SchemaError => "HELLO payload did not match the expected schema",
            HelloFailure::ProtocolViolation(reason) => reason,
        }
    }
}

/// Build the inner HELLO payload (before sealing).
pub fn build_inner(local_identity_pub: &[u8; 32], capabilities: Vec<String>) -> HelloInner {
    HelloInner {
        msg_type: HELLO_TYPE.to_string(),
        version: HELLO_VERSION,
        identity_public_key: to_base64(local_identity_pub),
        capabilities,
    }
}

/// `spec.md` §4.5.3 step 3: parse the decrypted payload as JSON.
pub fn parse_json(inner_plaintext: &str) -> Result<serde_json::Value, HelloFailure> {
    serde_json::from_str(inner_plaintext).map_err(|_| HelloFailure::ParseError)
}

/// `spec.md` §4.5.3 step 4-5: validate schema and decode the identity key.
/// Missing/non-array `capabilities` is treated as `[]`.
pub fn extract_schema(value: &serde_json::Value) -> Result<([u8; 32], Vec<String>), HelloFailure> {
    let msg_type = value.get("type").and_then(|v| v.as_str());
    let version = value.get("version").and_then(|v| v.as_u64());
    let identity_b64 = value.get("identityPublicKey").and_then(|v| v.as_str());

    if msg_type != Some(HELLO_TYPE) || version != Some(HELLO_VERSION as u64) || identity_b64.is_none() {
        return Err(HelloFailure::SchemaError);
    }

    let decoded = from_base64(identity_b64.unwrap()).map_err(|_| HelloFailure::SchemaError)?;
    let identity_pub: [u8; 32] = decoded.try_into().map_err(|_| HelloFailure::SchemaError)?;

    let caps = match value.get("capabilities") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<String>>>()
            .ok_or(HelloFailure::SchemaError)?,
        _ => Vec::new(),
    };

    Ok((identity_pub, caps))
}

/// `spec.md` §4.5.3 step 6-7: bounds-check capabilities, then (when local
/// identity is configured) enforce the downgrade defence.
pub fn validate_capabilities(
    caps: &[String],
    local_identity_configured: bool,
) -> Result<(), HelloFailure> {
    capabilities::validate_remote_capabilities(caps).map_err(protocol_violation)?;
    if local_identity_configured {
        capabilities::enforce_envelope_required(caps).map_err(protocol_violation)?;
    }
    Ok(())
}

/// Unwraps the reason out of a [`crate::errors::SessionError::Protocol`]
/// instead of carrying its `Display` prefix into [`HelloFailure`]'s own.
fn protocol_violation(err: crate::errors::SessionError) -> HelloFailure {
    match err {
        crate::errors::SessionError::Protocol(reason) => HelloFailure::ProtocolViolation(reason),
        other => HelloFailure::ProtocolViolation(other.to_string()),
    }
}
