//! Scenario 2: an attacker strips `bolt.profile-envelope-v1` from an
//! otherwise valid HELLO sent to an identity-configured receiver.

use bolt_core::crypto::{generate_ephemeral_keypair, seal_box_payload};
use bolt_core::identity::generate_identity_keypair;
use bolt_core::pin::InMemoryPinStore;
use bolt_session::hello::build_inner;
use bolt_session::transport::InMemoryDataChannel;
use bolt_session::{EngineConfig, Session};

use crate::support::RecordingCallbacks;

#[tokio::test]
async fn stripped_envelope_capability_is_rejected_as_protocol_violation() {
    let ((channel, _rx), (_peer_channel, _peer_rx)) = InMemoryDataChannel::pair();
    let callbacks = RecordingCallbacks::default();

    let mut receiver = Session::new(
        EngineConfig::default(),
        Some(generate_identity_keypair()),
        Some(Box::new(InMemoryPinStore::default())),
        "PEER01",
        channel,
        callbacks.clone(),
    );

    let attacker_identity = generate_identity_keypair();
    let attacker_eph = generate_ephemeral_keypair();
    receiver.begin_handshake(attacker_eph.public_key).await.unwrap();

    // a valid HELLO, minus the required envelope capability
    let inner = build_inner(&attacker_identity.public_key, vec!["bolt.file-hash".to_string()]);
    let inner_json = serde_json::to_string(&inner).unwrap();
    let sealed = seal_box_payload(inner_json.as_bytes(), &receiver.local_ephemeral_public(), &attacker_eph.secret_key).unwrap();
    let outer = serde_json::json!({"type": "hello", "payload": sealed});

    receiver.handle_inbound(&outer.to_string()).await;

    assert!(receiver.state().is_closed());
    assert!(callbacks.last_error_contains("Missing required capability: bolt.profile-envelope-v1"));
}
