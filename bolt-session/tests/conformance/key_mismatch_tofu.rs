//! Scenario 6: pin store has `PEER01 -> K1`; a HELLO arrives claiming
//! identity `K2 != K1` for that same peer code.

use bolt_core::crypto::{generate_ephemeral_keypair, seal_box_payload};
use bolt_core::identity::generate_identity_keypair;
use bolt_core::pin::{InMemoryPinStore, PinPersistence, PinRecord};
use bolt_session::hello::build_inner;
use bolt_session::transport::InMemoryDataChannel;
use bolt_session::{EngineConfig, Session};

use crate::support::RecordingCallbacks;

#[tokio::test]
async fn mismatched_identity_key_for_pinned_peer_code_is_rejected() {
    let pinned_identity = generate_identity_keypair();

    let mut pin_store = InMemoryPinStore::default();
    pin_store.set_pin(
        "PEER01",
        PinRecord {
            identity_pub: pinned_identity.public_key,
            verified: false,
        },
    );

    let ((channel, _rx), (_peer_channel, _peer_rx)) = InMemoryDataChannel::pair();
    let callbacks = RecordingCallbacks::default();

    let mut receiver = Session::new(
        EngineConfig::default(),
        Some(generate_identity_keypair()),
        Some(Box::new(pin_store)),
        "PEER01",
        channel,
        callbacks.clone(),
    );

    let impostor_identity = generate_identity_keypair();
    let impostor_eph = generate_ephemeral_keypair();
    receiver.begin_handshake(impostor_eph.public_key).await.unwrap();

    let inner = build_inner(
        &impostor_identity.public_key,
        vec!["bolt.file-hash".to_string(), "bolt.profile-envelope-v1".to_string()],
    );
    let inner_json = serde_json::to_string(&inner).unwrap();
    let sealed = seal_box_payload(inner_json.as_bytes(), &receiver.local_ephemeral_public(), &impostor_eph.secret_key).unwrap();
    let outer = serde_json::json!({"type": "hello", "payload": sealed});

    receiver.handle_inbound(&outer.to_string()).await;

    assert!(receiver.state().is_closed());
    assert!(callbacks.last_error_contains("PEER01"));
}
