//! Scenario 3: a second `hello` frame arrives after the handshake has
//! already completed. Expect exactly one `DUPLICATE_HELLO` error,
//! disconnect, and no corruption of the capabilities negotiated the
//! first time around.

use bolt_core::crypto::{generate_ephemeral_keypair, seal_box_payload};
use bolt_core::identity::generate_identity_keypair;
use bolt_core::pin::InMemoryPinStore;
use bolt_session::hello::build_inner;
use bolt_session::transport::InMemoryDataChannel;
use bolt_session::{EngineConfig, Session};

use crate::support::RecordingCallbacks;

#[tokio::test]
async fn second_hello_after_handshake_completion_is_rejected() {
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

    let sender_identity = generate_identity_keypair();
    let sender_eph = generate_ephemeral_keypair();
    receiver.begin_handshake(sender_eph.public_key).await.unwrap();

    let build_hello = || {
        let inner = build_inner(
            &sender_identity.public_key,
            vec!["bolt.file-hash".to_string(), "bolt.profile-envelope-v1".to_string()],
        );
        let inner_json = serde_json::to_string(&inner).unwrap();
        let sealed = seal_box_payload(inner_json.as_bytes(), &receiver.local_ephemeral_public(), &sender_eph.secret_key).unwrap();
        serde_json::json!({"type": "hello", "payload": sealed}).to_string()
    };

    receiver.handle_inbound(&build_hello()).await;
    assert!(receiver.state().is_post_hello());
    let negotiated_once = receiver.negotiated_capabilities().to_vec();
    assert_eq!(
        negotiated_once,
        vec!["bolt.file-hash".to_string(), "bolt.profile-envelope-v1".to_string()]
    );
    assert!(callbacks.errors.lock().unwrap().is_empty());

    receiver.handle_inbound(&build_hello()).await;

    assert!(receiver.state().is_closed(), "a duplicate HELLO must tear the session down");
    let errors = callbacks.errors.lock().unwrap();
    assert_eq!(errors.len(), 1, "exactly one error must surface for the duplicate HELLO");
    assert!(errors[0].contains("DUPLICATE_HELLO"));
}
