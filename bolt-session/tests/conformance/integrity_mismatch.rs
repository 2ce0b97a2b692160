//! Scenario 5: the final chunk completes a guarded transfer whose
//! advertised `fileHash` does not match the assembled blob. The receiver
//! must reject it, emit `INTEGRITY_FAILED`, and disconnect without ever
//! calling `onReceiveFile`.

use bolt_core::crypto::{generate_ephemeral_keypair, seal_box_payload};
use bolt_core::identity::generate_identity_keypair;
use bolt_core::pin::InMemoryPinStore;
use bolt_session::envelope::wrap;
use bolt_session::hello::build_inner;
use bolt_session::transport::InMemoryDataChannel;
use bolt_session::{EngineConfig, Session};

use crate::support::RecordingCallbacks;

#[tokio::test]
async fn wrong_advertised_hash_is_rejected_as_integrity_failure() {
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

    let hello_inner = build_inner(
        &sender_identity.public_key,
        vec!["bolt.file-hash".to_string(), "bolt.profile-envelope-v1".to_string()],
    );
    let hello_json = serde_json::to_string(&hello_inner).unwrap();
    let receiver_eph_pub = receiver.local_ephemeral_public();
    let sealed_hello = seal_box_payload(hello_json.as_bytes(), &receiver_eph_pub, &sender_eph.secret_key).unwrap();
    receiver
        .handle_inbound(&serde_json::json!({"type": "hello", "payload": sealed_hello}).to_string())
        .await;
    assert!(receiver.state().is_post_hello());

    let blob = b"the actual file contents";
    let wrong_hash = "a".repeat(64);
    let ciphertext = seal_box_payload(blob, &receiver_eph_pub, &sender_eph.secret_key).unwrap();
    let inner = serde_json::json!({
        "type": "file-chunk",
        "filename": "report.pdf",
        "chunk": ciphertext,
        "chunkIndex": 0,
        "totalChunks": 1,
        "fileSize": blob.len(),
        "transferId": "1".repeat(32),
        "fileHash": wrong_hash,
    });
    let envelope = wrap(&inner.to_string(), &receiver_eph_pub, &sender_eph.secret_key).unwrap();
    receiver.handle_inbound(&serde_json::to_string(&envelope).unwrap()).await;

    assert!(receiver.state().is_closed(), "integrity failure must disconnect the session");
    assert!(callbacks.received_files.lock().unwrap().is_empty(), "corrupt blob must never reach the embedder");
    assert!(callbacks.last_error_contains("INTEGRITY_FAILED") || callbacks.last_error_contains("file hash"));
}
