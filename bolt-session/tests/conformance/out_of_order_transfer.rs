//! Scenario 4: three guarded chunks for one `transferId` arrive out of
//! order. The assembled blob must match in-order concatenation, and the
//! active-transfer entry must be cleared once it completes.

use bolt_core::crypto::{generate_ephemeral_keypair, seal_box_payload};
use bolt_core::hash::sha256_hex;
use bolt_core::identity::generate_identity_keypair;
use bolt_core::pin::InMemoryPinStore;
use bolt_session::envelope::wrap;
use bolt_session::hello::build_inner;
use bolt_session::transport::InMemoryDataChannel;
use bolt_session::{EngineConfig, Session};

use crate::support::RecordingCallbacks;

#[tokio::test]
async fn chunks_arriving_out_of_order_reassemble_in_order() {
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

    let chunks: [&[u8]; 3] = [b"AAA", b"BBB", b"CCC"];
    let full_blob: Vec<u8> = chunks.concat();
    let file_hash = sha256_hex(&full_blob);
    let transfer_id = "0".repeat(32);

    for &chunk_index in &[2u32, 0, 1] {
        let plaintext = chunks[chunk_index as usize];
        let ciphertext = seal_box_payload(plaintext, &receiver_eph_pub, &sender_eph.secret_key).unwrap();
        let inner = serde_json::json!({
            "type": "file-chunk",
            "filename": "assembled.bin",
            "chunk": ciphertext,
            "chunkIndex": chunk_index,
            "totalChunks": 3,
            "fileSize": full_blob.len(),
            "transferId": transfer_id,
            "fileHash": if chunk_index == 0 { Some(file_hash.clone()) } else { None },
        });

        let envelope = wrap(&inner.to_string(), &receiver_eph_pub, &sender_eph.secret_key).unwrap();
        receiver.handle_inbound(&serde_json::to_string(&envelope).unwrap()).await;
    }

    assert!(receiver.state().is_post_hello(), "a completed transfer must not close the session");
    let received = callbacks.received_files.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, "assembled.bin");
    assert_eq!(received[0].1, full_blob);
}
