use std::time::Duration;

use keepsake_core::{RetrievalError, UnlockError};
use keepsake_crypto::{seal, KdfParams};
use keepsake_unlock::{BlobFetcher, Unlocker};
use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Fast params for testing; seal and open just have to agree.
fn fast_params() -> KdfParams {
    KdfParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

fn unlocker() -> Unlocker {
    let fetcher = BlobFetcher::new(Duration::from_secs(5)).unwrap();
    Unlocker::new(fetcher, fast_params())
}

async fn serve_blob(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn unlock_roundtrip() {
    let server = MockServer::start().await;
    let blob = seal(b"hello world", &SecretString::from("correct-horse"), &fast_params()).unwrap();
    serve_blob(&server, "/gift.jpg.enc", blob).await;

    let unlocked = unlocker()
        .unlock(
            &format!("{}/gift.jpg.enc", server.uri()),
            "gift.jpg.enc",
            &SecretString::from("correct-horse"),
        )
        .await
        .unwrap();

    assert_eq!(unlocked.bytes, b"hello world");
    assert_eq!(unlocked.filename, "gift.jpg");
}

#[tokio::test]
async fn wrong_passphrase_is_authentication_failure() {
    let server = MockServer::start().await;
    let blob = seal(b"hello world", &SecretString::from("correct-horse"), &fast_params()).unwrap();
    serve_blob(&server, "/gift.jpg.enc", blob).await;

    let result = unlocker()
        .unlock(
            &format!("{}/gift.jpg.enc", server.uri()),
            "gift.jpg.enc",
            &SecretString::from("wrong-horse"),
        )
        .await;

    assert!(matches!(result, Err(UnlockError::Authentication)));
}

#[tokio::test]
async fn missing_file_is_retrieval_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.enc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = unlocker()
        .unlock(
            &format!("{}/gone.enc", server.uri()),
            "gone.enc",
            &SecretString::from("pw"),
        )
        .await;

    assert!(matches!(
        result,
        Err(UnlockError::Retrieval(RetrievalError::Status { status: 404, .. }))
    ));
}

#[tokio::test]
async fn short_body_is_too_small() {
    let server = MockServer::start().await;
    serve_blob(&server, "/tiny.enc", vec![0u8; 10]).await;

    let result = unlocker()
        .unlock(
            &format!("{}/tiny.enc", server.uri()),
            "tiny.enc",
            &SecretString::from("pw"),
        )
        .await;

    assert!(matches!(
        result,
        Err(UnlockError::Retrieval(RetrievalError::TooSmall { len: 10, .. }))
    ));
}

#[tokio::test]
async fn wrong_magic_is_bad_format() {
    let server = MockServer::start().await;
    let mut blob = seal(b"hello world", &SecretString::from("pw"), &fast_params()).unwrap();
    blob[..8].copy_from_slice(b"NOTKEEPS");
    serve_blob(&server, "/legacy.wenc", blob).await;

    let result = unlocker()
        .unlock(
            &format!("{}/legacy.wenc", server.uri()),
            "legacy.wenc",
            &SecretString::from("pw"),
        )
        .await;

    assert!(matches!(
        result,
        Err(UnlockError::Retrieval(RetrievalError::BadMagic))
    ));
}

#[tokio::test]
async fn tampered_ciphertext_is_authentication_failure() {
    let server = MockServer::start().await;
    let mut blob = seal(b"hello world", &SecretString::from("pw"), &fast_params()).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0xFF;
    serve_blob(&server, "/tampered.enc", blob).await;

    let result = unlocker()
        .unlock(
            &format!("{}/tampered.enc", server.uri()),
            "tampered.enc",
            &SecretString::from("pw"),
        )
        .await;

    assert!(matches!(result, Err(UnlockError::Authentication)));
}

#[tokio::test]
async fn empty_passphrase_rejected_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = unlocker()
        .unlock(
            &format!("{}/gift.enc", server.uri()),
            "gift.enc",
            &SecretString::from(""),
        )
        .await;

    assert!(matches!(result, Err(UnlockError::EmptyPassphrase)));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    // Nothing listens on this port.
    let result = unlocker()
        .unlock(
            "http://127.0.0.1:9/unreachable.enc",
            "unreachable.enc",
            &SecretString::from("pw"),
        )
        .await;

    assert!(matches!(
        result,
        Err(UnlockError::Retrieval(RetrievalError::Network { .. }))
    ));
}
