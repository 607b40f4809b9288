//! HTTP client tests against a mock API server.
//!
//! Run with: `cargo test -p sharelink-api-client --test client_test`

use bytes::Bytes;
use mockito::{Matcher, Server};
use sharelink_api_client::{available_path, SavedFile, ShareClient};
use sharelink_core::{
    ClientConfig, DownloadOrchestrator, DownloadOutcome, ExpiryHours, LinkStatus, LoadOutcome,
    MaxDownloads, SelectedFile, ShareApi, ShareError, UploadInitRequest, UploadOrchestrator,
};
use tokio_util::sync::CancellationToken;

fn client_for(server: &Server) -> ShareClient {
    ShareClient::new(ClientConfig::new(server.url()).unwrap()).unwrap()
}

#[tokio::test]
async fn test_request_upload_posts_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "filename": "a.txt",
            "max_downloads": 2,
            "expires_in_hours": 1
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file_id":"abc","upload_url":"https://x/put","s3_key":"uploads/abc/a.txt","download_page_url":"https://site/file/abc"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = UploadInitRequest::new("a.txt", MaxDownloads::new(2).unwrap(), ExpiryHours::One);
    let response = client.request_upload(&request).await.unwrap();

    assert_eq!(response.upload_url, "https://x/put");
    assert_eq!(response.download_page_url, "https://site/file/abc");
    assert_eq!(response.file_id.as_deref(), Some("abc"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(422)
        .with_body("max_downloads out of range")
        .create_async()
        .await;

    let client = client_for(&server);
    let request = UploadInitRequest::new("a.txt", MaxDownloads::default(), ExpiryHours::default());
    let err = client.request_upload(&request).await.unwrap_err();

    match err {
        ShareError::Api { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "max_downloads out of range");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_file_info_sends_file_id_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/file-info")
        .match_query(Matcher::UrlEncoded("file_id".into(), "abc".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","filename":"a.txt","message":"File is available for download.","remaining_downloads":3,"expires_at_iso":"2030-01-01T00:00:00+00:00Z","now_iso":"2029-12-31T00:00:00Z"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let info = client.get_file_info("abc").await.unwrap();

    assert_eq!(info.status, LinkStatus::Ok);
    assert_eq!(info.filename.as_deref(), Some("a.txt"));
    assert_eq!(info.remaining(), Some(3));
    assert!(info.expires_at().is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/download")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.request_download("abc").await.unwrap_err();

    assert!(matches!(err, ShareError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_put_bytes_sends_content_type_and_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/bucket/uploads/abc/a.txt")
        .match_query(Matcher::Any)
        .match_header("content-type", "text/plain")
        .match_body("hello")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/bucket/uploads/abc/a.txt?X-Amz-Signature=sig", server.url());
    client
        .put_bytes(&url, "text/plain", Bytes::from_static(b"hello"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_put_bytes_failure_is_error() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/bucket/key")
        .with_status(403)
        .with_body("<Error><Code>AccessDenied</Code></Error>")
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/bucket/key", server.url());
    let err = client
        .put_bytes(&url, "text/plain", Bytes::from_static(b"hello"))
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(403));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on the discard port.
    let client = ShareClient::new(ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap();

    let err = client.file_info("abc").await.unwrap_err();

    assert!(matches!(err, ShareError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_to_path_writes_file() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/get/a.txt")
        .with_status(200)
        .with_body("file contents")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a.txt");
    let client = client_for(&server);

    let saved = client
        .fetch_to_path(
            &format!("{}/get/a.txt", server.url()),
            &dest,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(saved, SavedFile { path: dest.clone(), bytes: 13 });
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "file contents");
}

#[tokio::test]
async fn test_fetch_to_path_keeps_existing_file() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/get/report.pdf")
        .with_status(200)
        .with_body("new report")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.pdf");
    std::fs::write(&dest, "old report").unwrap();
    let client = client_for(&server);

    let saved = client
        .fetch_to_path(
            &format!("{}/get/report.pdf", server.url()),
            &dest,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(saved.path, dir.path().join("report (1).pdf"));
    assert_eq!(std::fs::read_to_string(&saved.path).unwrap(), "new report");
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old report");
}

#[tokio::test]
async fn test_fetch_to_path_cancelled_leaves_existing_file() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/report.pdf")
        .with_status(200)
        .with_body("new report")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.pdf");
    std::fs::write(&dest, "old report").unwrap();
    let client = client_for(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .fetch_to_path(&format!("{}/get/report.pdf", server.url()), &dest, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ShareError::Cancelled));
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old report");
    assert!(!dir.path().join("report (1).pdf").exists());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_to_path_failure_leaves_no_file() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/get/gone")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("gone");
    let client = client_for(&server);

    let err = client
        .fetch_to_path(
            &format!("{}/get/gone", server.url()),
            &dest,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(404));
    assert!(!dest.exists());
}

#[test]
fn test_available_path_numbers_collisions() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("notes.txt");
    assert_eq!(available_path(&dest), dest);

    std::fs::write(&dest, "a").unwrap();
    std::fs::write(dir.path().join("notes (1).txt"), "b").unwrap();
    assert_eq!(available_path(&dest), dir.path().join("notes (2).txt"));

    let bare = dir.path().join("README");
    std::fs::write(&bare, "c").unwrap();
    assert_eq!(available_path(&bare), dir.path().join("README (1)"));
}

#[tokio::test]
async fn test_health() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    assert!(client_for(&server).health().await.is_ok());
}

#[tokio::test]
async fn test_upload_flow_end_to_end() {
    let mut server = Server::new_async().await;
    let put_url = format!("{}/bucket/uploads/abc/notes.txt", server.url());
    server
        .mock("POST", "/upload")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "upload_url": put_url,
                "download_page_url": "https://site/file/abc"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/uploads/abc/notes.txt")
        .match_body("hello world")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut flow = UploadOrchestrator::new();
    flow.select_file(SelectedFile::new(
        "notes.txt",
        "text/plain",
        Bytes::from_static(b"hello world"),
    ));
    flow.submit(&client).await;

    assert_eq!(flow.phase().share_url(), Some("https://site/file/abc"));
    put.assert_async().await;
}

#[tokio::test]
async fn test_download_flow_end_to_end() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/file-info")
        .match_query(Matcher::UrlEncoded("file_id".into(), "abc".into()))
        .with_status(200)
        .with_body(r#"{"status":"ok","filename":"a.txt","remaining_downloads":3}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/download")
        .match_query(Matcher::UrlEncoded("file_id".into(), "abc".into()))
        .with_status(200)
        .with_body(r#"{"status":"ok","download_url":"https://x/get","remaining_downloads":2}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut page = DownloadOrchestrator::new(Some("abc"));

    assert_eq!(
        page.load(&client, &CancellationToken::new()).await,
        LoadOutcome::Applied
    );
    assert_eq!(
        page.download(&client).await,
        DownloadOutcome::Navigate("https://x/get".to_string())
    );
    assert_eq!(page.state().remaining_downloads, Some(2));
}
