//! Reference image uploads against a mock path-style S3 endpoint.

use genai_studio_lib::error::AppError;
use genai_studio_lib::services::storage::UPLOAD_FALLBACK;
use tempfile::TempDir;

use super::mock_vendor::MockVendor;
use super::test_helpers::{PNG_BYTES, TEST_BUCKET, logged_in_studio, write_image};

#[actix_rt::test]
async fn test_upload_returns_public_url_for_key() {
    let mock = MockVendor::start().await;

    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "cat.png", PNG_BYTES);

    let studio = logged_in_studio(&mock, &dir);
    let asset = studio.upload(&path).await.expect("upload should succeed");

    assert!(asset.key.ends_with("-cat.png"));
    let millis = asset.key.trim_end_matches("-cat.png");
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(
        asset.url,
        format!("https://{}.s3.amazonaws.com/{}", TEST_BUCKET, asset.key)
    );

    let puts = mock.requests_to(&format!("/{}/", TEST_BUCKET));
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].method, "PUT");
    assert_eq!(puts[0].path, format!("/{}/{}", TEST_BUCKET, asset.key));
    assert_eq!(puts[0].header("content-type"), Some("image/png"));
}

#[actix_rt::test]
async fn test_upload_rejection_reports_fallback() {
    let mock = MockVendor::start().await;
    mock.script_s3_status(403);

    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "cat.png", PNG_BYTES);

    let studio = logged_in_studio(&mock, &dir);
    let err = studio.upload(&path).await.unwrap_err();

    assert!(matches!(err, AppError::Upload(_)));
    assert_eq!(err.to_string(), UPLOAD_FALLBACK);
    // Retries are disabled
    assert_eq!(mock.requests_to(&format!("/{}/", TEST_BUCKET)).len(), 1);
}

#[actix_rt::test]
async fn test_upload_requires_login() {
    let mock = MockVendor::start().await;

    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "cat.png", PNG_BYTES);

    let mut studio = logged_in_studio(&mock, &dir);
    studio.logout().unwrap();

    let err = studio.upload(&path).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
    assert!(mock.requests_to(&format!("/{}/", TEST_BUCKET)).is_empty());
}
