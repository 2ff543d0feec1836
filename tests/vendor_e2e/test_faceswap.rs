//! Face swap against the mock vendor.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use genai_studio_lib::error::AppError;
use genai_studio_lib::services::faceswap::FACESWAP_FALLBACK;
use serde_json::json;
use tempfile::TempDir;

use super::mock_vendor::{MockVendor, Scripted};
use super::test_helpers::{
    PNG_BYTES, TEST_FACESWAP_HOST, TEST_FACESWAP_KEY, logged_in_studio, write_image,
};

#[actix_rt::test]
async fn test_faceswap_sends_raw_base64_and_returns_result_url() {
    let mock = MockVendor::start().await;
    mock.script_faceswap(Scripted::ok(json!({
        "ResultImageUrl": "https://swap/result.jpg"
    })));

    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "source.png", PNG_BYTES);
    let target = write_image(&dir, "target.jpg", b"jpeg-bytes");

    let studio = logged_in_studio(&mock, &dir);
    let result = studio.swap_faces(&source, &target).await.unwrap();
    assert_eq!(result.result_url, "https://swap/result.jpg");

    let sent = mock.requests_to("/faceswapbase64");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].header("x-rapidapi-key"), Some(TEST_FACESWAP_KEY));
    assert_eq!(sent[0].header("x-rapidapi-host"), Some(TEST_FACESWAP_HOST));

    let body = sent[0].json();
    assert_eq!(body["SourceImageBase64Data"], STANDARD.encode(PNG_BYTES));
    assert_eq!(body["TargetImageBase64Data"], STANDARD.encode(b"jpeg-bytes"));
}

#[actix_rt::test]
async fn test_faceswap_flattens_error_map() {
    let mock = MockVendor::start().await;
    mock.script_faceswap(Scripted::status(
        400,
        json!({ "Errors": { "field1": ["a", "b"], "field2": ["c"] } }),
    ));

    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "source.png", PNG_BYTES);
    let target = write_image(&dir, "target.png", PNG_BYTES);

    let studio = logged_in_studio(&mock, &dir);
    let err = studio.swap_faces(&source, &target).await.unwrap_err();

    assert!(matches!(err, AppError::Transport { status: Some(400), .. }));
    assert_eq!(err.to_string(), "a b c");
}

#[actix_rt::test]
async fn test_faceswap_success_without_result_url_is_an_error() {
    let mock = MockVendor::start().await;
    mock.script_faceswap(Scripted::ok(json!({ "ResultImageUrl": null })));

    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "source.png", PNG_BYTES);
    let target = write_image(&dir, "target.png", PNG_BYTES);

    let studio = logged_in_studio(&mock, &dir);
    let err = studio.swap_faces(&source, &target).await.unwrap_err();
    assert_eq!(err.to_string(), FACESWAP_FALLBACK);
}

#[actix_rt::test]
async fn test_faceswap_rejects_empty_input_without_calling_vendor() {
    let mock = MockVendor::start().await;

    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "source.png", b"");
    let target = write_image(&dir, "target.png", PNG_BYTES);

    let studio = logged_in_studio(&mock, &dir);
    let err = studio.swap_faces(&source, &target).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(mock.requests_to("/faceswapbase64").is_empty());
}
