//! Image generation against the mock vendor.

use genai_studio_lib::error::AppError;
use genai_studio_lib::models::{AspectRatio, ImageGenerationRequest, InlineImage};
use genai_studio_lib::services::image::REQUEST_FALLBACK;
use serde_json::json;
use tempfile::TempDir;

use super::mock_vendor::{MockVendor, Scripted};
use super::test_helpers::{PNG_BYTES, TEST_IMAGE_TOKEN, logged_in_studio, write_image};

async fn request(dir: &TempDir, n: u8) -> ImageGenerationRequest {
    let path = write_image(dir, "face.png", PNG_BYTES);
    let reference = InlineImage::read(&path).await.unwrap();
    ImageGenerationRequest {
        prompt: "portrait in the style of a woodcut".to_string(),
        reference_image: reference.data_url(),
        aspect_ratio: AspectRatio::Portrait,
        n,
        prompt_optimizer: true,
    }
}

#[actix_rt::test]
async fn test_image_generation_returns_urls_in_vendor_order() {
    let mock = MockVendor::start().await;
    mock.script_image(Scripted::ok(json!({
        "id": "gen-42",
        "data": { "image_urls": ["https://img/c.jpeg", "https://img/a.jpeg", "https://img/b.jpeg"] },
        "metadata": { "failed_count": "0", "success_count": "3" },
        "base_resp": { "status_code": 0, "status_msg": "success" }
    })));

    let dir = TempDir::new().unwrap();
    let studio = logged_in_studio(&mock, &dir);
    let result = studio.generate_images(&request(&dir, 3).await).await.unwrap();

    assert_eq!(
        result.image_urls,
        vec!["https://img/c.jpeg", "https://img/a.jpeg", "https://img/b.jpeg"]
    );

    let sent = mock.requests_to("/v1/image_generation");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].header("authorization"),
        Some(format!("Bearer {}", TEST_IMAGE_TOKEN).as_str())
    );

    let body = sent[0].json();
    assert_eq!(body["model"], "image-01");
    assert_eq!(body["n"], 3);
    assert_eq!(body["aspect_ratio"], "3:4");
    assert_eq!(body["response_format"], "url");
    assert_eq!(body["prompt_optimizer"], true);
    assert_eq!(body["subject_reference"][0]["type"], "character");
    assert!(
        body["subject_reference"][0]["image_file"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
}

#[actix_rt::test]
async fn test_image_business_failure_on_http_200() {
    let mock = MockVendor::start().await;
    mock.script_image(Scripted::ok(json!({
        "base_resp": { "status_code": 1010, "status_msg": "insufficient balance" }
    })));

    let dir = TempDir::new().unwrap();
    let studio = logged_in_studio(&mock, &dir);
    let err = studio
        .generate_images(&request(&dir, 2).await)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::VendorBusiness { code: 1010, .. }));
    assert_eq!(err.to_string(), "insufficient balance");
}

#[actix_rt::test]
async fn test_image_http_error_uses_status_message() {
    let mock = MockVendor::start().await;
    mock.script_image(Scripted::status(
        401,
        json!({ "base_resp": { "status_code": 1004, "status_msg": "authorized error" } }),
    ));

    let dir = TempDir::new().unwrap();
    let studio = logged_in_studio(&mock, &dir);
    let err = studio
        .generate_images(&request(&dir, 2).await)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Transport { status: Some(401), .. }));
    assert_eq!(err.to_string(), "authorized error");
}

#[actix_rt::test]
async fn test_image_http_error_without_message_falls_back() {
    let mock = MockVendor::start().await;
    mock.script_image(Scripted::status(502, json!("bad gateway")));

    let dir = TempDir::new().unwrap();
    let studio = logged_in_studio(&mock, &dir);
    let err = studio
        .generate_images(&request(&dir, 2).await)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), REQUEST_FALLBACK);
}
