//! Vendor E2E test suite.
//!
//! Drives the studio against in-process mock vendor servers: video task
//! submission and polling, image generation, face swap and S3 uploads.
//!
//! Run with: cargo test --test vendor_e2e

mod mock_vendor;

mod test_faceswap;
mod test_image;
mod test_upload;
