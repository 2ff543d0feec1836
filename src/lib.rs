//! GenAI Studio library.
//!
//! This library provides the core of the studio: the credential gate,
//! clients for the video, image and face-swap vendors, reference image
//! uploads to object storage, and the video task polling loop.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
