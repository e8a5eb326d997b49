//! javscraper - video metadata aggregation
//!
//! This library crate exposes the provider aggregation core used by the CLI
//! and by integration tests.

pub mod config;
pub mod images;
pub mod metadata;
