#![forbid(unsafe_code)]

//! # Glide Runner Library
//!
//! Headless runs of the glide engines, shared by the `glide` binary and its
//! integration tests.
//!
//! ## Public Modules
//!
//! - [`cli`] - Command-line contract
//! - [`config`] - File and flag layering
//! - [`scenario`] - Scripted runs and their JSON records

pub mod cli;
pub mod config;
pub mod scenario;
