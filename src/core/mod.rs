//! Core foundation layer.
//!
//! This is the bottom layer of the stack with no internal dependencies.
//!
//! # Contents
//!
//! - [`types`]: Core data types (scans)

pub mod types;
