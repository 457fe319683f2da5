//! Research Trends Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod config;
pub mod dataset;
pub mod error;
/// Business logic behind each query endpoint
pub mod services;
/// Application state management
///
/// Holds configuration and the dataset store shared by every handler.
pub mod state;
