//! Core module - shared infrastructure for Itinera
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, MAX_ITERATIONS};
pub use error::{PlannerError, Result};
pub use types::*;
