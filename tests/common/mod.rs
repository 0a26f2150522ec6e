//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Custom assertions
//! - Section and rule fixtures
//! - A scripted random source
//! - A mock backend server

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod server;

pub use assertions::*;
pub use fixtures::*;
pub use server::*;
