// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tether-core - runtime-free building blocks for tether services.
//!
//! # Main Components
//!
//! - [`ServiceConfig`] - typed service configuration loaded from TOML
//! - [`FuncRegistry`] - explicit named-function registry with
//!   duplicate-key detection
//! - [`Error`] - error types for all operations

pub mod config;
pub mod error;
pub mod registry;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use registry::FuncRegistry;
