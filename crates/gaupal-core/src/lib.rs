//! Core types and utilities shared by the Gaupal model services.
//!
//! This crate provides the error type, the canonical class-name catalogs,
//! logging setup, and the HTTP error plumbing used by every service.

pub mod catalog;
pub mod error;
pub mod http;
pub mod logging;

pub use error::{Error, Result};
