//! Core domain types and utilities for vetdesk.
//!
//! This crate provides the foundational types and error handling shared by
//! the access-control core and the web front end of the clinic manager.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::UserId;
