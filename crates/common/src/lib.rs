//! Shared building blocks for the workspace: logging setup and small
//! HTTP-facing types that are not tied to the person domain.

pub mod types;
pub mod utils;
