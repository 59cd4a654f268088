//! Inbound (driving) ports consumed by inbound adapters.
//!
//! Inbound ports expose application capabilities to external drivers such
//! as the command-line interface and the JSON-lines `serve` loop.
//!
//! # Modules
//!
//! - [`action`]: Action API request, envelope, and dispatch interface

pub mod action;
