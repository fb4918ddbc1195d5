//! Client library and command-line front end for the AccessiScan website
//! accessibility scanning service.
//!
//! The scanning itself (Lighthouse audits, DOM checks, scheduling, report
//! email) happens in the backend; this crate validates scan requests and
//! talks to the backend's REST API.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod health;
pub mod notify;
pub mod progress;
pub mod utils;

pub use errors::AccessiscanError;
