//! # IO Module
//!
//! Interface layer between HTTP clients and the domain logic.
//!
//! Translates REST requests into domain operations and formats domain results
//! as JSON. Everything protocol-specific (routing, extractors, status codes)
//! lives here; the domain layer never sees axum types.

pub mod rest;
