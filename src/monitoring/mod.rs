#![forbid(unsafe_code)]

//! Observability.

pub mod metrics;
