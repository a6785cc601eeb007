#![forbid(unsafe_code)]

//! Chain core: pure data, validation and fork resolution.

pub mod block;
pub mod chain;
pub mod config;
pub mod reconcile;
pub mod validator;
