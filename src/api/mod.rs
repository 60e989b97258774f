//! Typed wrappers over the CSM backend endpoints
//!
//! Each submodule covers one backend surface. All calls go through the
//! authenticated pipeline in `crate::http`; functions return the decoded
//! payload or the pipeline's classified error.

pub mod auth;
pub mod customer;
pub mod provision;
pub mod ticket;

pub use provision::ProvisioningApi;
