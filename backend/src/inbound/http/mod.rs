//! HTTP inbound adapter exposing the bug tracker endpoints.

pub mod accounts;
pub mod bugs;
pub mod error;
pub mod health;
pub(crate) mod multipart;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trends;
pub mod users;
pub mod validation;

pub use error::ApiResult;
