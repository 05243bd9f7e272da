//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns. Currently only request
//! correlation via trace identifiers.

pub mod trace;

pub use trace::Trace;
