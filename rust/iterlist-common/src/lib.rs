//! Core definitions shared by all iterlist-* crates: the error type, the
//! `Result` alias and the argument verification macros.

pub mod error;
pub mod result;

pub use result::Result;
