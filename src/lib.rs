//! Simon Says (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `simon_says::{core,adapter,term,input,types}` and owns
//! the terminal binary.

pub use simon_adapter as adapter;
pub use simon_core as core;
pub use simon_input as input;
pub use simon_term as term;
pub use simon_types as types;
