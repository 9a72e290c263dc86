//! Index-agnostic ANN interface.
//!
//! [`ANNIndex`] is the add / build / search contract shared by every index in
//! the crate, so callers (benchmarks, evaluation harnesses) can hold a
//! `Box<dyn ANNIndex>` without caring how the index is organized.

pub mod traits;

pub use traits::{ANNIndex, ANNStats};
