//! Levenberg-Marquardt algorithm implementation.
//!
//! This module provides a box-constrained implementation of the
//! Levenberg-Marquardt algorithm for nonlinear least-squares optimization.
//! A single minimization is synchronous and deterministic: identical inputs,
//! guess and tolerances always produce identical iterates.

// Include module declarations and re-exports
pub mod algorithm;
pub mod config;
pub mod convergence;
pub mod step;
pub mod trust_region;

// Re-export key types
pub use algorithm::{LevenbergMarquardt, LmResult};
pub use config::{DiffMethod, LmConfig};
pub use convergence::{ConvergenceCriteria, ConvergenceStatus};
pub use step::{LmStep, StepResult};
pub use trust_region::TrustRegion;
