//! # Parameter Bounds
//!
//! Box constraints for optimization parameters. Langmuir capacities and
//! affinity constants are physical quantities that cannot be negative, so
//! every isotherm fit runs inside [`BoxBounds::non_negative`].
//!
//! ```rust
//! use langmuir_fit::parameters::BoxBounds;
//! use ndarray::array;
//!
//! let bounds = BoxBounds::non_negative(2);
//! assert!(bounds.validate(&array![1.0, 0.0]).is_ok());
//! assert_eq!(bounds.project(&array![-0.2, 3.0]), array![0.0, 3.0]);
//! ```

pub mod bounds;

// Re-export key types
pub use bounds::{Bounds, BoundsError, BoxBounds};
