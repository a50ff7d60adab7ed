//! Built-in isotherm functions.
//!
//! Pure mathematical mappings from pressure and parameters to adsorbed
//! quantity, with their analytic partial derivatives. The parameterized
//! model types that the fitter works with live in [`crate::model`].

mod langmuir;

pub use langmuir::{
    coverage, dual_site, dual_site_gradient, single_site, single_site_gradient,
};
