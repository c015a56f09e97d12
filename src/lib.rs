//! The `qsim-math` library provides dense complex matrices (quantum gates) and
//! kets (state vectors) as building blocks for quantum-state simulation.
//! Gates can be composed, lifted to their controlled form, combined with the
//! Kronecker product and applied to kets. Scalars are `num_complex::Complex64`.
//!
//! ```
//! use qsim_math::{Ket, Matrix, ONE, ZERO};
//!
//! let x = Matrix::from_rows(vec![vec![ZERO, ONE], vec![ONE, ZERO]])?;
//! let cnot = x.controlled();
//! let ket = Ket::from_vec(vec![ZERO, ONE]).tensor(&Ket::from_vec(vec![ONE, ZERO]));
//! let flipped = ket.apply_gate(&cnot)?;
//! assert_eq!(flipped, Ket::basis(4, 3)?);
//! # Ok::<(), qsim_math::MathError>(())
//! ```
//!
//! Shape violations never panic; every fallible operation returns a
//! [`MathError`].

pub mod display;
pub mod error;
pub mod ket;
pub mod matrix;

pub use display::{FormatOptions, format_complex, format_real};
pub use error::{MathError, Operation, Result};
pub use ket::{Ket, apply_gate};
pub use matrix::{Matrix, ProductConvention, tensor_product};
pub use num_complex::Complex64;

/// The imaginary unit.
pub const I: Complex64 = Complex64::new(0.0, 1.0);
/// π.
pub const PI: f64 = core::f64::consts::PI;
/// Complex zero.
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
/// Complex one.
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
/// Default tolerance for approximate comparisons and formatting decisions.
pub const EPSILON: f64 = 1e-9;
