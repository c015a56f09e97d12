//! Dense complex state vectors.

use core::ops::{Div, DivAssign, Mul, MulAssign, Neg};
use tracing::{debug, trace, warn};

use crate::error::{MathError, Operation, Result};
use crate::{Complex64, Matrix, ONE, ZERO};

/// A ket `|ψ⟩`: an ordered list of complex amplitudes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ket {
    data: Vec<Complex64>,
}

impl Ket {
    /// Creates a ket of length `n` with every amplitude zero.
    pub fn zeros(n: usize) -> Self {
        Ket {
            data: vec![ZERO; n],
        }
    }

    /// Creates a ket from an explicit list of amplitudes.
    pub fn from_vec(data: Vec<Complex64>) -> Self {
        Ket { data }
    }

    /// Creates the computational basis state `|index⟩` of length `n`.
    pub fn basis(n: usize, index: usize) -> Result<Self> {
        let mut ket = Self::zeros(n);
        ket.set(index, ONE)?;
        Ok(ket)
    }

    /// Reallocates to length `n`, zero-filled. Any previous content is lost.
    pub fn set_size(&mut self, n: usize) {
        self.data.clear();
        self.data.resize(n, ZERO);
    }

    /// Number of amplitudes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the ket has no amplitudes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads the amplitude at `index`.
    pub fn get(&self, index: usize) -> Result<Complex64> {
        self.data
            .get(index)
            .copied()
            .ok_or(MathError::KetIndexOutOfBounds {
                index,
                size: self.size(),
            })
    }

    /// Writes the amplitude at `index`.
    pub fn set(&mut self, index: usize, value: Complex64) -> Result<()> {
        let size = self.size();
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MathError::KetIndexOutOfBounds { index, size }),
        }
    }

    /// Borrows the amplitudes.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Copies the amplitudes into a new vector.
    pub fn to_vec(&self) -> Vec<Complex64> {
        self.data.clone()
    }

    fn zip_with(
        &self,
        other: &Ket,
        operation: Operation,
        f: impl Fn(Complex64, Complex64) -> Complex64,
    ) -> Result<Ket> {
        if self.size() != other.size() {
            debug!(
                left = self.size(),
                right = other.size(),
                %operation,
                "rejecting elementwise ket operation on unequal lengths"
            );
            return Err(MathError::DimensionMismatch {
                operation,
                expected: self.size(),
                actual: other.size(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect())
    }

    /// Elementwise sum.
    ///
    /// # Errors
    /// [`MathError::DimensionMismatch`] when the lengths differ.
    pub fn add(&self, other: &Ket) -> Result<Ket> {
        self.zip_with(other, Operation::KetAdd, |a, b| a + b)
    }

    /// Elementwise difference `self - other`.
    ///
    /// # Errors
    /// [`MathError::DimensionMismatch`] when the lengths differ.
    pub fn subtract(&self, other: &Ket) -> Result<Ket> {
        self.zip_with(other, Operation::KetSubtract, |a, b| a - b)
    }

    /// In-place [`Ket::add`]. On error `self` is left untouched.
    pub fn add_assign(&mut self, other: &Ket) -> Result<()> {
        *self = Ket::add(self, other)?;
        Ok(())
    }

    /// In-place [`Ket::subtract`]. On error `self` is left untouched.
    pub fn subtract_assign(&mut self, other: &Ket) -> Result<()> {
        *self = self.subtract(other)?;
        Ok(())
    }

    /// Tensor product `|self⟩ ⊗ |other⟩`, the joint state of two independent
    /// subsystems: `out[i·m + j] = self[i] · other[j]` where `m = other.size()`.
    pub fn tensor(&self, other: &Ket) -> Ket {
        trace!(left = self.size(), right = other.size(), "ket tensor product");
        self.data
            .iter()
            .flat_map(|&a| other.data.iter().map(move |&b| a * b))
            .collect()
    }

    /// Multiplies every amplitude by `scalar`.
    pub fn scale(&self, scalar: Complex64) -> Ket {
        self.data.iter().map(|&a| a * scalar).collect()
    }

    /// Divides every amplitude by `scalar`.
    ///
    /// Division by zero is not guarded and produces non-finite amplitudes.
    pub fn divide(&self, scalar: Complex64) -> Ket {
        if scalar == ZERO {
            warn!(size = self.size(), "dividing ket by zero; amplitudes will be non-finite");
        }
        self.data.iter().map(|&a| a / scalar).collect()
    }

    /// Applies `gate` to this state: `out[r] = Σ_c gate[r][c] · self[c]`.
    ///
    /// # Errors
    /// [`MathError::ShapeMismatch`] unless `gate.cols() == self.size()`.
    pub fn apply_gate(&self, gate: &Matrix) -> Result<Ket> {
        if gate.cols() != self.size() {
            debug!(
                gate = ?gate.shape(),
                ket = self.size(),
                "rejecting gate application with mismatched shape"
            );
            return Err(MathError::ShapeMismatch {
                matrix_cols: gate.cols(),
                ket_size: self.size(),
            });
        }
        Ok(gate
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(&self.data)
                    .map(|(&m, &k)| m * k)
                    .sum::<Complex64>()
            })
            .collect())
    }

    /// In-place [`Ket::apply_gate`]. On error `self` is left untouched.
    pub fn apply_gate_assign(&mut self, gate: &Matrix) -> Result<()> {
        *self = self.apply_gate(gate)?;
        Ok(())
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// Elementwise comparison within `eps`, requiring equal lengths.
    pub fn approx_eq(&self, other: &Ket, eps: f64) -> bool {
        self.size() == other.size()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= eps)
    }

    /// Writes the ket to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

/// Applies `gate` to `ket`; the matrix-first spelling of [`Ket::apply_gate`].
pub fn apply_gate(gate: &Matrix, ket: &Ket) -> Result<Ket> {
    ket.apply_gate(gate)
}

impl From<Vec<Complex64>> for Ket {
    fn from(data: Vec<Complex64>) -> Self {
        Ket { data }
    }
}

impl FromIterator<Complex64> for Ket {
    fn from_iter<T: IntoIterator<Item = Complex64>>(iter: T) -> Self {
        Ket {
            data: iter.into_iter().collect(),
        }
    }
}

impl Neg for Ket {
    type Output = Ket;
    fn neg(self) -> Ket {
        self.data.into_iter().map(|a| -a).collect()
    }
}
impl Mul<&Ket> for &Ket {
    type Output = Ket;
    fn mul(self, rhs: &Ket) -> Ket {
        self.tensor(rhs)
    }
}
impl MulAssign<&Ket> for Ket {
    fn mul_assign(&mut self, rhs: &Ket) {
        *self = self.tensor(rhs);
    }
}
impl Mul<Complex64> for Ket {
    type Output = Ket;
    fn mul(self, rhs: Complex64) -> Ket {
        self.scale(rhs)
    }
}
impl Mul<Ket> for Complex64 {
    type Output = Ket;
    fn mul(self, rhs: Ket) -> Ket {
        rhs.scale(self)
    }
}
impl MulAssign<Complex64> for Ket {
    fn mul_assign(&mut self, rhs: Complex64) {
        *self = self.scale(rhs);
    }
}
impl Div<Complex64> for Ket {
    type Output = Ket;
    fn div(self, rhs: Complex64) -> Ket {
        self.divide(rhs)
    }
}
impl DivAssign<Complex64> for Ket {
    fn div_assign(&mut self, rhs: Complex64) {
        *self = self.divide(rhs);
    }
}
impl Mul<&Ket> for &Matrix {
    type Output = Result<Ket>;
    fn mul(self, rhs: &Ket) -> Self::Output {
        rhs.apply_gate(self)
    }
}
