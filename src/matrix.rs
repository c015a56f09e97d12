//! Dense complex matrices representing quantum gates.

use core::ops::Mul;
use tracing::{debug, trace};

use crate::error::{MathError, Operation, Result};
use crate::{Complex64, ONE, ZERO};

/// Index convention used by [`Matrix::multiply_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductConvention {
    /// The mathematical product: `out[i][j] = Σ_k a[i][k]·b[k][j]`.
    #[default]
    Standard,
    /// Compatibility mode reproducing the legacy `*=` operator, which indexes the
    /// left operand by the output column. The result keeps the left operand's
    /// shape, with `out[j][i] = Σ_k a[i][k]·b[k][j]` for `i < b.cols` and zeros
    /// elsewhere. It only exists when `a.rows == b.cols` and `b.cols <= a.cols`
    /// as well. For square operands it is the transpose of the standard product.
    Legacy,
}

/// A dense `rows × cols` complex matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl Matrix {
    /// Creates a `rows × cols` matrix with every entry zero.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![ZERO; dim_product(rows, cols)],
        }
    }

    /// Creates an `n × n` zero matrix.
    pub fn square(n: usize) -> Self {
        Self::zeros(n, n)
    }

    /// Creates the `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::square(n);
        for j in 0..n {
            m.data[j * n + j] = ONE;
        }
        m
    }

    /// Builds a matrix from an ordered list of rows.
    ///
    /// The column count is taken from the first row, and every other row must
    /// have the same length. An empty list gives a `0 × 0` matrix.
    ///
    /// # Errors
    /// [`MathError::RaggedRows`] names the first row whose length differs.
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(MathError::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Reallocates the matrix to `rows × cols`, zero-filled.
    ///
    /// Note the argument order: columns first. Any previous content is lost.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn set_size(&mut self, cols: usize, rows: usize) {
        let len = dim_product(rows, cols);
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(len, ZERO);
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(MathError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Reads the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Complex64> {
        self.offset(row, col).map(|i| self.data[i])
    }

    /// Writes the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) -> Result<()> {
        let i = self.offset(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    /// Borrows one row.
    pub fn row(&self, row: usize) -> Result<&[Complex64]> {
        if row < self.rows {
            Ok(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            Err(MathError::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Complex64]> + '_ {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// The row-major element storage.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Copies the contents out as a list of rows.
    pub fn to_rows(&self) -> Vec<Vec<Complex64>> {
        self.iter_rows().map(<[Complex64]>::to_vec).collect()
    }

    /// Returns the conjugate transpose, of shape `(cols, rows)`.
    pub fn adjoint(&self) -> Self {
        let mut res = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j].conj();
            }
        }
        res
    }

    /// Returns the controlled form of this gate, of shape `(2·rows, 2·cols)`.
    ///
    /// The top-left block carries ones on its diagonal (the identity for square
    /// gates), the bottom-right block is a copy of `self`, and everything else
    /// is zero.
    ///
    /// # Panics
    /// Panics if the doubled shape's element count overflows `usize`.
    pub fn controlled(&self) -> Self {
        let (rows, cols) = (dim_product(self.rows, 2), dim_product(self.cols, 2));
        let mut res = Self::zeros(rows, cols);
        for j in 0..self.rows {
            if j < self.cols {
                res.data[j * cols + j] = ONE;
            }
            for i in 0..self.cols {
                res.data[(self.rows + j) * cols + self.cols + i] = self.data[j * self.cols + i];
            }
        }
        res
    }

    /// Computes the matrix product `self · other`.
    ///
    /// # Errors
    /// [`MathError::DimensionMismatch`] unless `self.cols() == other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Self> {
        self.multiply_with(other, ProductConvention::Standard)
    }

    /// Computes the product under the given index convention.
    pub fn multiply_with(&self, other: &Matrix, convention: ProductConvention) -> Result<Self> {
        if self.cols != other.rows {
            debug!(
                left = ?self.shape(),
                right = ?other.shape(),
                "rejecting matrix product with mismatched inner dimensions"
            );
            return Err(MathError::DimensionMismatch {
                operation: Operation::MatrixMultiply,
                expected: self.cols,
                actual: other.rows,
            });
        }
        trace!(left = ?self.shape(), right = ?other.shape(), ?convention, "matrix multiply");

        match convention {
            ProductConvention::Standard => {
                let mut res = Self::zeros(self.rows, other.cols);
                for i in 0..self.rows {
                    for j in 0..other.cols {
                        res.data[i * other.cols + j] = (0..self.cols)
                            .map(|k| self.data[i * self.cols + k] * other.data[k * other.cols + j])
                            .sum();
                    }
                }
                Ok(res)
            }
            ProductConvention::Legacy => {
                if self.rows != other.cols {
                    debug!(
                        left = ?self.shape(),
                        right = ?other.shape(),
                        "legacy product needs left rows equal to right cols"
                    );
                    return Err(MathError::DimensionMismatch {
                        operation: Operation::MatrixMultiply,
                        expected: self.rows,
                        actual: other.cols,
                    });
                }
                if other.cols > self.cols {
                    debug!(
                        left = ?self.shape(),
                        right = ?other.shape(),
                        "legacy product cannot widen the left operand"
                    );
                    return Err(MathError::DimensionMismatch {
                        operation: Operation::MatrixMultiply,
                        expected: self.cols,
                        actual: other.cols,
                    });
                }
                let mut res = Self::zeros(self.rows, self.cols);
                for j in 0..self.rows {
                    for i in 0..other.cols {
                        res.data[j * res.cols + i] = (0..other.rows)
                            .map(|k| self.data[i * self.cols + k] * other.data[k * other.cols + j])
                            .sum();
                    }
                }
                Ok(res)
            }
        }
    }

    /// Replaces `self` with `self · other`. On error `self` is left untouched.
    pub fn multiply_assign(&mut self, other: &Matrix) -> Result<()> {
        *self = self.multiply(other)?;
        Ok(())
    }

    /// Kronecker product `self ⊗ other`. See [`tensor_product`].
    pub fn tensor(&self, other: &Matrix) -> Self {
        tensor_product(self, other)
    }

    /// Elementwise comparison within `eps`, requiring equal shapes.
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= eps)
    }

    /// Writes the matrix to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

fn dim_product(a: usize, b: usize) -> usize {
    match a.checked_mul(b) {
        Some(n) => n,
        None => panic!("matrix dimensions {a} * {b} overflow usize"),
    }
}

/// Kronecker product of two matrices.
///
/// The result has shape `(a.rows·b.rows, a.cols·b.cols)` with
/// `out[b.rows·y1 + y2][b.cols·x1 + x2] = a[y1][x1] · b[y2][x2]`.
///
/// # Panics
/// Panics if the result's extents or element count overflow `usize`.
pub fn tensor_product(a: &Matrix, b: &Matrix) -> Matrix {
    trace!(left = ?a.shape(), right = ?b.shape(), "matrix tensor product");
    let mut res = Matrix::zeros(dim_product(a.rows, b.rows), dim_product(a.cols, b.cols));
    for y1 in 0..a.rows {
        for x1 in 0..a.cols {
            let a_val = a.data[y1 * a.cols + x1];
            for y2 in 0..b.rows {
                for x2 in 0..b.cols {
                    let row = b.rows * y1 + y2;
                    let col = b.cols * x1 + x2;
                    res.data[row * res.cols + col] = a_val * b.data[y2 * b.cols + x2];
                }
            }
        }
    }
    res
}

impl TryFrom<Vec<Vec<Complex64>>> for Matrix {
    type Error = MathError;
    fn try_from(rows: Vec<Vec<Complex64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Result<Matrix>;
    fn mul(self, rhs: &Matrix) -> Self::Output {
        self.multiply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EPSILON, I};
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn real(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|&x| c(x, 0.0)).collect())
                .collect(),
        )
        .unwrap()
    }

    fn pauli_x() -> Matrix {
        real(&[&[0.0, 1.0], &[1.0, 0.0]])
    }

    #[test]
    fn test_zeros_and_square() {
        let m = Matrix::zeros(2, 3);
        assert_eq!(m.shape(), (2, 3));
        assert!(m.as_slice().iter().all(|z| *z == ZERO));
        assert_eq!(Matrix::square(4).shape(), (4, 4));
        assert_eq!(Matrix::default().shape(), (0, 0));
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn test_zeros_overflowing_dimensions_panics() {
        let _ = Matrix::zeros(usize::MAX, 2);
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn test_set_size_overflowing_dimensions_panics() {
        let mut m = Matrix::square(2);
        m.set_size(2, usize::MAX);
    }

    #[test]
    fn test_from_rows_derives_shape() {
        let m = real(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2).unwrap(), c(6.0, 0.0));
        assert_eq!(m.row(0).unwrap(), &[c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)]);
        assert_eq!(Matrix::from_rows(vec![]).unwrap().shape(), (0, 0));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = Matrix::from_rows(vec![vec![ONE, ZERO], vec![ONE]]).unwrap_err();
        assert_eq!(
            err,
            MathError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_set_size_discards_content() {
        let mut m = pauli_x();
        m.set_size(3, 1);
        assert_eq!(m.shape(), (1, 3));
        assert!(m.as_slice().iter().all(|z| *z == ZERO));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut m = Matrix::zeros(2, 3);
        m.set(1, 2, I).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), I);
        assert_eq!(
            m.get(2, 0),
            Err(MathError::IndexOutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        assert!(m.set(0, 3, ONE).is_err());
        assert!(m.row(2).is_err());
    }

    #[test]
    fn test_adjoint() {
        let m = Matrix::from_rows(vec![vec![c(1.0, 1.0), c(2.0, 0.0), c(0.0, -3.0)]]).unwrap();
        let adj = m.adjoint();
        assert_eq!(adj.shape(), (3, 1));
        assert_eq!(adj.get(0, 0).unwrap(), c(1.0, -1.0));
        assert_eq!(adj.get(2, 0).unwrap(), c(0.0, 3.0));
        assert_eq!(adj.adjoint(), m);
    }

    #[test]
    fn test_controlled_x_is_cnot() {
        let cnot = pauli_x().controlled();
        let expected = real(&[
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 1.0],
            &[0.0, 0.0, 1.0, 0.0],
        ]);
        assert_eq!(cnot, expected);
    }

    #[test]
    fn test_controlled_rectangular() {
        let m = real(&[&[1.0, 2.0, 3.0]]);
        let cm = m.controlled();
        assert_eq!(cm.shape(), (2, 6));
        assert_eq!(cm.row(0).unwrap()[..3], [ONE, ZERO, ZERO]);
        assert_eq!(cm.row(1).unwrap()[3..], [c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)]);
    }

    #[test]
    fn test_multiply_standard() {
        let a = real(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = real(&[&[5.0, 6.0], &[7.0, 8.0]]);
        let ab = a.multiply(&b).unwrap();
        assert_eq!(ab, real(&[&[19.0, 22.0], &[43.0, 50.0]]));

        let row = real(&[&[1.0, 2.0, 3.0]]);
        let col = real(&[&[1.0], &[1.0], &[1.0]]);
        assert_eq!(row.multiply(&col).unwrap(), real(&[&[6.0]]));
        assert_eq!(col.multiply(&row).unwrap().shape(), (3, 3));
    }

    #[test]
    fn test_multiply_legacy_is_transposed_product() {
        let a = real(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = real(&[&[5.0, 6.0], &[7.0, 8.0]]);
        let legacy = a.multiply_with(&b, ProductConvention::Legacy).unwrap();
        assert_eq!(legacy, real(&[&[19.0, 43.0], &[22.0, 50.0]]));
        assert_eq!(legacy, a.multiply(&b).unwrap().adjoint());

        // Symmetric operands agree under both conventions.
        let x = pauli_x();
        assert_eq!(
            x.multiply_with(&x, ProductConvention::Legacy).unwrap(),
            x.multiply(&x).unwrap()
        );
    }

    #[test]
    fn test_multiply_legacy_requires_matching_outer_dimensions() {
        let a = real(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = real(&[&[1.0], &[1.0], &[1.0]]);
        assert!(a.multiply(&b).is_ok());
        assert_eq!(
            a.multiply_with(&b, ProductConvention::Legacy),
            Err(MathError::DimensionMismatch {
                operation: Operation::MatrixMultiply,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_multiply_legacy_keeps_left_shape() {
        let a = real(&[&[1.0, 2.0]]);
        let b = real(&[&[3.0], &[4.0]]);
        let legacy = a.multiply_with(&b, ProductConvention::Legacy).unwrap();
        assert_eq!(legacy.shape(), (1, 2));
        assert_eq!(legacy, real(&[&[11.0, 0.0]]));
        assert_eq!(a.multiply(&b).unwrap(), real(&[&[11.0]]));
    }

    #[test]
    fn test_multiply_legacy_rejects_wider_right_operand() {
        let a = real(&[&[1.0], &[2.0]]);
        let b = real(&[&[3.0, 4.0]]);
        assert_eq!(a.multiply(&b).unwrap().shape(), (2, 2));
        assert_eq!(
            a.multiply_with(&b, ProductConvention::Legacy),
            Err(MathError::DimensionMismatch {
                operation: Operation::MatrixMultiply,
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert_eq!(
            &a * &b,
            Err(MathError::DimensionMismatch {
                operation: Operation::MatrixMultiply,
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_multiply_assign_keeps_receiver_on_error() {
        let mut a = pauli_x();
        assert!(a.multiply_assign(&Matrix::zeros(3, 3)).is_err());
        assert_eq!(a, pauli_x());
        a.multiply_assign(&pauli_x()).unwrap();
        assert_eq!(a, Matrix::identity(2));
    }

    #[test]
    fn test_tensor_product() {
        let id1 = real(&[&[1.0]]);
        assert_eq!(tensor_product(&id1, &id1), id1);

        let z = real(&[&[1.0, 0.0], &[0.0, -1.0]]);
        let zx = z.tensor(&pauli_x());
        let expected = real(&[
            &[0.0, 1.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, -1.0],
            &[0.0, 0.0, -1.0, 0.0],
        ]);
        assert_eq!(zx, expected);

        let a = real(&[&[1.0, 2.0]]);
        let b = real(&[&[1.0], &[3.0], &[5.0]]);
        let ab = tensor_product(&a, &b);
        assert_eq!(ab.shape(), (3, 2));
        assert_eq!(ab.get(2, 1).unwrap(), c(10.0, 0.0));
    }

    #[test]
    fn test_associativity_standard() {
        let a = Matrix::from_rows(vec![vec![c(1.0, 2.0), c(0.0, 1.0)], vec![c(3.0, 0.0), c(-1.0, 0.5)]]).unwrap();
        let b = real(&[&[0.0, 2.0, 1.0], &[1.0, -1.0, 0.0]]);
        let cm = real(&[&[1.0], &[2.0], &[3.0]]);
        let left = a.multiply(&b).unwrap().multiply(&cm).unwrap();
        let right = a.multiply(&b.multiply(&cm).unwrap()).unwrap();
        assert!(left.approx_eq(&right, EPSILON));
    }

    #[test]
    fn test_associativity_breaks_under_legacy() {
        let a = real(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = real(&[&[0.0, 1.0], &[2.0, 0.0]]);
        let cm = real(&[&[1.0, 1.0], &[0.0, 1.0]]);
        let legacy = ProductConvention::Legacy;
        let left = a
            .multiply_with(&b, legacy)
            .unwrap()
            .multiply_with(&cm, legacy)
            .unwrap();
        let right = a
            .multiply_with(&b.multiply_with(&cm, legacy).unwrap(), legacy)
            .unwrap();
        assert!(!left.approx_eq(&right, EPSILON));
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = pauli_x();
        let mut b = pauli_x();
        b.set(0, 1, c(1.0 + 1e-12, 0.0)).unwrap();
        assert!(a.approx_eq(&b, 1e-9));
        assert_ne!(a, b);
        assert_abs_diff_eq!(b.get(0, 1).unwrap().re, 1.0, epsilon = 1e-9);
        assert!(!a.approx_eq(&Matrix::identity(3), 1e-9));
    }
}
