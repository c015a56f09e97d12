//! Text rendering of complex scalars, matrices and kets.
//!
//! Elements are printed with a fixed number of significant digits. Pure real
//! values print bare, pure imaginary values print as `<im>i`, and a unit
//! imaginary coefficient collapses to `i` / `-i`. All of these decisions use an
//! epsilon comparison.
//!
//! The precision of the `Display` impls can be overridden with the standard
//! formatter precision, e.g. `format!("{:.5}", ket)`.

use core::fmt::{self, Write};

use crate::{Complex64, EPSILON, Ket, Matrix};

/// Options controlling how complex elements are rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatOptions {
    /// Number of significant digits per real component.
    pub precision: usize,
    /// Tolerance below which a component counts as zero (or a magnitude as one).
    pub epsilon: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            precision: 3,
            epsilon: EPSILON,
        }
    }
}

impl FormatOptions {
    fn from_formatter(f: &fmt::Formatter<'_>) -> Self {
        let mut options = Self::default();
        if let Some(precision) = f.precision() {
            options.precision = precision;
        }
        options
    }
}

/// Returns `""` for positive values and `"-"` otherwise.
fn sgn(value: f64) -> &'static str {
    if value > 0.0 { "" } else { "-" }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Formats a real number with `precision` significant digits, `%g` style.
pub fn format_real(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    // The exponent after rounding decides between fixed and scientific form.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        trim_fraction(&fixed).to_string()
    }
}

/// Formats one complex element according to `options`.
pub fn format_complex(z: Complex64, options: &FormatOptions) -> String {
    let eps = options.epsilon;
    let p = options.precision;
    let unit_imag = (z.im.abs() - 1.0).abs() < eps;

    if z.im.abs() < eps {
        format_real(z.re, p)
    } else if z.re.abs() < eps {
        if unit_imag {
            format!("{}i", sgn(z.im))
        } else {
            format!("{}i", format_real(z.im, p))
        }
    } else {
        let op = if z.im < 0.0 { '-' } else { '+' };
        if unit_imag {
            format!("{} {} i", format_real(z.re, p), op)
        } else {
            format!("{} {} {}i", format_real(z.re, p), op, format_real(z.im.abs(), p))
        }
    }
}

pub(crate) fn write_matrix<W: Write>(out: &mut W, matrix: &Matrix, options: &FormatOptions) -> fmt::Result {
    for row in matrix.iter_rows() {
        out.write_char('|')?;
        for &z in row {
            write!(out, " {} ", format_complex(z, options))?;
        }
        out.write_str("|\n")?;
    }
    out.write_char('\n')
}

pub(crate) fn write_ket<W: Write>(out: &mut W, ket: &Ket, options: &FormatOptions) -> fmt::Result {
    out.write_char('\n')?;
    for &z in ket.as_slice() {
        writeln!(out, "| {} |", format_complex(z, options))?;
    }
    out.write_char('\n')
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = FormatOptions::from_formatter(f);
        write_matrix(f, self, &options)
    }
}

impl fmt::Display for Ket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = FormatOptions::from_formatter(f);
        write_ket(f, self, &options)
    }
}
