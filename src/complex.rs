//! Complex arithmetic for the iteration map and the plane geometry.
//! The value type is num's `Complex<f64>`, which already carries the
//! field operations, conjugation, norms, argument, and exponential.
//! What num does not give us is an inverse that admits failure: its
//! `inv()` happily divides by a zero squared-norm and hands back NaN.
//! The extension trait below makes that case an error instead.

use errors::RenderError;
use num::Complex;

/// The one operation the stock `Complex<f64>` gets wrong for our
/// purposes.  Implemented for `Complex<f64>` only; the renderer has no
/// use for generic numeric towers.
pub trait ComplexOps {
    /// Multiplicative inverse, computed as the conjugate divided by
    /// the squared norm.  Fails with `DivisionByZero` at the origin.
    fn checked_inverse(&self) -> Result<Complex<f64>, RenderError>;
}

impl ComplexOps for Complex<f64> {
    fn checked_inverse(&self) -> Result<Complex<f64>, RenderError> {
        let norm2 = self.norm_sqr();
        if norm2 == 0.0 {
            return Err(RenderError::DivisionByZero);
        }
        Ok(self.conj().unscale(norm2))
    }
}
