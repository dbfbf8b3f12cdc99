//! Contains the Viewport struct, which describes the relationship
//! between a pixel grid with its origin at 0,0 and a rectangle of the
//! complex plane given by its upper-left and lower-right corners.
//! Rather than carrying the corners around, the viewport stores the
//! plane coordinate of pixel (0,0) and one step vector per axis, so a
//! pixel lookup is a single affine combination.

use errors::RenderError;
use num::Complex;

/// Maps pixel coordinates onto a rectangle of the complex plane.  The
/// horizontal step is purely real and the vertical step purely
/// imaginary; their signs are whatever the requested corners dictate,
/// so increasing pixel x or y always walks monotonically across the
/// requested rectangle.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    origin: Complex<f64>,
    h_delta: Complex<f64>,
    v_delta: Complex<f64>,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Constructor.  Takes the pixel grid size and the plane
    /// coordinates of the grid's upper-left and lower-right corners.
    /// A grid with a zero dimension is rejected as `InvalidGeometry`.
    pub fn new(
        width: u32,
        height: u32,
        upper_left: Complex<f64>,
        lower_right: Complex<f64>,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidGeometry { width, height });
        }

        Ok(Viewport {
            origin: upper_left,
            h_delta: Complex::new((lower_right.re - upper_left.re) / f64::from(width), 0.0),
            v_delta: Complex::new(0.0, (lower_right.im - upper_left.im) / f64::from(height)),
            width,
            height,
        })
    }

    /// Pixel columns in the grid.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel rows in the grid.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Given the column and row of a pixel, return the complex number
    /// at the equivalent location on the plane.  The map is affine and
    /// does not care whether the pixel is inside the grid; `point` is
    /// the bounds-checked variant.
    pub fn pixel_to_point(&self, x: u32, y: u32) -> Complex<f64> {
        self.origin + self.h_delta.scale(f64::from(x)) + self.v_delta.scale(f64::from(y))
    }

    /// The plane coordinate of an in-bounds pixel, or None for a
    /// coordinate outside the grid.  Out-of-range queries are a caller
    /// error and get no plane point to iterate on.
    pub fn point(&self, x: u32, y: u32) -> Option<Complex<f64>> {
        if x < self.width && y < self.height {
            Some(self.pixel_to_point(x, y))
        } else {
            None
        }
    }
}
