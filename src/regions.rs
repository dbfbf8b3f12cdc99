//! Regions: the unit of the subdivision algorithm.  A region is a
//! pixel rectangle together with the plane coordinates of its two
//! diagonal corner pixels, computed once from the viewport when the
//! region is made.  Regions are transient values: they are created,
//! possibly split into quadrants, and discarded once their pixels are
//! committed.  Nothing keeps a tree of them.

use num::Complex;
use planes::Viewport;

/// An axis-aligned rectangle of pixels.  Width and height count
/// pixels, so `right` and `bottom` name the last column and row inside
/// the rectangle, not one past it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Leftmost pixel column.
    pub x: u32,
    /// Topmost pixel row.
    pub y: u32,
    /// Pixel columns covered; always at least 1.
    pub width: u32,
    /// Pixel rows covered; always at least 1.
    pub height: u32,
}

impl PixelRect {
    /// Constructor.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    /// The last pixel column inside the rectangle.
    pub fn right(&self) -> u32 {
        self.x + self.width - 1
    }

    /// The last pixel row inside the rectangle.
    pub fn bottom(&self) -> u32 {
        self.y + self.height - 1
    }
}

/// A pixel rectangle plus the plane coordinates of its first and last
/// pixels.  The other two corners are derived from the viewport on
/// demand, exactly as the diagonal ones were.
#[derive(Copy, Clone, Debug)]
pub struct Region {
    /// The pixels this region covers.
    pub rect: PixelRect,
    /// Plane coordinate of pixel (x, y).
    pub upper_left: Complex<f64>,
    /// Plane coordinate of pixel (x + width - 1, y + height - 1).
    pub lower_right: Complex<f64>,
}

impl Region {
    /// Build a region over `rect`, deriving both diagonal corners
    /// through the viewport's affine map.
    pub fn new(view: &Viewport, rect: PixelRect) -> Region {
        Region {
            rect,
            upper_left: view.pixel_to_point(rect.x, rect.y),
            lower_right: view.pixel_to_point(rect.right(), rect.bottom()),
        }
    }

    /// Plane coordinate of the region's upper-right corner pixel.
    pub fn upper_right(&self, view: &Viewport) -> Complex<f64> {
        view.pixel_to_point(self.rect.right(), self.rect.y)
    }

    /// Plane coordinate of the region's lower-left corner pixel.
    pub fn lower_left(&self, view: &Viewport) -> Complex<f64> {
        view.pixel_to_point(self.rect.x, self.rect.bottom())
    }

    /// Split into up to four quadrant regions, returned in
    /// [upper-left, upper-right, lower-left, lower-right] order.
    ///
    /// The width splits into a left half of ceil(width / 2) and a
    /// right half of the remainder, so an odd rectangle's leftover
    /// column goes to the left; heights split the same way with the
    /// leftover row going to the top.  When either remainder is zero
    /// only the upper-left quadrant is produced; the split is all
    /// four quadrants or none beyond the first.
    pub fn subdivide(&self, view: &Viewport) -> [Option<Region>; 4] {
        let r = self.rect;
        let half_right = r.width >> 1;
        let half_left = r.width - half_right;
        let half_down = r.height >> 1;
        let half_up = r.height - half_down;

        let mut quadrants = [None; 4];

        if half_left > 0 && half_up > 0 {
            quadrants[0] = Some(Region::new(
                view,
                PixelRect::new(r.x, r.y, half_left, half_up),
            ));
        }

        if half_right > 0 && half_down > 0 {
            quadrants[1] = Some(Region::new(
                view,
                PixelRect::new(r.x + half_left, r.y, half_right, half_up),
            ));
            quadrants[2] = Some(Region::new(
                view,
                PixelRect::new(r.x, r.y + half_up, half_left, half_down),
            ));
            quadrants[3] = Some(Region::new(
                view,
                PixelRect::new(r.x + half_left, r.y + half_up, half_right, half_down),
            ));
        }

        quadrants
    }
}
