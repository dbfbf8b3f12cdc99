// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The adaptive boundary-tracing renderer.
//!
//! The expensive way to draw the set is to run the escape iteration at
//! every pixel.  This renderer runs it only along rectangle
//! boundaries: the level curves of the escape-time potential of a
//! connected compact set bound connected regions of the plane, so if
//! every pixel on a rectangle's perimeter maps to one color, the
//! interior must share it and can be filled without iterating at all.
//! Rectangles with mixed perimeters split into quadrants and the
//! argument repeats, down to single-pixel rows and columns.
//!
//! The uniformity test is an inference from the boundary colors, not a
//! proof.  Structure finer than a leaf rectangle can be averaged away,
//! which shows up as faint banding at high zoom; that is the price of
//! the O(perimeter) shortcut and is accepted here.
//!
//! Each child quadrant shares two edges with its already-evaluated
//! parent perimeter, so preparing a child costs only its missing
//! corner and its two interior-facing edges.  Finished regions go to a
//! sink closure; the renderer neither knows nor cares that the session
//! routes them into a queue.

use buffer::PixelBuffer;
use escape::{escape_velocity, Palette};
use itertools::iproduct;
use num::Complex;
use planes::Viewport;
use regions::Region;
use std::cell::Cell;

/// Renders one session's grid by recursive boundary subdivision.
/// Holds the shared pixel grid, the viewport that places it on the
/// plane, and the palette and iteration limit for the session.
pub struct AdaptiveRenderer<'a> {
    buffer: &'a PixelBuffer,
    view: &'a Viewport,
    palette: Palette,
    limit: u32,
    evaluated: Cell<u64>,
}

impl<'a> AdaptiveRenderer<'a> {
    /// Constructor.  The buffer and viewport must agree on the grid
    /// size; the session guarantees that by building both.
    pub fn new(
        buffer: &'a PixelBuffer,
        view: &'a Viewport,
        palette: Palette,
        limit: u32,
    ) -> AdaptiveRenderer<'a> {
        AdaptiveRenderer {
            buffer,
            view,
            palette,
            limit,
            evaluated: Cell::new(0),
        }
    }

    /// How many escape-velocity evaluations this renderer has run.
    /// The whole point of the algorithm is keeping this far below
    /// width × height.
    pub fn evaluated(&self) -> u64 {
        self.evaluated.get()
    }

    /// Evaluate a plane point and commit its color at (x, y).
    fn plot(&self, x: u32, y: u32, pt: Complex<f64>) {
        let color = (self.palette)(escape_velocity(pt, self.limit), self.limit);
        self.evaluated.set(self.evaluated.get() + 1);
        self.buffer.set(x, y, color);
    }

    /// Evaluate the pixel at (x, y) if it is on the grid.
    fn plot_pixel(&self, x: u32, y: u32) {
        if let Some(pt) = self.view.point(x, y) {
            self.plot(x, y, pt);
        }
    }

    fn draw_top(&self, region: &Region) {
        let r = region.rect;
        for i in 1..r.width - 1 {
            self.plot_pixel(r.x + i, r.y);
        }
    }

    fn draw_bottom(&self, region: &Region) {
        let r = region.rect;
        for i in 1..r.width - 1 {
            self.plot_pixel(r.x + i, r.bottom());
        }
    }

    fn draw_left(&self, region: &Region) {
        let r = region.rect;
        for j in 1..r.height - 1 {
            self.plot_pixel(r.x, r.y + j);
        }
    }

    fn draw_right(&self, region: &Region) {
        let r = region.rect;
        for j in 1..r.height - 1 {
            self.plot_pixel(r.right(), r.y + j);
        }
    }

    /// Evaluate the full perimeter of a region: all four corners plus
    /// every edge pixel between them.  Corners always get a fresh
    /// evaluation; they are shared with siblings whose rectangles
    /// derive them from different parents, so inheriting a stale cell
    /// is not an option.
    pub fn draw_boundary(&self, region: &Region) {
        let r = region.rect;
        self.plot(r.x, r.y, region.upper_left);
        self.plot(r.right(), r.bottom(), region.lower_right);
        self.plot(r.right(), r.y, region.upper_right(self.view));
        self.plot(r.x, r.bottom(), region.lower_left(self.view));
        self.draw_top(region);
        self.draw_bottom(region);
        self.draw_left(region);
        self.draw_right(region);
    }

    // The four quadrant preparations.  Each assumes the parent's
    // perimeter is already in the buffer and evaluates only the
    // child's missing corner and its two interior-facing edges.

    fn prepare_upper_left(&self, region: &Region) {
        let r = region.rect;
        self.plot(r.right(), r.bottom(), region.lower_right);
        self.draw_right(region);
        self.draw_bottom(region);
    }

    fn prepare_upper_right(&self, region: &Region) {
        let r = region.rect;
        self.plot(r.x, r.bottom(), region.lower_left(self.view));
        self.draw_left(region);
        self.draw_bottom(region);
    }

    fn prepare_lower_left(&self, region: &Region) {
        let r = region.rect;
        self.plot(r.right(), r.y, region.upper_right(self.view));
        self.draw_top(region);
        self.draw_right(region);
    }

    fn prepare_lower_right(&self, region: &Region) {
        let r = region.rect;
        self.plot(r.x, r.y, region.upper_left);
        self.draw_top(region);
        self.draw_left(region);
    }

    /// True when the region's perimeter disagrees with its top-left
    /// pixel and the region is big enough to split.  A one-pixel-wide
    /// or one-pixel-tall region is never split: its perimeter is all
    /// of it, so it is already fully evaluated.
    fn must_subdivide(&self, region: &Region) -> bool {
        let r = region.rect;
        if r.width <= 1 || r.height <= 1 {
            return false;
        }

        let base = self.buffer.get(r.x, r.y);
        for i in 0..r.width {
            if self.buffer.get(r.x + i, r.y) != base
                || self.buffer.get(r.x + i, r.bottom()) != base
            {
                return true;
            }
        }
        for j in 0..r.height {
            if self.buffer.get(r.x, r.y + j) != base
                || self.buffer.get(r.right(), r.y + j) != base
            {
                return true;
            }
        }
        false
    }

    /// Fill the region's interior with the top-left pixel's color.
    /// The perimeter is uniform when this runs, so every interior cell
    /// inherits it with zero evaluator calls.  This is what turns
    /// O(area) work into O(perimeter).
    fn complete(&self, region: &Region) {
        let r = region.rect;
        let base = self.buffer.get(r.x, r.y);
        for (j, i) in iproduct!(1..r.height - 1, 1..r.width - 1) {
            self.buffer.set(r.x + i, r.y + j, base);
        }
    }

    /// The recursion.  The region's full perimeter must already be in
    /// the buffer.  Uniform or degenerate regions are completed and
    /// handed to the sink; anything else splits into quadrants, each
    /// prepared and recursed in turn.  Terminates because every split
    /// strictly shrinks the rectangle.
    pub fn render(&self, region: Region, sink: &mut dyn FnMut(Region)) {
        if !self.must_subdivide(&region) {
            self.complete(&region);
            sink(region);
            return;
        }

        let quadrants = region.subdivide(self.view);
        if let Some(child) = quadrants[0] {
            self.prepare_upper_left(&child);
            self.render(child, sink);
        }
        if let Some(child) = quadrants[1] {
            self.prepare_upper_right(&child);
            self.render(child, sink);
        }
        if let Some(child) = quadrants[2] {
            self.prepare_lower_left(&child);
            self.render(child, sink);
        }
        if let Some(child) = quadrants[3] {
            self.prepare_lower_right(&child);
            self.render(child, sink);
        }
    }

    /// Render the whole grid: evaluate the full-image perimeter, then
    /// recurse.
    pub fn render_root(&self, sink: &mut dyn FnMut(Region)) {
        use regions::PixelRect;

        let full = Region::new(
            self.view,
            PixelRect::new(0, 0, self.view.width(), self.view.height()),
        );
        self.draw_boundary(&full);
        self.render(full, sink);
        debug!(
            "adaptive render evaluated {} of {} pixels",
            self.evaluated(),
            u64::from(self.view.width()) * u64::from(self.view.height())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::UNSET;
    use escape::{velocity_to_color, INSIDE, OUTSIDE};
    use regions::PixelRect;

    fn fixture(
        width: u32,
        height: u32,
        upper_left: Complex<f64>,
        lower_right: Complex<f64>,
    ) -> (PixelBuffer, Viewport) {
        let view = Viewport::new(width, height, upper_left, lower_right).unwrap();
        (PixelBuffer::new(width, height), view)
    }

    fn render_all(buffer: &PixelBuffer, view: &Viewport, limit: u32) -> Vec<Region> {
        let renderer = AdaptiveRenderer::new(buffer, view, velocity_to_color, limit);
        let mut filled = Vec::new();
        renderer.render_root(&mut |region| filled.push(region));
        filled
    }

    #[test]
    fn region_far_outside_the_set_fills_white_without_splitting() {
        // every point near 3+3i escapes immediately, so the root
        // perimeter is uniform and the fill happens at depth zero
        let (buffer, view) =
            fixture(4, 4, Complex::new(3.0, 3.0), Complex::new(3.01, 2.99));
        let filled = render_all(&buffer, &view, 100);

        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].rect, PixelRect::new(0, 0, 4, 4));
        for (y, x) in iproduct!(0..4, 0..4) {
            assert_eq!(buffer.color(x, y), Some(OUTSIDE));
        }
    }

    #[test]
    fn the_pixel_at_the_origin_renders_black() {
        // 42 columns over [-2.1, 2.1] puts pixel (21, 21) exactly on
        // 0+0i, which never escapes
        let (buffer, view) =
            fixture(42, 42, Complex::new(-2.1, 2.1), Complex::new(2.1, -2.1));
        render_all(&buffer, &view, 256);
        assert_eq!(view.point(21, 21), Some(Complex::new(0.0, 0.0)));
        assert_eq!(buffer.color(21, 21), Some(INSIDE));
    }

    #[test]
    fn every_pixel_is_committed_and_regions_tile_the_grid() {
        let (buffer, view) =
            fixture(37, 23, Complex::new(-2.1, 1.3), Complex::new(1.1, -1.3));
        let filled = render_all(&buffer, &view, 64);

        let mut claimed = vec![0u8; 37 * 23];
        for region in &filled {
            let r = region.rect;
            for (j, i) in iproduct!(0..r.height, 0..r.width) {
                claimed[((r.y + j) * 37 + r.x + i) as usize] += 1;
            }
        }
        assert!(claimed.iter().all(|&c| c == 1));

        for (y, x) in iproduct!(0..23, 0..37) {
            assert_ne!(buffer.get(x, y), UNSET, "pixel ({}, {}) never drawn", x, y);
        }
    }

    #[test]
    fn filled_regions_are_interior_uniform() {
        let (buffer, view) =
            fixture(64, 64, Complex::new(-2.1, 2.1), Complex::new(2.1, -2.1));
        let filled = render_all(&buffer, &view, 64);

        for region in filled.iter().filter(|f| f.rect.width > 1 && f.rect.height > 1) {
            let r = region.rect;
            let base = buffer.get(r.x, r.y);
            for (j, i) in iproduct!(0..r.height, 0..r.width) {
                assert_eq!(buffer.get(r.x + i, r.y + j), base);
            }
        }
    }

    #[test]
    fn degenerate_grids_complete_without_subdividing() {
        let (buffer, view) =
            fixture(9, 1, Complex::new(-2.0, 0.0), Complex::new(2.0, -0.1));
        let filled = render_all(&buffer, &view, 32);
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].rect, PixelRect::new(0, 0, 9, 1));
        for x in 0..9 {
            assert_ne!(buffer.get(x, 0), UNSET);
        }

        let (buffer, view) =
            fixture(1, 9, Complex::new(-0.1, 2.0), Complex::new(0.0, -2.0));
        assert_eq!(render_all(&buffer, &view, 32).len(), 1);
    }

    #[test]
    fn uniform_perimeter_is_detected_and_filled() {
        let (buffer, view) =
            fixture(8, 8, Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0));
        let renderer = AdaptiveRenderer::new(&buffer, &view, velocity_to_color, 10);
        let region = Region::new(&view, PixelRect::new(1, 1, 5, 5));

        // hand-paint a uniform perimeter
        let r = region.rect;
        for i in 0..r.width {
            buffer.set(r.x + i, r.y, 0x101010);
            buffer.set(r.x + i, r.bottom(), 0x101010);
        }
        for j in 0..r.height {
            buffer.set(r.x, r.y + j, 0x101010);
            buffer.set(r.right(), r.y + j, 0x101010);
        }
        assert!(!renderer.must_subdivide(&region));

        renderer.complete(&region);
        for (j, i) in iproduct!(0..r.height, 0..r.width) {
            assert_eq!(buffer.get(r.x + i, r.y + j), 0x101010);
        }

        // one disagreeing perimeter pixel forces a split
        buffer.set(r.x + 2, r.y, 0x202020);
        assert!(renderer.must_subdivide(&region));
    }

    #[test]
    fn evaluation_count_stays_below_the_pixel_count() {
        let (buffer, view) =
            fixture(128, 128, Complex::new(-2.1, 2.1), Complex::new(2.1, -2.1));
        let renderer = AdaptiveRenderer::new(&buffer, &view, velocity_to_color, 64);
        renderer.render_root(&mut |_| {});
        assert!(renderer.evaluated() < 128 * 128);
    }
}
