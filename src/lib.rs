#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Adaptive Mandelbrot renderer
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly multiplies it by itself, measuring how quickly that
//! number goes to infinity.  This "velocity" is the number used to
//! render the image.  Evaluating it at every pixel is the obvious
//! algorithm and almost all of that work is wasted: the velocity's
//! level curves bound connected regions, so a rectangle whose whole
//! perimeter shows one color has an interior of the same color.
//!
//! This crate renders by exploiting exactly that.  A session maps a
//! pixel grid onto a plane rectangle, evaluates the perimeter of the
//! full image, and recursively splits rectangles with mixed
//! perimeters into quadrants, reusing each parent's evaluated edges,
//! until the survivors are uniform or a single pixel wide, at which
//! point interiors are filled by inference rather than iteration.
//! Finished regions flow to a display consumer through a
//! double-buffered queue, so painting never stalls rendering.

#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate crossbeam;
extern crate num;

#[cfg(test)]
extern crate rand;

pub mod adaptive;
pub mod buffer;
pub mod complex;
pub mod errors;
pub mod escape;
pub mod planes;
pub mod queue;
pub mod regions;
pub mod session;

pub use adaptive::AdaptiveRenderer;
pub use complex::ComplexOps;
pub use errors::RenderError;
pub use escape::{escape_velocity, velocity_to_color, Color, Palette};
pub use planes::Viewport;
pub use queue::DoubleBuffered;
pub use regions::{PixelRect, Region};
pub use session::Session;
