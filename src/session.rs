//! A render session: the one object both sides of the pipeline hold.
//! It owns the pixel grid and a single mutex guarding the viewport,
//! the session epoch, and the double-buffered region queue.  The
//! renderer appends finished regions under that lock (an O(1) hold);
//! the display consumer swaps the queue pair under it (also O(1)) and
//! paints outside it.  Re-initializing for a zoom bumps the epoch and
//! discards both sequences in one critical section, so a render still
//! in flight for the old viewport can never smuggle a stale region
//! into a later drain: its appends carry the old epoch and are
//! dropped at the lock.

use adaptive::AdaptiveRenderer;
use buffer::PixelBuffer;
use errors::RenderError;
use escape::{velocity_to_color, Color, Palette};
use num::Complex;
use planes::Viewport;
use queue::DoubleBuffered;
use regions::Region;
use std::sync::{Mutex, MutexGuard};

/// Everything that changes when the viewport changes, under one lock.
#[derive(Debug)]
struct Shared {
    view: Option<Viewport>,
    epoch: u64,
    regions: DoubleBuffered<Region>,
}

/// A configured render session over a fixed pixel grid.  Create one
/// with the grid size and iteration limit, `initialize` it onto a
/// plane rectangle, and share it by reference with the renderer and
/// the display consumer.
#[derive(Debug)]
pub struct Session {
    width: u32,
    height: u32,
    limit: u32,
    palette: Palette,
    buffer: PixelBuffer,
    shared: Mutex<Shared>,
}

impl Session {
    /// Configure a session.  The grid size is fixed for the session's
    /// lifetime (a different size means a different session) and a
    /// zero dimension is `InvalidGeometry`.  The iteration limit is
    /// likewise fixed; it must not change between a render and the
    /// palette lookups that interpret its velocities.
    pub fn new(width: u32, height: u32, limit: u32) -> Result<Session, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidGeometry { width, height });
        }

        Ok(Session {
            width,
            height,
            limit,
            palette: velocity_to_color,
            buffer: PixelBuffer::new(width, height),
            shared: Mutex::new(Shared {
                view: None,
                epoch: 0,
                regions: DoubleBuffered::new(),
            }),
        })
    }

    /// Swap in a different palette before rendering.  The palette must
    /// be pure; the uniformity fill compares its outputs.
    pub fn with_palette(mut self, palette: Palette) -> Session {
        self.palette = palette;
        self
    }

    // Renderer-side lock access.  A poisoned mutex means a consumer
    // died painting; the renderer inherits the state and keeps going.
    fn lock(&self) -> MutexGuard<Shared> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Point the session at a plane rectangle.  Discards any regions
    /// queued by a previous viewport, supersedes any render still in
    /// flight for it, and resets every pixel to unset.
    pub fn initialize(
        &self,
        upper_left: Complex<f64>,
        lower_right: Complex<f64>,
    ) -> Result<(), RenderError> {
        let view = Viewport::new(self.width, self.height, upper_left, lower_right)?;
        {
            let mut shared = self.lock();
            shared.epoch += 1;
            shared.regions.clear();
            shared.view = Some(view);
        }
        self.buffer.clear();
        debug!(
            "session initialized: {}x{} grid on ({}, {}i) .. ({}, {}i)",
            self.width, self.height, upper_left.re, upper_left.im, lower_right.re, lower_right.im
        );
        Ok(())
    }

    /// Run the adaptive render to completion, committing pixels to the
    /// session grid and queueing every finished region for the
    /// consumer.  Fails with `Uninitialized` if no viewport has been
    /// installed.
    pub fn render(&self) -> Result<(), RenderError> {
        let (view, epoch) = {
            let shared = self.lock();
            match shared.view {
                Some(view) => (view, shared.epoch),
                None => return Err(RenderError::Uninitialized),
            }
        };

        let renderer = AdaptiveRenderer::new(&self.buffer, &view, self.palette, self.limit);
        let mut filled: u64 = 0;
        renderer.render_root(&mut |region| {
            filled += 1;
            self.push_region(epoch, region);
        });
        debug!(
            "render complete: {} regions, {} escape evaluations",
            filled,
            renderer.evaluated()
        );
        Ok(())
    }

    /// Append a finished region, provided the session has not been
    /// re-initialized since the pushing render began.
    fn push_region(&self, epoch: u64, region: Region) {
        let mut shared = self.lock();
        if shared.epoch == epoch {
            shared.regions.push(region);
        }
    }

    /// Consumer side: take every region queued since the last drain
    /// and swap the queue roles, all in one O(1) critical section.
    /// Paint the batch outside the lock, then give it back with
    /// `retire`.  An interrupted wait surfaces as `Interrupted`; the
    /// consumer's recovery is a full repaint from `pixel_color`, not
    /// an error dialog.
    pub fn drain_and_swap(&self) -> Result<Vec<Region>, RenderError> {
        let mut shared = self.shared.lock().map_err(|_| RenderError::Interrupted)?;
        Ok(shared.regions.drain_and_swap())
    }

    /// Hand a painted batch back so its allocation keeps cycling
    /// between the two queue roles.
    pub fn retire(&self, batch: Vec<Region>) {
        self.lock().regions.retire(batch);
    }

    /// The committed color of one pixel, for the consumer's
    /// full-buffer repaint path.  None for pixels not yet rendered or
    /// coordinates off the grid.
    pub fn pixel_color(&self, x: u32, y: u32) -> Option<Color> {
        self.buffer.color(x, y)
    }

    /// Pixel columns in the session grid.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel rows in the session grid.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The iteration limit this session renders with.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[cfg(test)]
    fn current_epoch(&self) -> u64 {
        self.lock().epoch
    }

    #[cfg(test)]
    fn stale_region(&self) -> Region {
        use regions::PixelRect;

        let shared = self.lock();
        Region::new(
            &shared.view.expect("no viewport installed"),
            PixelRect::new(0, 0, 2, 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::{INSIDE, OUTSIDE};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn the_standard_view() -> (Complex<f64>, Complex<f64>) {
        (Complex::new(-2.1, 2.1), Complex::new(2.1, -2.1))
    }

    #[test]
    fn zero_dimensions_are_rejected_at_configure_time() {
        assert_eq!(
            Session::new(0, 100, 64).unwrap_err(),
            RenderError::InvalidGeometry { width: 0, height: 100 }
        );
        assert_eq!(
            Session::new(100, 0, 64).unwrap_err(),
            RenderError::InvalidGeometry { width: 100, height: 0 }
        );
    }

    #[test]
    fn rendering_before_initialize_fails() {
        let session = Session::new(16, 16, 64).unwrap();
        assert_eq!(session.render().unwrap_err(), RenderError::Uninitialized);
    }

    #[test]
    fn render_then_drain_covers_the_grid() {
        let (ul, lr) = the_standard_view();
        let session = Session::new(48, 48, 64).unwrap();
        session.initialize(ul, lr).unwrap();
        session.render().unwrap();

        let batch = session.drain_and_swap().unwrap();
        assert!(!batch.is_empty());

        let mut claimed = vec![0u8; 48 * 48];
        for region in &batch {
            let r = region.rect;
            for j in 0..r.height {
                for i in 0..r.width {
                    claimed[((r.y + j) * 48 + r.x + i) as usize] += 1;
                }
            }
        }
        assert!(claimed.iter().all(|&c| c == 1));

        for y in 0..48 {
            for x in 0..48 {
                assert!(session.pixel_color(x, y).is_some());
            }
        }
    }

    #[test]
    fn the_origin_pixel_is_inside_and_the_corner_is_outside() {
        let (ul, lr) = the_standard_view();
        let session = Session::new(42, 42, 256).unwrap();
        session.initialize(ul, lr).unwrap();
        session.render().unwrap();
        assert_eq!(session.pixel_color(21, 21), Some(INSIDE));
        assert_eq!(session.pixel_color(0, 0), Some(OUTSIDE));
    }

    #[test]
    fn a_second_initialize_discards_queued_regions() {
        let (ul, lr) = the_standard_view();
        let session = Session::new(24, 24, 32).unwrap();
        session.initialize(ul, lr).unwrap();
        session.render().unwrap();

        // zoom before the consumer ever drained
        session
            .initialize(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0))
            .unwrap();
        assert!(session.drain_and_swap().unwrap().is_empty());
        assert_eq!(session.pixel_color(12, 12), None);
    }

    #[test]
    fn pushes_from_a_superseded_render_are_dropped() {
        let (ul, lr) = the_standard_view();
        let session = Session::new(24, 24, 32).unwrap();
        session.initialize(ul, lr).unwrap();
        let region = session.stale_region();
        let old_epoch = session.current_epoch();

        session
            .initialize(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0))
            .unwrap();
        session.push_region(old_epoch, region);
        assert!(session.drain_and_swap().unwrap().is_empty());

        // the current epoch still accepts appends
        session.push_region(session.current_epoch(), region);
        assert_eq!(session.drain_and_swap().unwrap().len(), 1);
    }

    #[test]
    fn a_custom_palette_reaches_the_buffer() {
        fn stark(velocity: u32, limit: u32) -> Color {
            if velocity >= limit {
                0x111111
            } else {
                0xEEEEEE
            }
        }

        let (ul, lr) = the_standard_view();
        let session = Session::new(42, 42, 64).unwrap().with_palette(stark);
        session.initialize(ul, lr).unwrap();
        session.render().unwrap();
        assert_eq!(session.pixel_color(21, 21), Some(0x111111));
        assert_eq!(session.pixel_color(0, 0), Some(0xEEEEEE));
    }

    #[test]
    fn a_concurrent_consumer_receives_every_region_exactly_once() {
        let (ul, lr) = the_standard_view();
        let session = Session::new(96, 96, 64).unwrap();
        session.initialize(ul, lr).unwrap();

        let done = AtomicBool::new(false);
        let mut claimed = vec![0u8; 96 * 96];

        crossbeam::scope(|spawner| {
            let session = &session;
            let done = &done;
            spawner.spawn(move |_| {
                session.render().unwrap();
                done.store(true, Ordering::SeqCst);
            });

            loop {
                let finished = done.load(Ordering::SeqCst);
                let batch = session.drain_and_swap().unwrap();
                for region in &batch {
                    let r = region.rect;
                    for j in 0..r.height {
                        for i in 0..r.width {
                            claimed[((r.y + j) * 96 + r.x + i) as usize] += 1;
                        }
                    }
                }
                session.retire(batch);
                if finished {
                    break;
                }
            }
        })
        .unwrap();

        assert!(claimed.iter().all(|&c| c == 1));
    }
}
