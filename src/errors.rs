//! The errors a render session can report.  Everything the evaluator
//! and the subdivision recursion do is total over valid inputs, so the
//! taxonomy is short: bad geometry at configuration time, arithmetic
//! that has no answer, and the two ways a session can be misused.

/// Errors reported by the renderer and its supporting arithmetic.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The multiplicative inverse of zero was requested.  Never
    /// silently coerced to NaN; the caller asked a question with no
    /// answer and is told so.
    #[fail(display = "complex zero has no multiplicative inverse")]
    DivisionByZero,

    /// A pixel grid with a zero dimension was requested at configure
    /// or initialize time.  Fatal to that call.
    #[fail(display = "invalid geometry: {}x{} pixel grid", width, height)]
    InvalidGeometry {
        /// Requested pixel columns.
        width: u32,
        /// Requested pixel rows.
        height: u32,
    },

    /// `render` was called before `initialize` installed a viewport.
    #[fail(display = "render session was never initialized")]
    Uninitialized,

    /// The display consumer's wait on the region queue was interrupted.
    /// Recovered locally with a full repaint, never treated as a
    /// rendering failure.
    #[fail(display = "interrupted while waiting on the region queue")]
    Interrupted,
}
