//! The double-buffered hand-off between the renderer and the display
//! consumer: two sequences, one being filled while the other is being
//! shown.  This type is just the pair-and-swap mechanics; the session
//! supplies the single lock that guards it, so that both the append
//! and the swap stay O(1) critical sections.

use std::mem;

/// Two role-swapping sequences.  The renderer appends finished work to
/// the production side; the consumer trades it for the standby side in
/// one swap and walks the batch at its leisure.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    production: Vec<T>,
    standby: Vec<T>,
}

impl<T> DoubleBuffered<T> {
    /// Two empty sequences.
    pub fn new() -> DoubleBuffered<T> {
        DoubleBuffered {
            production: Vec::new(),
            standby: Vec::new(),
        }
    }

    /// Append to the production sequence.
    pub fn push(&mut self, item: T) {
        self.production.push(item);
    }

    /// How many items are waiting to be drained.
    pub fn pending(&self) -> usize {
        self.production.len()
    }

    /// Exchange the roles of the two sequences and hand the filled one
    /// to the caller.  The production side is left as the (empty)
    /// former standby, ready for more appends.  Give the batch back
    /// through `retire` once it has been consumed so its allocation
    /// keeps cycling.
    pub fn drain_and_swap(&mut self) -> Vec<T> {
        mem::swap(&mut self.production, &mut self.standby);
        mem::replace(&mut self.standby, Vec::new())
    }

    /// Return a consumed batch as the new standby sequence.
    pub fn retire(&mut self, mut spent: Vec<T>) {
        spent.clear();
        self.standby = spent;
    }

    /// Drop everything in both sequences.
    pub fn clear(&mut self) {
        self.production.clear();
        self.standby.clear();
    }
}
