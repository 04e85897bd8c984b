//! Frame-scoped matrix pool
//!
//! Hands out 4x4 matrix buffers for the RTC caches without allocating in the
//! steady state.
//!
//! # Architecture
//!
//! ```text
//! buffers:  [ m0 ][ m1 ][ m2 ][ m3 ][ m4 ]
//!                             ^
//!                         next_free
//!           |--- in use ----|-- free ---|
//! ```
//!
//! `acquire` takes the buffer at the cursor (or appends a new one) and
//! advances. `rewind` moves the cursor back to zero at the start of a frame,
//! so the pool only ever grows to the largest number of buffers a single frame
//! asked for. Buffers are boxed so their addresses survive pool growth.

use crate::foundation::math::DMat4;

/// Index of a buffer inside a [`MatrixPool`]
pub type MatrixSlot = usize;

/// Growable pool of reusable matrix buffers with a next-free cursor
#[derive(Debug, Default)]
pub struct MatrixPool {
    /// Every buffer ever allocated, in slot order
    buffers: Vec<Box<DMat4>>,
    /// First slot not handed out this frame
    next_free: usize,
}

impl MatrixPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with `capacity` zeroed buffers already allocated
    pub fn with_capacity(capacity: usize) -> Self {
        let buffers = (0..capacity).map(|_| Box::new(DMat4::zeros())).collect();
        log::debug!("Created MatrixPool with {} preallocated buffers", capacity);

        Self {
            buffers,
            next_free: 0,
        }
    }

    /// Take the next free buffer for this frame
    ///
    /// The returned buffer is not aliased with any slot handed out since the
    /// last [`rewind`](Self::rewind). Its contents are whatever an earlier
    /// frame left there; callers overwrite it completely.
    pub fn acquire(&mut self) -> (MatrixSlot, &mut DMat4) {
        let slot = self.next_free;
        if slot == self.buffers.len() {
            self.buffers.push(Box::new(DMat4::zeros()));
            log::trace!("MatrixPool grew to {} buffers", self.buffers.len());
        }
        self.next_free += 1;

        (slot, &mut *self.buffers[slot])
    }

    /// Make every buffer available again
    ///
    /// Slots handed out before the rewind must no longer be read.
    pub fn rewind(&mut self) {
        self.next_free = 0;
    }

    /// Buffer stored in `slot`, if it has been allocated
    pub fn get(&self, slot: MatrixSlot) -> Option<&DMat4> {
        self.buffers.get(slot).map(|buffer| &**buffer)
    }

    /// Buffer stored in a slot this pool handed out
    pub(crate) fn buffer(&self, slot: MatrixSlot) -> &DMat4 {
        &self.buffers[slot]
    }

    /// Number of buffers allocated over the pool's lifetime (the high-water mark)
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// True if no buffer was ever allocated
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Number of buffers handed out since the last rewind
    pub fn in_use(&self) -> usize {
        self.next_free
    }

    /// Number of allocated buffers still free this frame
    pub fn available(&self) -> usize {
        self.buffers.len() - self.next_free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_grows_pool() {
        let mut pool = MatrixPool::new();

        let (first, _) = pool.acquire();
        let (second, _) = pool.acquire();

        assert_eq!((first, second), (0, 1));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_new_buffers_are_zeroed() {
        let mut pool = MatrixPool::new();
        let (_, matrix) = pool.acquire();

        assert_eq!(*matrix, DMat4::zeros());
    }

    #[test]
    fn test_rewind_reuses_buffers_without_allocating() {
        let mut pool = MatrixPool::new();
        let first_address = {
            let (_, matrix) = pool.acquire();
            *matrix = DMat4::identity();
            std::ptr::from_ref::<DMat4>(matrix)
        };
        pool.acquire();

        pool.rewind();
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.available(), 2);

        let (slot, matrix) = pool.acquire();
        assert_eq!(slot, 0);
        assert_eq!(std::ptr::from_ref::<DMat4>(matrix), first_address);
        assert_eq!(*matrix, DMat4::identity());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pool_tracks_high_water_mark() {
        let mut pool = MatrixPool::new();

        for per_frame in [3, 7, 2, 7, 5] {
            pool.rewind();
            for _ in 0..per_frame {
                pool.acquire();
            }
        }

        assert_eq!(pool.len(), 7);
    }

    #[test]
    fn test_addresses_stable_across_growth() {
        let mut pool = MatrixPool::with_capacity(1);
        let (_, first) = pool.acquire();
        let first_address = std::ptr::from_ref::<DMat4>(first);

        for _ in 0..64 {
            pool.acquire();
        }

        let stored = pool.get(0).map(std::ptr::from_ref);
        assert_eq!(stored, Some(first_address));
    }

    #[test]
    fn test_with_capacity_preallocates() {
        let mut pool = MatrixPool::with_capacity(4);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.in_use(), 0);

        pool.acquire();
        assert_eq!(pool.len(), 4);
        assert!(pool.get(3).is_some());
        assert!(pool.get(4).is_none());
    }
}
