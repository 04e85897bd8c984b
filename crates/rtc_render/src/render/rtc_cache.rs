//! Relative-to-center view matrix cache
//!
//! Geometry far from the world origin is stored relative to a nearby RTC
//! origin. Every origin needs its own re-based view matrix, and many batches
//! share an origin, so the matrices are computed once per origin per frame and
//! memoized here. Ordinary and pick views are cached separately because the
//! pick viewpoint can differ from the camera.
//!
//! Entries live until [`RtcViewCache::clear`], which the frame context calls at
//! the start of every frame.

use std::collections::HashMap;

use crate::foundation::math::{create_rtc_view_mat, DMat4, DVec3};
use super::matrix_pool::{MatrixPool, MatrixSlot};

/// Stable key identifying an RTC origin
///
/// Built from the exact bit pattern of the origin, so two origins share a key
/// only if they are bit-for-bit identical. Hosts that already carry their own
/// origin ids can use [`OriginHash::from_raw`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginHash(OriginKey);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OriginKey {
    Bits([u64; 3]),
    Raw(u64),
}

impl OriginHash {
    /// Key derived from the origin's components
    pub fn from_origin(origin: &DVec3) -> Self {
        Self(OriginKey::Bits(origin_bits(origin)))
    }

    /// Caller-assigned key
    pub const fn from_raw(id: u64) -> Self {
        Self(OriginKey::Raw(id))
    }
}

impl From<&DVec3> for OriginHash {
    fn from(origin: &DVec3) -> Self {
        Self::from_origin(origin)
    }
}

fn origin_bits(origin: &DVec3) -> [u64; 3] {
    [origin.x.to_bits(), origin.y.to_bits(), origin.z.to_bits()]
}

#[derive(Debug, Clone, Copy)]
struct CachedMatrix {
    slot: MatrixSlot,
    origin: [u64; 3],
}

/// Per-frame cache of RTC view and pick-view matrices
#[derive(Debug, Default)]
pub struct RtcViewCache {
    pool: MatrixPool,
    view: HashMap<OriginHash, CachedMatrix>,
    pick_view: HashMap<OriginHash, CachedMatrix>,
}

impl RtcViewCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose pool and maps can hold `capacity` origins per
    /// frame without allocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: MatrixPool::with_capacity(capacity),
            view: HashMap::with_capacity(capacity),
            pick_view: HashMap::with_capacity(capacity),
        }
    }

    /// Drop every entry and rewind the pool
    ///
    /// Map capacity and pool buffers are kept for the next frame.
    pub fn clear(&mut self) {
        self.view.clear();
        self.pick_view.clear();
        self.pool.rewind();
    }

    /// RTC view matrix for `origin`, re-based from `view`
    ///
    /// `view` is only read on a miss; within one frame the caller must pass the
    /// same base matrix for every lookup.
    pub fn view_matrix(&mut self, view: &DMat4, hash: OriginHash, origin: &DVec3) -> &DMat4 {
        lookup(&mut self.pool, &mut self.view, view, hash, origin)
    }

    /// RTC pick-view matrix for `origin`, re-based from `pick_view`
    pub fn pick_view_matrix(&mut self, pick_view: &DMat4, hash: OriginHash, origin: &DVec3) -> &DMat4 {
        lookup(&mut self.pool, &mut self.pick_view, pick_view, hash, origin)
    }

    /// Number of view matrices cached this frame
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Number of pick-view matrices cached this frame
    pub fn pick_view_len(&self) -> usize {
        self.pick_view.len()
    }

    /// The backing matrix pool
    pub fn pool(&self) -> &MatrixPool {
        &self.pool
    }
}

fn lookup<'a>(
    pool: &'a mut MatrixPool,
    cache: &mut HashMap<OriginHash, CachedMatrix>,
    base: &DMat4,
    hash: OriginHash,
    origin: &DVec3,
) -> &'a DMat4 {
    let cached = *cache.entry(hash).or_insert_with(|| {
        let (slot, matrix) = pool.acquire();
        create_rtc_view_mat(base, origin, matrix);
        CachedMatrix {
            slot,
            origin: origin_bits(origin),
        }
    });

    debug_assert!(
        cached.origin == origin_bits(origin),
        "origin hash {hash:?} requested for {origin:?} but cached for a different origin"
    );

    pool.buffer(cached.slot)
}
