//! Active-priority bitmap for fast skip-scanning
//!
//! One bit per priority level, set iff at least one CPU is filed at that
//! level. The bitmap is a derived cache over the per-level vectors: bits
//! are flipped only inside the owning vector's critical section, but the
//! words are atomic because adjacent levels guarded by different locks
//! share a word, and because `find` reads the bitmap without taking any
//! lock. Bit 0 of word 0 is level 0 (IDLE), with levels increasing toward
//! higher significance so an ascending scan uses CTZ.

use portable_atomic::{AtomicU32, Ordering};

use crate::config::CFG_PRIO_LEVELS;
use crate::types::Prio;

/// Number of words needed for the priority bitmap
const PRIO_TBL_SIZE: usize = (CFG_PRIO_LEVELS + 31) / 32;

/// Priority bitmap table
pub struct PrioTable {
    bitmap: [AtomicU32; PRIO_TBL_SIZE],
}

impl PrioTable {
    pub const fn new() -> Self {
        PrioTable {
            bitmap: [const { AtomicU32::new(0) }; PRIO_TBL_SIZE],
        }
    }

    /// Mark a priority level as active
    #[inline]
    pub fn insert(&self, prio: Prio) {
        debug_assert!((prio as usize) < CFG_PRIO_LEVELS);

        let word_idx = (prio / 32) as usize;
        let bit_pos = prio % 32;

        self.bitmap[word_idx].fetch_or(1 << bit_pos, Ordering::Release);
    }

    /// Mark a priority level as inactive
    #[inline]
    pub fn remove(&self, prio: Prio) {
        debug_assert!((prio as usize) < CFG_PRIO_LEVELS);

        let word_idx = (prio / 32) as usize;
        let bit_pos = prio % 32;

        self.bitmap[word_idx].fetch_and(!(1 << bit_pos), Ordering::Release);
    }

    /// Check if a specific level is active
    #[inline]
    pub fn is_set(&self, prio: Prio) -> bool {
        let word_idx = (prio / 32) as usize;
        let bit_pos = prio % 32;

        (self.bitmap[word_idx].load(Ordering::Acquire) & (1 << bit_pos)) != 0
    }

    /// Lowest active level in `[from, limit)`, skipping empty words
    ///
    /// Lock-free snapshot read; a level returned here may already have
    /// gone inactive by the time the caller looks at its vector.
    pub fn next_set_from(&self, from: Prio, limit: Prio) -> Option<Prio> {
        let limit = limit as usize;
        let mut idx = from as usize;

        while idx < limit {
            let word_idx = idx / 32;
            let word = self.bitmap[word_idx].load(Ordering::Acquire);
            let word = word & (!0u32 << (idx % 32));

            if word != 0 {
                let level = word_idx * 32 + word.trailing_zeros() as usize;
                if level < limit {
                    return Some(level as Prio);
                }
                return None;
            }

            idx = (word_idx + 1) * 32;
        }

        None
    }

    /// Check if no level is active
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmap.iter().all(|w| w.load(Ordering::Acquire) == 0)
    }
}

impl Default for PrioTable {
    fn default() -> Self {
        Self::new()
    }
}
