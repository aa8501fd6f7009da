//! Core type definitions for the CPU-priority tracker
//!
//! These types provide strong typing for CPU ids and priority levels.

use crate::config::CFG_PRIO_LEVELS;

/// CPU identifier (dense index, `0..n_cpus`)
pub type CpuId = usize;

/// Internal priority level (0 = least urgent)
pub type Prio = u8;

/// Native realtime priority (0 = most urgent, per the usual convention)
pub type RtPrio = u8;

/// Level for a CPU running nothing
pub const PRIO_IDLE: Prio = 0;

/// Level for a CPU running a non-realtime task
pub const PRIO_NORMAL: Prio = 1;

/// First realtime level; realtime levels occupy `[PRIO_RT_BASE, n_levels)`
pub const PRIO_RT_BASE: Prio = 2;

/// Sentinel for a CPU that is not tracked (offline or not yet onlined)
pub const PRIO_INVALID: Prio = u8::MAX;

const _: () = assert!(CFG_PRIO_LEVELS < PRIO_INVALID as usize);

/// Priority of the work a CPU is running, in the scheduler's own terms
///
/// Internal levels ascend with urgency while native realtime priorities
/// descend, so the two conventions meet only here. Keeping the mapping in
/// one explicitly-tested place lets the host scheduler's convention change
/// without touching the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPrio {
    /// No task running
    Idle,
    /// Non-realtime task running
    Normal,
    /// Realtime task at the given native priority
    Rt(RtPrio),
}

impl TaskPrio {
    /// Convert to the internal level for a tracker with `n_levels` levels
    ///
    /// Native priority 0 (most urgent) maps to the top level
    /// `n_levels - 1`; the least urgent native priority maps to
    /// [`PRIO_RT_BASE`].
    #[inline]
    pub fn level_for(self, n_levels: usize) -> Prio {
        match self {
            TaskPrio::Idle => PRIO_IDLE,
            TaskPrio::Normal => PRIO_NORMAL,
            TaskPrio::Rt(rt) => {
                debug_assert!((rt as usize) < n_levels - PRIO_RT_BASE as usize);
                (n_levels - 1 - rt as usize) as Prio
            }
        }
    }
}
