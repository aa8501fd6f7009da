//! CPU-priority tracker
//!
//! Maintains, for every priority level, the set of CPUs currently running
//! work at that level, so the realtime scheduler can answer "which CPUs,
//! among those this task may use, are doing something less urgent?"
//! without walking every CPU.
//!
//! Three cooperating parts:
//! - one lockable vector per level holding a count and a CPU mask,
//! - the active-priority bitmap ([`PrioTable`]) mirroring which vectors
//!   are non-empty, for lock-free skip-scanning,
//! - a per-CPU reverse index giving the level each CPU is filed under.
//!
//! Every CPU updates its own entry concurrently with all others; only the
//! vector being touched is ever locked, never the tracker as a whole.

use core::fmt;

use portable_atomic::{AtomicU8, Ordering};
use spin::Mutex;

use crate::config::{CFG_CPU_MAX, CFG_PRIO_LEVELS};
use crate::cpumask::CpuMask;
use crate::error::{SchedError, SchedResult};
use crate::prio::PrioTable;
use crate::trace;
use crate::types::{CpuId, Prio, TaskPrio, PRIO_IDLE, PRIO_INVALID, PRIO_RT_BASE};

/// Per-level record of the CPUs currently filed at that level
struct PrioVec {
    inner: Mutex<PrioVecInner>,
}

struct PrioVecInner {
    count: usize,
    cpus: CpuMask,
}

impl PrioVec {
    const fn new() -> Self {
        PrioVec {
            inner: Mutex::new(PrioVecInner {
                count: 0,
                cpus: CpuMask::new(),
            }),
        }
    }
}

/// CPU-priority tracker
///
/// Create one instance at scheduler startup and share it by reference
/// with every CPU context; all methods take `&self`.
pub struct CpuPri {
    vec: [PrioVec; CFG_PRIO_LEVELS],
    tbl: PrioTable,
    cpu_to_pri: [AtomicU8; CFG_CPU_MAX],
    n_cpus: usize,
    n_levels: usize,
}

impl CpuPri {
    /// Create a tracker for `n_cpus` CPUs and `n_levels` priority levels
    ///
    /// Levels are `0` (IDLE), `1` (NORMAL) and the realtime range
    /// `[2, n_levels)`, most urgent last. Every CPU starts filed at IDLE.
    ///
    /// # Returns
    /// * `Err(SchedError::CpuCountInvalid)` - `n_cpus` is zero or exceeds
    ///   [`CFG_CPU_MAX`]
    /// * `Err(SchedError::PrioCountInvalid)` - `n_levels` leaves no
    ///   realtime level or exceeds [`CFG_PRIO_LEVELS`]
    pub fn new(n_cpus: usize, n_levels: usize) -> SchedResult<CpuPri> {
        if n_cpus == 0 || n_cpus > CFG_CPU_MAX {
            return Err(SchedError::CpuCountInvalid);
        }
        if n_levels <= PRIO_RT_BASE as usize || n_levels > CFG_PRIO_LEVELS {
            return Err(SchedError::PrioCountInvalid);
        }

        let cp = CpuPri {
            vec: [const { PrioVec::new() }; CFG_PRIO_LEVELS],
            tbl: PrioTable::new(),
            cpu_to_pri: [const { AtomicU8::new(PRIO_INVALID) }; CFG_CPU_MAX],
            n_cpus,
            n_levels,
        };

        for cpu in 0..n_cpus {
            cp.set_level(cpu, PRIO_IDLE);
        }

        Ok(cp)
    }

    /// Number of CPUs this tracker indexes
    #[inline]
    pub fn n_cpus(&self) -> usize {
        self.n_cpus
    }

    /// Number of priority levels, IDLE and NORMAL included
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Record that `cpu` is now running work at `new_level`
    ///
    /// Idempotent, never fails, and safe to call concurrently with `set`
    /// for other CPUs and with any number of [`find`](Self::find) calls.
    /// Calls for the same CPU must come from that CPU's own scheduling
    /// path, which orders them.
    pub fn set(&self, cpu: CpuId, new_level: Prio) {
        debug_assert!(cpu < self.n_cpus);
        debug_assert!((new_level as usize) < self.n_levels);

        self.set_level(cpu, new_level);
    }

    /// [`set`](Self::set) taking the scheduler's own priority terms
    pub fn set_task(&self, cpu: CpuId, prio: TaskPrio) {
        self.set(cpu, prio.level_for(self.n_levels));
    }

    /// File a newly-onlined CPU at IDLE
    pub fn cpu_online(&self, cpu: CpuId) {
        debug_assert!(cpu < self.n_cpus);

        self.set_level(cpu, PRIO_IDLE);
    }

    /// Retire an offlined CPU from the tracker
    ///
    /// The CPU leaves its vector and can no longer appear in a
    /// [`find`](Self::find) result until it is onlined again.
    pub fn cpu_offline(&self, cpu: CpuId) {
        debug_assert!(cpu < self.n_cpus);

        self.set_level(cpu, PRIO_INVALID);
    }

    fn set_level(&self, cpu: CpuId, new_level: Prio) {
        let old_level = self.cpu_to_pri[cpu].load(Ordering::Acquire);

        if old_level == new_level {
            return;
        }

        trace!("cpupri: cpu {} level {} -> {}", cpu, old_level, new_level);

        // Insert before removing so the CPU is never absent from every
        // vector at once; a concurrent find may briefly see it at both
        // levels, which is harmless. Only one vector lock is held at a
        // time.
        if new_level != PRIO_INVALID {
            let mut vec = self.vec[new_level as usize].inner.lock();

            vec.cpus.set(cpu);
            vec.count += 1;
            if vec.count == 1 {
                self.tbl.insert(new_level);
            }

            debug_assert_eq!(vec.count, vec.cpus.weight());
        }

        if old_level != PRIO_INVALID {
            let mut vec = self.vec[old_level as usize].inner.lock();

            vec.cpus.clear(cpu);
            vec.count -= 1;
            if vec.count == 0 {
                self.tbl.remove(old_level);
            }

            debug_assert_eq!(vec.count, vec.cpus.weight());
        }

        self.cpu_to_pri[cpu].store(new_level, Ordering::Release);
    }

    /// Find the CPUs in `allowed` running work less urgent than `task_prio`
    ///
    /// Scans active levels in ascending order, so idle CPUs are preferred
    /// over busy ones and the least urgent running work is displaced
    /// first. Returns the full candidate mask at the first qualifying
    /// level, or `None` when every CPU in `allowed` is at `task_prio` or
    /// above.
    ///
    /// The result is advisory: a concurrent [`set`](Self::set) may have
    /// moved a returned CPU already, so the caller must re-validate its
    /// choice before acting on it.
    pub fn find(&self, task_prio: Prio, allowed: &CpuMask) -> Option<CpuMask> {
        self.find_fitness(task_prio, allowed, |_| true)
    }

    /// [`find`](Self::find) with a per-CPU suitability filter
    ///
    /// CPUs failing `fitness` are dropped from each level's candidates;
    /// if none survive at a level the scan continues upward, so an unfit
    /// idle CPU does not hide a fit busy one.
    pub fn find_fitness<F>(&self, task_prio: Prio, allowed: &CpuMask, fitness: F) -> Option<CpuMask>
    where
        F: Fn(CpuId) -> bool,
    {
        debug_assert!(task_prio >= PRIO_RT_BASE);
        debug_assert!((task_prio as usize) < self.n_levels);

        if allowed.is_empty() {
            return None;
        }

        let mut level = self.tbl.next_set_from(PRIO_IDLE, task_prio);
        while let Some(l) = level {
            // Hold the vector lock only to copy the mask out.
            let cpus = self.vec[l as usize].inner.lock().cpus;
            let candidate = cpus.and(allowed);

            if !candidate.is_empty() {
                let mut lowest_mask = CpuMask::new();
                for cpu in candidate.iter() {
                    if fitness(cpu) {
                        lowest_mask.set(cpu);
                    }
                }
                if !lowest_mask.is_empty() {
                    return Some(lowest_mask);
                }
            }

            level = self.tbl.next_set_from(l + 1, task_prio);
        }

        None
    }

    // ============ Introspection ============

    /// Level `cpu` is currently filed under, or [`PRIO_INVALID`]
    #[inline]
    pub fn level_of(&self, cpu: CpuId) -> Prio {
        debug_assert!(cpu < self.n_cpus);

        self.cpu_to_pri[cpu].load(Ordering::Acquire)
    }

    /// Whether any CPU is filed at `level`
    #[inline]
    pub fn is_active(&self, level: Prio) -> bool {
        debug_assert!((level as usize) < self.n_levels);

        self.tbl.is_set(level)
    }

    /// Number of CPUs filed at `level`
    pub fn count_at(&self, level: Prio) -> usize {
        debug_assert!((level as usize) < self.n_levels);

        self.vec[level as usize].inner.lock().count
    }

    /// Snapshot of the CPUs filed at `level`
    pub fn cpus_at(&self, level: Prio) -> CpuMask {
        debug_assert!((level as usize) < self.n_levels);

        self.vec[level as usize].inner.lock().cpus
    }
}

impl fmt::Debug for CpuPri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuPri")
            .field("n_cpus", &self.n_cpus)
            .field("n_levels", &self.n_levels)
            .finish_non_exhaustive()
    }
}
