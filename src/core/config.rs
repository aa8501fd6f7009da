//! Compile-time configuration for the CPU-priority tracker
//!
//! These constants bound the fixed-size internal tables. Runtime CPU and
//! level counts are chosen at construction, within these limits.

/// Maximum number of CPUs the tracker can index
pub const CFG_CPU_MAX: usize = 64;

/// Number of distinct realtime priority levels
pub const CFG_RT_PRIO_MAX: usize = 100;

/// Total priority levels: IDLE + NORMAL + the realtime range
pub const CFG_PRIO_LEVELS: usize = CFG_RT_PRIO_MAX + 2;
