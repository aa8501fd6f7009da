//! Error types for the CPU-priority tracker
//!
//! Uses Rust's Result pattern; every variant is a construction-time
//! contract violation, since the tracker has no runtime failure modes.

/// Tracker error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedError {
    /// CPU count is zero or exceeds `CFG_CPU_MAX`
    CpuCountInvalid = 1,
    /// Level count leaves no realtime range or exceeds `CFG_PRIO_LEVELS`
    PrioCountInvalid = 2,
}

/// Result type alias for tracker operations
pub type SchedResult<T> = Result<T, SchedError>;
