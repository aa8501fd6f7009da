//! CPU-priority tracker for realtime multicore scheduling
//!
//! A priority → CPU-set index providing:
//! - Better-than-linear migration-target search for realtime tasks
//! - Per-level locking so concurrent updates from different CPUs never
//!   contend on unrelated levels
//! - A lock-free active-priority bitmap for cheap skip-scanning
//! - Fixed-size tables, no allocation, `no_std`

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Modules ============

pub mod log;

pub mod core;

// ============ Re-exports ============

pub use crate::core::config;
pub use crate::core::config::*;
pub use crate::core::cpumask;
pub use crate::core::cpumask::CpuMask;
pub use crate::core::error;
pub use crate::core::error::{SchedError, SchedResult};
pub use crate::core::prio;
pub use crate::core::prio::PrioTable;
pub use crate::core::sched;
pub use crate::core::sched::CpuPri;
pub use crate::core::types;
pub use crate::core::types::*;
