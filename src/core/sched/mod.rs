//! Scheduler-support module
//!
//! Home of the CPU-priority tracker the realtime scheduler consults when
//! a newly-runnable task needs a migration target.

mod cpupri;

pub use cpupri::CpuPri;
