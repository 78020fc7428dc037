//! Pin-level drivers and the task watchdog.

pub mod button;
pub mod relay;
pub mod watchdog;
