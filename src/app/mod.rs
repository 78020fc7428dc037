//! Application core: pure domain logic, zero I/O.
//!
//! Gesture routing, relay state and flash sequencing for the single-button
//! relay controller. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! with a synthetic clock.

pub mod commands;
pub mod events;
pub mod flash;
pub mod ports;
pub mod relay;
pub mod remote;
pub mod router;
pub mod service;
