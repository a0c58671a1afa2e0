//! Simulation systems
//!
//! The reference composition registers these in a fixed order: cursor field,
//! gate rotation, locking, integration. Order matters - locks emitted in a
//! tick are integrated in the same tick.

pub mod cursor_field;
pub mod gate_rotation;
pub mod integration;
pub mod locking;

pub use cursor_field::{CursorField, CursorFieldSystem};
pub use gate_rotation::{angle_in_window, normalize_angle, GateRotationSystem};
pub use integration::IntegrationSystem;
pub use locking::LockingSystem;
