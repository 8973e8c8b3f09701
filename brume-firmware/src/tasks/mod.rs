//! Firmware tasks
//!
//! There is exactly one: the fixed-period control task. It owns every
//! peripheral and all control state, so nothing here needs locking.

mod control;

pub use control::{control_task, ControlContext};
