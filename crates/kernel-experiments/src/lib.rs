//! Scripted experiment protocols that drive the entity kernel and return
//! structured reports. Every protocol is deterministic: the same plan
//! always yields the same report.

pub mod controls;
pub mod life;
