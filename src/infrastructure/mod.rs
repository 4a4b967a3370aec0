//! Infrastructure layer
//!
//! Concrete bindings of the core logic to actual hardware and network
//! resources: pin setup, WiFi bootstrap and the long-running tasks.

pub mod drivers;
pub mod tasks;
