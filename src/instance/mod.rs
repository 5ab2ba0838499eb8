//! Instances hosted by runners.
//!
//! Instances live on a runner and are addressed by `(runner, name)`. The
//! host owns their lifecycle; this side only mirrors the reported status.

mod types;

pub use types::{Instance, InstanceRequest, InstanceStatus, InstanceType, VolkanicSource};
