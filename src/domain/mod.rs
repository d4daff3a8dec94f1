// Domain layer: core models, policies and ports. No I/O here.

pub mod model;
pub mod policy;
pub mod ports;
pub mod progress;
