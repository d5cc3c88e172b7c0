// Domain layer: models and ports. Adapters in `crate::adapters` implement the ports.

pub mod model;
pub mod ports;
