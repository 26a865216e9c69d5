// Domain layer: canonical content models and ports (interfaces).

pub mod model;
pub mod ports;
