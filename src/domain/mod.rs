// Domain layer: marketplace records, match models and ports (interfaces).

pub mod model;
pub mod ports;
pub mod records;
