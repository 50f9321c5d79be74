// Domain layer: models and the persistence port. No I/O here.

pub mod model;
pub mod ports;
pub mod price;
