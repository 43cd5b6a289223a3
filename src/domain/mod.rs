// Domain layer: people, courses and the persistence port. No IO here.

pub mod model;
pub mod ports;
