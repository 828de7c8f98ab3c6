// Domain layer: records, the probability accumulator and the ports the core talks through.

pub mod model;
pub mod ports;
pub mod probability;
