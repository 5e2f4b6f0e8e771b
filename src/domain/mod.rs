// Domain layer: host-owned entities and the outbound API port.

pub mod model;
pub mod ports;
