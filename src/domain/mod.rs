// Domain layer: request models and the collaborator ports. No HTTP framework types here.

pub mod model;
pub mod ports;
