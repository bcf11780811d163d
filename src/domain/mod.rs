// Domain layer: models and ports (collaborator interfaces).

pub mod model;
pub mod ports;
