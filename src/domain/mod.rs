// Domain layer: identifiers, request/response models and ports. Nothing here
// performs I/O.

pub mod identifiers;
pub mod model;
pub mod ports;
