// Domain layer: records, intake drafts and the ports the core talks through.

pub mod model;
pub mod ports;
