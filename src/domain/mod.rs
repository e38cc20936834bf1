// Domain layer - models and business rules, no I/O

pub mod model;
pub mod rules;
