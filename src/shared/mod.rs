pub mod validations;

pub use validations::*;
