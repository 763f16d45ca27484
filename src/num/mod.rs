//! Numeric value types produced by the decoders

mod fraction;

pub use fraction::Fraction;
