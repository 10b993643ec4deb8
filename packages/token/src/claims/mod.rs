//! Claim values and claim sets

pub mod set;
pub mod value;

pub use set::ClaimSet;
pub use value::{ClaimValue, FieldType};
