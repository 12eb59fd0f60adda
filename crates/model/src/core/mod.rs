pub mod identifiers;
pub mod literal;
