//! Value types for proxylint conditions

pub mod value;

pub use value::{LiteralType, Value};
