//! Reusable value types shared across the schema

pub mod color;
pub mod field;
pub mod range;

pub use color::{Color, FloatColor, HexColor};
pub use field::{FieldKind, FieldRef, Maybe};
pub use range::OrderedRange;
