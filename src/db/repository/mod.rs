//! Repository layer: entity-scoped database operations.

mod grade;
mod student;

pub use grade::*;
pub use student::*;
