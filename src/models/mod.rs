pub mod enums;
pub mod grade;
pub mod student;

pub use grade::*;
pub use student::*;
