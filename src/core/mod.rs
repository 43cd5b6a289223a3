pub mod document;
pub mod university;

pub use crate::domain::model::{Course, CourseRef, Member, Person, Student, StudentRef, Teacher, TeacherRef};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
