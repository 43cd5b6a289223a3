pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::RegistryConfig;
pub use crate::core::university::{University, DEFAULT_DATA_FILE};
pub use domain::model::{Course, CourseRef, Member, Person, PersonId, Student, StudentRef, Teacher, TeacherRef};
pub use utils::error::{RegistryError, Result};
pub use domain::ports::Storage;
