//! Repositories for credential lookups

pub mod faculty;
pub mod student;

pub use faculty::FacultyRepository;
pub use student::StudentRepository;
