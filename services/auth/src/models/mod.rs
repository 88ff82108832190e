//! Authentication service models

pub mod account;
pub mod faculty;

// Re-export for convenience
pub use account::{Account, StudentAccount};
pub use faculty::{Faculty, FacultySignup, LoginCredentials};
