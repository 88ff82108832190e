//! API models for request and response payloads

use serde::Serialize;

pub mod attendance;
pub mod batch;
pub mod faculty;
pub mod student;

/// Success envelope: a human-readable message plus typed data
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}
