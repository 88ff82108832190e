//! Common library for the attendance tracker
//!
//! This crate provides shared functionality used by the authentication and
//! attendance services, including database connectivity, the token
//! revocation cache, password hashing, and the token claims both services
//! agree on.

pub mod cache;
pub mod claims;
pub mod database;
pub mod error;
pub mod keys;
pub mod password;
