//! Shared data models

pub mod role;

pub use role::Role;
