//! Utility modules for validation and helper functions.

pub mod validation;
