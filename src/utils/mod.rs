//! Utility functions shared by the server and the admin CLI.
//!
//! - [`token`] - API token generation

pub mod token;
