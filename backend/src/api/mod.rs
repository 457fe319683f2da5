//! API module
//!
//! Contains HTTP request handlers for the dashboard's query endpoints

pub mod concepts;
pub mod health;
pub mod sub_fields;
pub mod topics;
pub mod utils;
