// State management module
// Holds the configuration and dataset store shared by all handlers

pub mod app_state;

pub use app_state::AppState;
