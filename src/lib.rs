pub mod calendar;
pub mod config;
pub mod error;
pub mod generation;
pub mod list;
pub mod models;
pub mod openapi;
pub mod platforms;
pub mod repo;
pub mod routes;
pub mod security;
pub mod seed;
pub mod transitions; // status transition table / reschedule policy

// Re-export commonly used items for tests / external users
pub use config::AppConfig;
pub use repo::inmem::InMemPostStore;
pub use routes::AppState;
pub use security::SecurityHeaders;
