// Infrastructure (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod telemetry;

// Capabilities owned by the host site
pub mod content;
pub mod directory;
pub mod mail;
pub mod seed;

// Domain (business logic)
pub mod audit;
pub mod auth;
pub mod notification;
pub mod template;

// Application layer
pub mod api;
pub mod server;
