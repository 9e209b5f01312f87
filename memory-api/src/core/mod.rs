pub mod auth;
pub mod categorizer;
pub mod chat_agent;
pub mod config;
pub mod state;
pub mod transcript;
