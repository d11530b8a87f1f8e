//! Core translation engine module

pub mod client;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod models;
pub mod response;
pub mod retry;
pub mod segment;
pub mod transport;
