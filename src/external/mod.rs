//! Clients for third-party services

pub mod client;
pub mod webhook;
