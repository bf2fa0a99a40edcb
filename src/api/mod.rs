//! HTTP API layer: handlers, middleware and DTOs around the dispatch engine.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
mod doc;
