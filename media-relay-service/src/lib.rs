//! media-relay-service: downloads remote media and relays it, with a prompt,
//! to a multimodal inference provider.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
