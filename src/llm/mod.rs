//! Clients for the hosted models behind the AI features.

pub mod chat;
pub mod vision;
