//! Conversation persistence port and the message-handling service.

pub mod repository;
pub mod service;
