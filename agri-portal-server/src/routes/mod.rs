//! Route handlers

pub mod chat;
pub mod health;
pub mod services;
pub mod static_files;
