//! Application service layer - use cases, config, repositories

pub mod app;
pub mod config;
pub mod repository;
