pub mod app;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod export;
pub mod models;
pub mod utils;
