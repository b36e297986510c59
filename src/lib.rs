pub mod config;
pub mod controllers;
pub mod dispatch;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reporting;
pub mod services;
pub mod state;
pub mod utils;
