pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod mapper;
pub mod models;
pub mod tmdb;
pub mod view_state;
