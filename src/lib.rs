pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod embrapa;
pub mod logging;
pub mod scraper;
pub mod state;
pub mod web;
