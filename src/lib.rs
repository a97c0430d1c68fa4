pub mod api_client;
pub mod commands;
pub mod config;
pub mod data;
pub mod search_filter;
pub mod shell;
pub mod state;
pub mod table_display;
pub mod utils;
