pub mod app_state;
pub mod catalog;
pub mod http;
pub mod server_config;
