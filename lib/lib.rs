pub mod api;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod state;
