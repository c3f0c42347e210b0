pub mod auth;
pub mod config;
pub mod generate;
pub mod health;
pub mod options;
pub mod suggest;
