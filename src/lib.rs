// Library surface shared by the binary and the integration tests

pub mod config;
pub mod constants;
pub mod display;
pub mod events;
pub mod models;
pub mod player;
pub mod services;
