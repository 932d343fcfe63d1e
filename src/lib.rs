// Library surface shared by the `second_eig` binary and the integration tests.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
