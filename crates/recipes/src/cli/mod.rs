//! Thin command-line client for a running recipes server

pub mod client;
pub mod commands;
pub mod display;
