//! HTTP request handlers

pub mod index;
pub mod logs;
pub mod recipes;
pub mod status;
