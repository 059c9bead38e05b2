//! HTTP routes

pub mod prompts;
