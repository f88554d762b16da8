//! Home media server: browse a music folder and stream its songs over HTTP.

pub mod cli;
pub mod config;
pub mod http;
pub mod media;
