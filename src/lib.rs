pub mod annotation;
pub mod annotator;
pub mod config;
pub mod consts;
pub mod generator;
pub mod lister;
pub mod logging;
pub mod prompts;
pub mod server;
