pub mod cli;
pub mod config;
pub mod indexer;
pub mod model;
pub mod render;
pub mod util;
