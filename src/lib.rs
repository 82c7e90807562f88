pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod format;
pub mod model;
pub mod output;
pub mod parser;
pub mod stats;
