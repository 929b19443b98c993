// Library exports for the binary and tests
pub mod config;
pub mod conversation;
pub mod logging;
pub mod message;
pub mod partition;
pub mod person;
pub mod renderer;
pub mod report;
pub mod source;
pub mod stats;
pub mod stats_builder;
pub mod timefmt;
