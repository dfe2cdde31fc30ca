pub mod app;
pub mod channels;
pub mod config;
pub mod display;
pub mod fetch;
pub mod humanize;
pub mod input;
pub mod observability;
pub mod selector;
pub mod session;
pub mod settings;
pub mod target;
pub mod worker;
