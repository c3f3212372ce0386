pub mod config;
pub mod drive;
pub mod input;
pub mod messages;
pub mod runtime;
