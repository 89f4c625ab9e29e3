pub mod binary;
pub mod command;
pub mod compile;
pub mod config;
pub mod error;
pub mod invocation;
