pub mod args;
pub mod build;
pub mod query;
pub mod render;

pub use args::{Cli, Commands};
