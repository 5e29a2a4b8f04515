pub mod args;
pub mod handlers;

pub use args::{Cli, Commands};
pub use handlers::CliHandler;
