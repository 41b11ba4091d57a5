mod context;
mod output;
pub mod utils;

pub use context::CliContext;
pub use output::render;
