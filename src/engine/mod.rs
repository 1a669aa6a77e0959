pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod rendering;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the commonly used items
pub use backend::GlBackend;
pub use config::DemoConfig;
pub use error::{DemoError, DemoResult};
pub use rendering::RenderContext;
