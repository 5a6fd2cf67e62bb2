pub mod engine;
pub mod error;
pub mod loader;
pub mod output;
