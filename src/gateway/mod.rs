//! Gateway module - request orchestration across backends

pub mod background_removal;

pub use background_removal::{BackgroundRemoval, RemovalSource};
