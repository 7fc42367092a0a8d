//! Gateway request handlers

pub mod content;
pub mod service;

pub use content::*;
pub use service::*;
