//! pipeline/mod.rs
//! Entry compression driver: configuration in, outcome out.

pub mod compress;
pub mod config;
pub mod outcome;

pub use compress::*;
pub use config::*;
pub use outcome::*;
