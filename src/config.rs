//! Configuration schema and loader.
//!
//! Settings drive the startup scan, the engine's poll cadence and
//! end-of-track margin, and frontend behavior.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
