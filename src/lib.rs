//! Infinite deterministic tile world
//!
//! Every tile is a pure function of its coordinate and the world seed.
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod cache;
pub mod config;
pub mod coords;
pub mod explorer;
pub mod export;
pub mod frame;
pub mod rng;
pub mod terrain;
pub mod tile;
pub mod tilemap;
pub mod viewport;
