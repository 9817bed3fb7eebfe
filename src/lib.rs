pub mod biome;
pub mod climate;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod progress;
pub mod rivers;
pub mod visibility;

pub use biome::{Biome, Terrain};
pub use config::GenerationConfig;
pub use error::{GenError, Result};
pub use generator::{generate, generate_with_progress};
pub use grid::{Tile, TileLookup, WorldGrid};
pub use progress::{Checkpoint, Unobserved};
pub use visibility::{sight_from, visible_tiles};
