use serde::{Deserialize, Serialize};

pub use board::*;
pub use cache::*;
pub use error::*;
pub use generator::*;
pub use luck::*;
pub use memento::{Memento, MementoStore};
pub use persist::*;
pub use player::*;
pub use session::*;
pub use types::*;

mod board;
mod cache;
mod error;
mod generator;
mod luck;
pub mod memento;
mod persist;
mod player;
mod session;
mod types;

/// Gameplay constants, fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Edge length of one cell in degrees.
    pub tile_degrees: f64,
    /// Cells visible around the player on each axis.
    pub neighborhood_radius: u32,
    /// Chance in `[0, 1]` that a cell holds a cache.
    pub spawn_probability: f64,
    /// Scale applied to a cell's luck to get its starting coin count.
    pub coin_scale: u32,
    pub zoom: u8,
    /// Point where cell `(0, 0)` starts, and where the player spawns.
    pub origin: LatLng,
}

impl GameConfig {
    pub const CLASSROOM: LatLng = LatLng::new(36.98949379578401, -122.06277128548504);

    pub const fn classroom() -> Self {
        Self {
            tile_degrees: 1e-4,
            neighborhood_radius: 8,
            spawn_probability: 0.1,
            coin_scale: 100,
            zoom: 19,
            origin: Self::CLASSROOM,
        }
    }

    pub fn new(
        tile_degrees: f64,
        neighborhood_radius: u32,
        spawn_probability: f64,
        coin_scale: u32,
        zoom: u8,
        origin: LatLng,
    ) -> Self {
        let tile_degrees = if tile_degrees.is_finite() && tile_degrees > 0.0 {
            tile_degrees
        } else {
            log::warn!("Invalid tile size {}, using default", tile_degrees);
            Self::classroom().tile_degrees
        };
        let spawn_probability = if spawn_probability.is_nan() {
            0.0
        } else {
            spawn_probability.clamp(0.0, 1.0)
        };
        Self {
            tile_degrees,
            neighborhood_radius,
            spawn_probability,
            coin_scale: coin_scale.max(1),
            zoom,
            origin,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classroom()
    }
}
