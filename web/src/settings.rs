use clap::Args;
use geocoin_core::{GameConfig, LatLng};
use yew::Properties;

/// Gameplay overrides read from the page's location hash.
#[derive(Args, Properties, Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Latitude of the spawn point and grid origin
    #[arg(long, default_value_t = GameConfig::CLASSROOM.lat, allow_negative_numbers = true)]
    pub origin_lat: f64,

    /// Longitude of the spawn point and grid origin
    #[arg(long, default_value_t = GameConfig::CLASSROOM.lng, allow_negative_numbers = true)]
    pub origin_lng: f64,

    /// Cell edge length in degrees
    #[arg(long, default_value_t = GameConfig::classroom().tile_degrees)]
    pub tile_degrees: f64,

    /// How many cells around the player show caches
    #[arg(long, default_value_t = GameConfig::classroom().neighborhood_radius)]
    pub radius: u32,

    /// Chance that a cell holds a cache
    #[arg(long, default_value_t = GameConfig::classroom().spawn_probability)]
    pub probability: f64,

    /// Scale for the number of coins a cache starts with
    #[arg(long, default_value_t = GameConfig::classroom().coin_scale)]
    pub coin_scale: u32,

    #[arg(long, default_value_t = GameConfig::classroom().zoom)]
    pub zoom: u8,

    /// Oldest cached position the browser may report, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub max_age_ms: u32,
}

impl Settings {
    pub(crate) fn game_config(&self) -> GameConfig {
        GameConfig::new(
            self.tile_degrees,
            self.radius,
            self.probability,
            self.coin_scale,
            self.zoom,
            LatLng::new(self.origin_lat, self.origin_lng),
        )
    }
}
