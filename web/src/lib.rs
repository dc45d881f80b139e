use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod geolocation;
mod map;
mod settings;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    settings: settings::Settings,
}

impl Args {
    fn from_location_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_location_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("settings: {:?}", args.settings);

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.settings).render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{GameConfig, LatLng};

    #[test]
    fn empty_hash_gives_classroom_defaults() {
        let args = Args::from_location_hash("").unwrap();

        assert_eq!(args.settings.game_config(), GameConfig::default());
        assert_eq!(args.settings.max_age_ms, 0);
    }

    #[test]
    fn hash_overrides_gameplay_settings() {
        let args = Args::from_location_hash(
            "#-vv&--radius=4&--probability=0.25&--origin-lat=51.5&--origin-lng=-0.12",
        )
        .unwrap();
        let config = args.settings.game_config();

        assert_eq!(config.neighborhood_radius, 4);
        assert_eq!(config.spawn_probability, 0.25);
        assert_eq!(config.origin, LatLng::new(51.5, -0.12));
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::from_location_hash("#--teleport").is_err());
    }
}
