use anyhow::anyhow;
use geocoin_core::LatLng;
use gloo::utils::window;
use wasm_bindgen::prelude::*;
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError, PositionOptions};
use yew::Callback;

/// Live `watchPosition` subscription, cancelled when dropped.
pub(crate) struct GeoWatch {
    geolocation: Geolocation,
    watch_id: i32,
    _on_position: Closure<dyn FnMut(GeolocationPosition)>,
    _on_error: Closure<dyn FnMut(GeolocationPositionError)>,
}

impl GeoWatch {
    pub(crate) fn start(
        max_age_ms: u32,
        on_position: Callback<LatLng>,
        on_error: Callback<String>,
    ) -> anyhow::Result<Self> {
        let geolocation = window()
            .navigator()
            .geolocation()
            .map_err(|err| anyhow!("geolocation unavailable: {:?}", err))?;

        let on_position = Closure::<dyn FnMut(GeolocationPosition)>::new(
            move |position: GeolocationPosition| {
                let coords = position.coords();
                on_position.emit(LatLng::new(coords.latitude(), coords.longitude()));
            },
        );
        let on_error = Closure::<dyn FnMut(GeolocationPositionError)>::new(
            move |err: GeolocationPositionError| {
                on_error.emit(format!("{} (code {})", err.message(), err.code()));
            },
        );

        let options = PositionOptions::new();
        options.set_enable_high_accuracy(true);
        options.set_maximum_age(max_age_ms);

        let watch_id = geolocation
            .watch_position_with_error_callback_and_options(
                on_position.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &options,
            )
            .map_err(|err| anyhow!("could not watch position: {:?}", err))?;
        log::debug!("geolocation watch {} started", watch_id);

        Ok(Self {
            geolocation,
            watch_id,
            _on_position: on_position,
            _on_error: on_error,
        })
    }
}

impl Drop for GeoWatch {
    fn drop(&mut self) {
        self.geolocation.clear_watch(self.watch_id);
        log::debug!("geolocation watch {} stopped", self.watch_id);
    }
}
