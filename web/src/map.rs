//! The map collaborator: rectangles, markers and tiles on a Leaflet map.

use anyhow::anyhow;
use geocoin_core::{Bounds, LatLng};
use js_sys::{Array, Function};
use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Builds the popup body each time a rectangle's popup opens.
pub(crate) type PopupFactory = Box<dyn Fn() -> HtmlElement>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RectangleId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TileLayerOptions {
    pub max_zoom: u8,
    pub attribution: String,
}

impl TileLayerOptions {
    pub(crate) const OSM_URL: &'static str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

    pub(crate) fn openstreetmap(max_zoom: u8) -> Self {
        Self {
            max_zoom,
            attribution: r#"&copy; <a href="http://www.openstreetmap.org/copyright">OpenStreetMap</a>"#
                .to_string(),
        }
    }
}

pub(crate) trait MapProvider {
    fn add_rectangle(&mut self, bounds: Bounds, popup: PopupFactory) -> RectangleId;
    fn set_popup(&mut self, id: RectangleId, popup: PopupFactory);
    fn remove_all_rectangles(&mut self);
    fn add_marker(&mut self, name: &str, position: LatLng, tooltip: &str);
    fn update_marker(&mut self, name: &str, position: LatLng);
    fn add_tile_layer(&mut self, url: &str, options: &TileLayerOptions);
    fn set_view(&mut self, position: LatLng, zoom: u8);
    fn set_path(&mut self, points: &[LatLng]);
}

#[wasm_bindgen]
extern "C" {
    pub(crate) type LeafletMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(element_id: &str, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8) -> LeafletMap;

    type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L)]
    fn rectangle(bounds: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L)]
    fn marker(position: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L)]
    fn polyline(points: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method)]
    fn remove(this: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &Function) -> Layer;

    #[wasm_bindgen(method, js_name = setPopupContent)]
    fn set_popup_content(this: &Layer, content: &Function) -> Layer;

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Layer, content: &str) -> Layer;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Layer, position: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = setLatLngs)]
    fn set_lat_lngs(this: &Layer, points: &JsValue) -> Layer;
}

fn point(position: LatLng) -> JsValue {
    Array::of2(&JsValue::from_f64(position.lat), &JsValue::from_f64(position.lng)).into()
}

fn rectangle_bounds(bounds: Bounds) -> JsValue {
    Array::of2(&point(bounds.south_west), &point(bounds.north_east)).into()
}

fn points(positions: &[LatLng]) -> JsValue {
    positions.iter().copied().map(point).collect::<Array>().into()
}

fn to_js<T: Serialize>(value: &T) -> anyhow::Result<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|err| anyhow!("could not convert {}: {:?}", json, err))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: [f64; 2],
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    zoom_control: bool,
    scroll_wheel_zoom: bool,
}

struct Rectangle {
    layer: Layer,
    popup: Closure<dyn Fn() -> HtmlElement>,
}

pub(crate) struct LeafletMapProvider {
    map: LeafletMap,
    markers: HashMap<String, Layer>,
    rectangles: Vec<Rectangle>,
    path: Option<Layer>,
}

impl LeafletMapProvider {
    /// Mounts a Leaflet map locked to `zoom` into the element `element_id`.
    pub(crate) fn new(element_id: &str, center: LatLng, zoom: u8) -> anyhow::Result<Self> {
        let options = to_js(&MapOptions {
            center: [center.lat, center.lng],
            zoom,
            min_zoom: zoom,
            max_zoom: zoom,
            zoom_control: false,
            scroll_wheel_zoom: false,
        })?;
        let map = leaflet_map(element_id, &options)
            .map_err(|err| anyhow!("could not create map in #{}: {:?}", element_id, err))?;
        Ok(Self {
            map,
            markers: HashMap::new(),
            rectangles: Vec::new(),
            path: None,
        })
    }
}

impl MapProvider for LeafletMapProvider {
    fn add_rectangle(&mut self, bounds: Bounds, popup: PopupFactory) -> RectangleId {
        let popup = Closure::wrap(popup);
        let layer = rectangle(&rectangle_bounds(bounds));
        layer.add_to(&self.map);
        layer.bind_popup(popup.as_ref().unchecked_ref());
        self.rectangles.push(Rectangle { layer, popup });
        RectangleId(self.rectangles.len() - 1)
    }

    fn set_popup(&mut self, id: RectangleId, popup: PopupFactory) {
        let Some(rectangle) = self.rectangles.get_mut(id.0) else {
            log::warn!("Rectangle {:?} does not exist", id);
            return;
        };
        let popup = Closure::wrap(popup);
        rectangle
            .layer
            .set_popup_content(popup.as_ref().unchecked_ref());
        rectangle.popup = popup;
    }

    fn remove_all_rectangles(&mut self) {
        for rectangle in self.rectangles.drain(..) {
            rectangle.layer.remove();
        }
    }

    fn add_marker(&mut self, name: &str, position: LatLng, tooltip: &str) {
        let layer = marker(&point(position));
        layer.add_to(&self.map);
        layer.bind_tooltip(tooltip);
        if let Some(previous) = self.markers.insert(name.to_string(), layer) {
            previous.remove();
        }
    }

    fn update_marker(&mut self, name: &str, position: LatLng) {
        match self.markers.get(name) {
            Some(layer) => {
                layer.set_lat_lng(&point(position));
            }
            None => log::warn!("Marker with name {:?} does not exist", name),
        }
    }

    fn add_tile_layer(&mut self, url: &str, options: &TileLayerOptions) {
        match to_js(options) {
            Ok(options) => {
                tile_layer(url, &options).add_to(&self.map);
            }
            Err(err) => log::error!("Could not add tile layer {}: {}", url, err),
        }
    }

    fn set_view(&mut self, position: LatLng, zoom: u8) {
        self.map.set_view(&point(position), zoom);
    }

    fn set_path(&mut self, positions: &[LatLng]) {
        match &self.path {
            Some(layer) => {
                layer.set_lat_lngs(&points(positions));
            }
            None => match to_js(&serde_json::json!({ "color": "red" })) {
                Ok(options) => {
                    let layer = polyline(&points(positions), &options);
                    layer.add_to(&self.map);
                    self.path = Some(layer);
                }
                Err(err) => log::error!("Could not draw path: {}", err),
            },
        }
    }
}
