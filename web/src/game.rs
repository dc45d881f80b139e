use crate::geolocation::GeoWatch;
use crate::map::*;
use crate::settings::Settings;
use crate::storage::LocalStorageStore;
use geocoin_core as game;
use game::{Cache, Cell, Coin, Direction, GameSession, LatLng, Serial};
use gloo::events::EventListener;
use gloo::utils::{document, window};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::html::Scope;
use yew::prelude::*;

const PLAYER_MARKER: &str = "player";

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Move(Direction),
    Collect(Cell, Serial),
    Deposit(Cell),
    ToggleGeolocation,
    Position(LatLng),
    GeolocationFailed(String),
    CenterOn(Cell),
    Save,
    Load,
    Reset,
}

/// What the map needs redrawn after a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Redraw {
    Nothing,
    Player,
    Cache(Cell),
    Everything,
}

/// Whether handling `msg` changed anything worth writing to storage.
///
/// A position fix inside the current cell only extends the path, so it waits
/// for the next real move or the `pagehide` save.
fn should_save(msg: &Msg, redraw: Redraw) -> bool {
    match msg {
        Msg::CenterOn(_) | Msg::Save | Msg::Reset => false,
        Msg::Position(_) => redraw == Redraw::Everything,
        _ => redraw != Redraw::Nothing,
    }
}

pub(crate) fn status_text(coins: &[Coin]) -> String {
    match coins.len() {
        0 => "Nothing collected yet".to_string(),
        1 => "You have 1 coin".to_string(),
        count => format!("You have {} coins", count),
    }
}

pub(crate) fn popup_text(cache: &Cache) -> String {
    format!(
        "There is a cache here at \"{}\". There are {} coins to collect.",
        cache.cell(),
        cache.len()
    )
}

/// Where the player marker goes: the last recorded point, else the cell center.
fn player_position<G: game::CacheGenerator>(session: &GameSession<G>) -> LatLng {
    let player = session.player();
    player
        .history()
        .last()
        .copied()
        .unwrap_or_else(|| session.board().cell_center(player.cell()))
}

/// Puts every visible cache on `map` as a rectangle with a popup from `popup`.
pub(crate) fn draw_caches<G: game::CacheGenerator>(
    map: &mut impl MapProvider,
    session: &GameSession<G>,
    popup: impl Fn(&Cache) -> PopupFactory,
) -> HashMap<Cell, RectangleId> {
    map.remove_all_rectangles();
    session
        .visible_caches()
        .map(|cache| {
            let bounds = session.board().cell_bounds(cache.cell());
            (cache.cell(), map.add_rectangle(bounds, popup(cache)))
        })
        .collect()
}

pub(crate) fn draw_player<G: game::CacheGenerator>(
    map: &mut impl MapProvider,
    session: &GameSession<G>,
) {
    let position = player_position(session);
    map.update_marker(PLAYER_MARKER, position);
    let mut path = session.player().history().to_vec();
    if path.last() != Some(&position) {
        path.push(position);
    }
    map.set_path(&path);
}

fn element<T: JsCast>(tag: &str) -> T {
    document()
        .create_element(tag)
        .expect("tag must be valid")
        .dyn_into::<T>()
        .expect("element must have requested type")
}

fn button(label: &str, msg: Msg, link: &Scope<GameView>) -> (HtmlElement, EventListener) {
    let button: HtmlElement = element("button");
    button.set_inner_text(label);
    let link = link.clone();
    let listener = EventListener::new(&button, "click", move |_| link.send_message(msg.clone()));
    (button, listener)
}

/// Popup listing one collect button per coin and a deposit button. The
/// listeners live as long as the factory, and are replaced on every open.
fn cache_popup(cache: &Cache, link: &Scope<GameView>) -> PopupFactory {
    let cache = cache.clone();
    let link = link.clone();
    let listeners: Rc<RefCell<Vec<EventListener>>> = Rc::default();

    Box::new(move || {
        let mut listeners = listeners.borrow_mut();
        listeners.clear();

        let root: HtmlElement = element("div");
        let text: HtmlElement = element("div");
        text.set_inner_text(&popup_text(&cache));
        root.append_with_node_1(&text).expect("append must work");

        let coins: HtmlElement = element("div");
        for coin in cache.coins() {
            let (node, listener) = button(
                &format!("collect {}", coin),
                Msg::Collect(cache.cell(), coin.serial_number),
                &link,
            );
            coins.append_with_node_1(&node).expect("append must work");
            listeners.push(listener);
        }
        root.append_with_node_1(&coins).expect("append must work");

        let (deposit, listener) = button("deposit", Msg::Deposit(cache.cell()), &link);
        root.append_with_node_1(&deposit).expect("append must work");
        listeners.push(listener);

        root
    })
}

pub(crate) struct GameView {
    session: GameSession,
    store: LocalStorageStore,
    map: Option<LeafletMapProvider>,
    rectangles: HashMap<Cell, RectangleId>,
    watch: Option<GeoWatch>,
    settings: Settings,
    _page_hide: EventListener,
}

impl GameView {
    fn redraw(&mut self, ctx: &Context<Self>, redraw: Redraw) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        match redraw {
            Redraw::Nothing => {}
            Redraw::Player => draw_player(map, &self.session),
            Redraw::Cache(cell) => {
                match (self.session.cache_at(cell), self.rectangles.get(&cell)) {
                    (Some(cache), Some(&id)) => map.set_popup(id, cache_popup(cache, ctx.link())),
                    _ => log::warn!("No drawn cache at {}", cell),
                }
            }
            Redraw::Everything => {
                let link = ctx.link();
                self.rectangles = draw_caches(map, &self.session, |cache| cache_popup(cache, link));
                draw_player(map, &self.session);
                map.set_view(player_position(&self.session), self.session.config().zoom);
            }
        }
    }

    fn save(&mut self) {
        if let Err(err) = self.session.save(&mut self.store) {
            log::error!("Could not save session to local storage: {}", err);
        }
    }

    fn toggle_geolocation(&mut self, ctx: &Context<Self>) {
        if !self.session.toggle_tracking().is_on() {
            self.watch = None;
            return;
        }

        let on_position = ctx.link().callback(Msg::Position);
        let on_error = ctx.link().callback(Msg::GeolocationFailed);
        match GeoWatch::start(self.settings.max_age_ms, on_position, on_error) {
            Ok(watch) => self.watch = Some(watch),
            Err(err) => self.session.tracking_failed(&err.to_string()),
        }
    }

    fn handle(&mut self, ctx: &Context<Self>, msg: Msg) -> game::Result<Redraw> {
        use Msg::*;

        Ok(match msg {
            Move(direction) => {
                self.session.move_player(direction)?;
                Redraw::Everything
            }
            Collect(cell, serial) => match self.session.collect_coin(cell, serial)? {
                outcome if outcome.has_update() => Redraw::Cache(cell),
                _ => Redraw::Nothing,
            },
            Deposit(cell) => match self.session.deposit_coin(cell)? {
                outcome if outcome.has_update() => Redraw::Cache(cell),
                _ => Redraw::Nothing,
            },
            ToggleGeolocation => {
                self.toggle_geolocation(ctx);
                Redraw::Nothing
            }
            Position(point) => match self.session.on_position(point)? {
                game::MoveOutcome::Ignored => Redraw::Nothing,
                game::MoveOutcome::Stayed => Redraw::Player,
                game::MoveOutcome::Moved(_) => Redraw::Everything,
            },
            GeolocationFailed(reason) => {
                self.session.tracking_failed(&reason);
                self.watch = None;
                Redraw::Nothing
            }
            CenterOn(cell) => {
                if let Some(map) = self.map.as_mut() {
                    map.set_view(self.session.board().cell_center(cell), self.session.config().zoom);
                }
                Redraw::Nothing
            }
            Save => {
                self.session.save(&mut self.store)?;
                Redraw::Nothing
            }
            Load => {
                self.session.load(&self.store);
                Redraw::Everything
            }
            Reset => {
                let confirmed = window()
                    .confirm_with_message("Reset the game? All coins and caches will be forgotten.")
                    .unwrap_or(false);
                if !confirmed {
                    return Ok(Redraw::Nothing);
                }
                self.watch = None;
                self.session.set_tracking(game::Tracking::Off);
                self.session.reset(&mut self.store)?;
                Redraw::Everything
            }
        })
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = Settings;

    fn create(ctx: &Context<Self>) -> Self {
        let settings = ctx.props().clone();
        let config = settings.game_config();
        let store = LocalStorageStore;

        let mut session = GameSession::new(config).expect("fresh session must build");
        if session.load(&store).is_some() {
            log::info!("Resumed stored session");
        }

        let map = match LeafletMapProvider::new("map", config.origin, config.zoom) {
            Ok(mut map) => {
                map.add_tile_layer(
                    TileLayerOptions::OSM_URL,
                    &TileLayerOptions::openstreetmap(config.zoom),
                );
                map.add_marker(PLAYER_MARKER, player_position(&session), "You are here!");
                Some(map)
            }
            Err(err) => {
                log::error!("Map unavailable: {}", err);
                None
            }
        };

        let page_hide = {
            let link = ctx.link().clone();
            EventListener::new(&window(), "pagehide", move |_| link.send_message(Msg::Save))
        };

        let mut view = Self {
            session,
            store,
            map,
            rectangles: HashMap::new(),
            watch: None,
            settings,
            _page_hide: page_hide,
        };
        view.redraw(ctx, Redraw::Everything);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        log::debug!("message: {:?}", msg);
        let redraw = match self.handle(ctx, msg.clone()) {
            Ok(redraw) => redraw,
            Err(err) => {
                log::warn!("{}", err);
                return false;
            }
        };

        if should_save(&msg, redraw) {
            self.save();
        }
        self.redraw(ctx, redraw);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let player = self.session.player();
        let tracking = self.session.tracking().is_on();

        html! {
            <>
                <div id="controlPanel">
                    {
                        for Direction::ALL.into_iter().map(|direction| {
                            let onclick = ctx.link().callback(move |_| Msg::Move(direction));
                            html! { <button {onclick}>{direction.label()}</button> }
                        })
                    }
                    <button
                        class={classes!(tracking.then_some("active"))}
                        title="Follow device location"
                        onclick={ctx.link().callback(|_| Msg::ToggleGeolocation)}
                    >{"🌐"}</button>
                    <button title="Save" onclick={ctx.link().callback(|_| Msg::Save)}>{"💾"}</button>
                    <button title="Load" onclick={ctx.link().callback(|_| Msg::Load)}>{"📂"}</button>
                    <button title="Reset" onclick={ctx.link().callback(|_| Msg::Reset)}>{"🚮"}</button>
                </div>
                <div id="statusPanel">{status_text(player.coins())}</div>
                <div id="inventoryPanel">
                    {"Inventory: "}
                    {
                        for player.coins().iter().map(|&coin| {
                            let onclick = ctx.link().callback(move |_| Msg::CenterOn(coin.cell));
                            html! {
                                <div><span class="coin-link" {onclick}>{format!("Coin {}", coin)}</span></div>
                            }
                        })
                    }
                </div>
            </>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::{Bounds, GameConfig};

    #[derive(Default)]
    struct RecordingMap {
        rectangles: Vec<Bounds>,
        cleared: usize,
        markers: HashMap<String, LatLng>,
        path: Vec<LatLng>,
    }

    impl MapProvider for RecordingMap {
        fn add_rectangle(&mut self, bounds: Bounds, _popup: PopupFactory) -> RectangleId {
            self.rectangles.push(bounds);
            RectangleId(self.rectangles.len() - 1)
        }

        fn set_popup(&mut self, _id: RectangleId, _popup: PopupFactory) {}

        fn remove_all_rectangles(&mut self) {
            self.rectangles.clear();
            self.cleared += 1;
        }

        fn add_marker(&mut self, name: &str, position: LatLng, _tooltip: &str) {
            self.markers.insert(name.to_string(), position);
        }

        fn update_marker(&mut self, name: &str, position: LatLng) {
            self.markers.insert(name.to_string(), position);
        }

        fn add_tile_layer(&mut self, _url: &str, _options: &TileLayerOptions) {}

        fn set_view(&mut self, _position: LatLng, _zoom: u8) {}

        fn set_path(&mut self, points: &[LatLng]) {
            self.path = points.to_vec();
        }
    }

    fn no_popup(_: &Cache) -> PopupFactory {
        Box::new(|| -> HtmlElement { unreachable!("popups are not opened in tests") })
    }

    #[test]
    fn every_visible_cache_gets_one_rectangle() {
        let session = GameSession::new(GameConfig::default()).unwrap();
        let mut map = RecordingMap::default();

        let drawn = draw_caches(&mut map, &session, no_popup);

        assert_eq!(map.cleared, 1);
        assert_eq!(drawn.len(), session.visible_caches().count());
        assert_eq!(map.rectangles.len(), drawn.len());
        for cache in session.visible_caches() {
            let id = drawn[&cache.cell()];
            assert_eq!(map.rectangles[id.0], session.board().cell_bounds(cache.cell()));
        }
    }

    #[test]
    fn redrawing_replaces_rectangles() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        let mut map = RecordingMap::default();
        draw_caches(&mut map, &session, no_popup);

        session.move_player(Direction::Up).unwrap();
        let drawn = draw_caches(&mut map, &session, no_popup);

        assert_eq!(map.cleared, 2);
        assert_eq!(map.rectangles.len(), drawn.len());
    }

    #[test]
    fn player_marker_follows_moves_and_path_grows() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        let mut map = RecordingMap::default();

        draw_player(&mut map, &session);
        assert_eq!(map.path.len(), 1);

        session.move_player(Direction::Right).unwrap();
        session.move_player(Direction::Right).unwrap();
        draw_player(&mut map, &session);

        let expected = session.board().cell_center(Cell::new(0, 2));
        assert_eq!(map.markers[PLAYER_MARKER], expected);
        assert_eq!(map.path.len(), 2);
        assert_eq!(map.path.last(), Some(&expected));
    }

    #[test]
    fn status_and_popup_text() {
        let cell = Cell::new(2, -1);
        let cache = Cache::minted(cell, 5);

        assert_eq!(status_text(&[]), "Nothing collected yet");
        assert_eq!(status_text(&[Coin::new(cell, 0)]), "You have 1 coin");
        assert_eq!(
            popup_text(&cache),
            "There is a cache here at \"2,-1\". There are 5 coins to collect."
        );
    }

    #[test]
    fn position_fix_saves_only_when_cell_changes() {
        let fix = Msg::Position(GameConfig::CLASSROOM);

        assert!(!should_save(&fix, Redraw::Nothing));
        assert!(!should_save(&fix, Redraw::Player));
        assert!(should_save(&fix, Redraw::Everything));
    }

    #[test]
    fn commands_save_after_a_change() {
        let cell = Cell::new(2, -1);

        assert!(should_save(&Msg::Collect(cell, 0), Redraw::Cache(cell)));
        assert!(should_save(&Msg::Move(Direction::Up), Redraw::Everything));
        assert!(!should_save(&Msg::Deposit(cell), Redraw::Nothing));
        assert!(!should_save(&Msg::Save, Redraw::Nothing));
        assert!(!should_save(&Msg::CenterOn(cell), Redraw::Everything));
        assert!(!should_save(&Msg::Reset, Redraw::Everything));
    }
}
