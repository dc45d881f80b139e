use hashbrown::{HashMap, HashSet};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoinOutcome {
    NoChange,
    Collected(Coin),
    Deposited(Coin),
}

impl CoinOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position updates are not being tracked.
    Ignored,
    /// Still inside the same cell.
    Stayed,
    Moved(Cell),
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Tracking {
    #[default]
    Off,
    On,
}

impl Tracking {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// All authoritative game state: the player, every memento, and the caches
/// realized around the player.
#[derive(Clone, Debug)]
pub struct GameSession<G = LuckCacheGenerator> {
    config: GameConfig,
    board: Board,
    generator: G,
    mementos: MementoStore,
    visible: HashMap<Cell, Cache>,
    visible_order: Vec<Cell>,
    player: Player,
    tracking: Tracking,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self> {
        let generator = LuckCacheGenerator::from_config(&config);
        Self::with_generator(config, generator)
    }
}

impl<G: CacheGenerator> GameSession<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        let mut board = Board::from_config(&config);
        let start = board.cell_for_point(config.origin);
        let mut session = Self {
            config,
            board,
            generator,
            mementos: MementoStore::new(),
            visible: HashMap::new(),
            visible_order: Vec::new(),
            player: Player::new(start),
            tracking: Tracking::Off,
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn mementos(&self) -> &MementoStore {
        &self.mementos
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn origin_cell(&mut self) -> Cell {
        self.board.cell_for_point(self.config.origin)
    }

    pub fn cache_at(&self, cell: Cell) -> Option<&Cache> {
        self.visible.get(&cell)
    }

    /// Realized caches around the player, row by row.
    pub fn visible_caches(&self) -> impl Iterator<Item = &Cache> + '_ {
        self.visible_order
            .iter()
            .filter_map(|cell| self.visible.get(cell))
    }

    /// Re-realizes every cache in the player's neighborhood.
    pub fn refresh(&mut self) -> Result<()> {
        let center = self.player.cell();
        let radius = self.config.neighborhood_radius;
        let cells = self.board.cells_near_cell(center, radius);
        self.board.forget_beyond(center, radius);

        let mut visible = HashMap::with_capacity(cells.len());
        let mut visible_order = Vec::new();
        for cell in cells {
            if let Some(cache) = self.realize(cell)? {
                visible_order.push(cell);
                visible.insert(cell, cache);
            }
        }

        self.visible = visible;
        self.visible_order = visible_order;
        Ok(())
    }

    fn realize(&mut self, cell: Cell) -> Result<Option<Cache>> {
        match self.mementos.restore(cell) {
            Some(Ok(cache)) => Ok(Some(cache)),
            Some(Err(err)) => {
                log::warn!("{}, regenerating", err);
                let cache = self.regenerate(cell);
                self.mementos.save(&cache)?;
                Ok(Some(cache))
            }
            None => match self.generator.generate(cell) {
                Some(cache) => {
                    log::debug!("generated cache at {} with {} coins", cell, cache.len());
                    self.mementos.save(&cache)?;
                    Ok(Some(cache))
                }
                None => Ok(None),
            },
        }
    }

    /// Fresh cache for a cell whose memento was lost, minus coins of that
    /// cell that are known to exist elsewhere.
    fn regenerate(&self, cell: Cell) -> Cache {
        let mut cache = self
            .generator
            .generate(cell)
            .unwrap_or_else(|| Cache::new(cell, Vec::new()));

        let mut elsewhere: HashSet<Coin> = self
            .player
            .coins()
            .iter()
            .filter(|coin| coin.cell == cell)
            .copied()
            .collect();
        for (other, memento) in self.mementos.iter() {
            if other == cell {
                continue;
            }
            if let Ok(other_cache) = memento::deserialize(other, memento) {
                elsewhere.extend(other_cache.coins().iter().filter(|coin| coin.cell == cell));
            }
        }

        cache.retain(|coin| !elsewhere.contains(coin));
        cache
    }

    pub fn move_player(&mut self, direction: Direction) -> Result<Cell> {
        let cell = self.player.step(direction);
        self.player.record(self.board.cell_center(cell));
        log::debug!("player moved {:?} to {}", direction, cell);
        self.refresh()?;
        Ok(cell)
    }

    pub fn move_to_point(&mut self, point: LatLng) -> Result<MoveOutcome> {
        let cell = self.board.cell_for_point(point);
        self.player.record(point);
        if cell == self.player.cell() {
            return Ok(MoveOutcome::Stayed);
        }

        self.player.move_to(cell);
        log::debug!("player relocated to {}", cell);
        self.refresh()?;
        Ok(MoveOutcome::Moved(cell))
    }

    /// Applies a geolocation fix, if tracking is on.
    pub fn on_position(&mut self, point: LatLng) -> Result<MoveOutcome> {
        if !self.tracking.is_on() {
            return Ok(MoveOutcome::Ignored);
        }
        self.move_to_point(point)
    }

    pub fn set_tracking(&mut self, tracking: Tracking) {
        self.tracking = tracking;
    }

    pub fn toggle_tracking(&mut self) -> Tracking {
        self.tracking = self.tracking.toggled();
        log::debug!("tracking {:?}", self.tracking);
        self.tracking
    }

    pub fn tracking_failed(&mut self, reason: &str) {
        log::warn!("Geolocation failed: {}", reason);
        self.tracking = Tracking::Off;
    }

    /// Moves the coin `serial` from the cache at `cell` into the inventory.
    pub fn collect_coin(&mut self, cell: Cell, serial: Serial) -> Result<CoinOutcome> {
        let cache = self.visible.get(&cell).ok_or(GameError::NoCacheAt(cell))?;

        let mut next = cache.clone();
        let Some(coin) = next.collect(serial) else {
            log::debug!("no coin #{} at {}", serial, cell);
            return Ok(CoinOutcome::NoChange);
        };
        let memento = memento::serialize(&next)?;

        self.mementos.put(cell, memento);
        self.visible.insert(cell, next);
        self.player.push_coin(coin);
        log::debug!("collected {}", coin);
        Ok(CoinOutcome::Collected(coin))
    }

    /// Moves the most recently acquired coin into the cache at `cell`.
    pub fn deposit_coin(&mut self, cell: Cell) -> Result<CoinOutcome> {
        let cache = self.visible.get(&cell).ok_or(GameError::NoCacheAt(cell))?;
        let Some(coin) = self.player.top_coin() else {
            return Ok(CoinOutcome::NoChange);
        };

        let mut next = cache.clone();
        next.deposit(coin);
        let memento = memento::serialize(&next)?;

        self.mementos.put(cell, memento);
        self.visible.insert(cell, next);
        self.player.pop_coin();
        log::debug!("deposited {} at {}", coin, cell);
        Ok(CoinOutcome::Deposited(coin))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            player_position: self.player.cell(),
            player_coins: self.player.coins().to_vec(),
            cache_mementos: self.mementos.to_entries(),
            player_path: self.player.history().to_vec(),
        }
    }

    /// Replaces player and mementos wholesale with `snapshot`.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<()> {
        let mementos = MementoStore::from_entries(snapshot.cache_mementos)?;
        let position = snapshot.player_position;
        let position = self.board.cell(position.i, position.j);

        self.mementos = mementos;
        self.player = Player::from_parts(position, snapshot.player_coins, snapshot.player_path);
        self.refresh()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<SessionSnapshot> {
        let snapshot = self.snapshot();
        snapshot.write_to(store)?;
        log::debug!(
            "saved session with {} mementos and {} coins",
            snapshot.cache_mementos.len(),
            snapshot.player_coins.len()
        );
        Ok(snapshot)
    }

    /// Restores the stored session, or falls back to a fresh start when the
    /// record is missing or unusable. Never fails.
    pub fn load(&mut self, store: &impl KeyValueStore) -> Option<SessionSnapshot> {
        let loaded = match SessionSnapshot::read_from(store) {
            Ok(Some(snapshot)) => match self.restore(snapshot.clone()) {
                Ok(()) => Some(snapshot),
                Err(err) => {
                    log::warn!("Could not apply stored session: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("Could not read stored session: {}", err);
                None
            }
        };

        if loaded.is_none() {
            if let Err(err) = self.reset_state() {
                log::error!("Could not reset session: {}", err);
            }
        }
        loaded
    }

    /// Back to the origin with nothing collected, and the stored record deleted.
    pub fn reset(&mut self, store: &mut impl KeyValueStore) -> Result<()> {
        self.reset_state()?;
        store.remove(SESSION_KEY)
    }

    fn reset_state(&mut self) -> Result<()> {
        let origin = self.origin_cell();
        self.player = Player::new(origin);
        self.mementos.clear();
        self.refresh()
    }
}
