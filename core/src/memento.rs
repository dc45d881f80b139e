//! Saved cache contents, and the store that keeps one per visited cell.
//!
//! A memento is the JSON array of the cache's coins in order, e.g.
//! `[{"cell":{"i":2,"j":-1},"serialNumber":0}]`. Once a cell has a memento the
//! memento is authoritative and the cell is never generated again.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memento(String);

impl Memento {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn serialize(cache: &Cache) -> Result<Memento> {
    serde_json::to_string(cache.coins())
        .map(Memento)
        .map_err(|err| GameError::Encode(err.to_string()))
}

pub fn deserialize(cell: Cell, memento: &Memento) -> Result<Cache> {
    serde_json::from_str::<Vec<Coin>>(memento.as_str())
        .map(|coins| Cache::new(cell, coins))
        .map_err(|err| GameError::CorruptMemento {
            cell,
            reason: err.to_string(),
        })
}

/// Mementos keyed by cell, iterated in the order cells were first stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MementoStore {
    order: Vec<Cell>,
    mementos: HashMap<Cell, Memento>,
}

impl MementoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.mementos.contains_key(&cell)
    }

    pub fn get(&self, cell: Cell) -> Option<&Memento> {
        self.mementos.get(&cell)
    }

    /// Stores `memento` for `cell`, overwriting in place if one exists.
    pub fn put(&mut self, cell: Cell, memento: Memento) {
        if self.mementos.insert(cell, memento).is_none() {
            self.order.push(cell);
        }
    }

    pub fn save(&mut self, cache: &Cache) -> Result<()> {
        let memento = serialize(cache)?;
        self.put(cache.cell(), memento);
        Ok(())
    }

    pub fn restore(&self, cell: Cell) -> Option<Result<Cache>> {
        self.get(cell).map(|memento| deserialize(cell, memento))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.mementos.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Memento)> + '_ {
        self.order
            .iter()
            .map(|&cell| (cell, &self.mementos[&cell]))
    }

    /// `("i,j", memento)` pairs in store order, the persisted form.
    pub fn to_entries(&self) -> Vec<(String, Memento)> {
        self.iter()
            .map(|(cell, memento)| (cell.key(), memento.clone()))
            .collect()
    }

    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Memento)>,
    {
        let mut store = Self::new();
        for (key, memento) in entries {
            store.put(key.parse()?, memento);
        }
        Ok(store)
    }
}
