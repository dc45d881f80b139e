use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered coin collection belonging to one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    cell: Cell,
    coins: Vec<Coin>,
}

impl Cache {
    pub fn new(cell: Cell, coins: Vec<Coin>) -> Self {
        Self { cell, coins }
    }

    /// Freshly minted cache with coins numbered `0..count`.
    pub fn minted(cell: Cell, count: Serial) -> Self {
        let coins = (0..count).map(|serial| Coin::new(cell, serial)).collect();
        Self::new(cell, coins)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn contains(&self, coin: &Coin) -> bool {
        self.coins.contains(coin)
    }

    /// Removes the first coin with `serial`, keeping the order of the rest.
    pub fn collect(&mut self, serial: Serial) -> Option<Coin> {
        let index = self
            .coins
            .iter()
            .position(|coin| coin.serial_number == serial)?;
        Some(self.coins.remove(index))
    }

    /// Appends `coin`; any coin may go into any cache.
    pub fn deposit(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&Coin) -> bool) {
        self.coins.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_coins_are_numbered_from_zero() {
        let cell = Cell::new(2, -1);
        let cache = Cache::minted(cell, 3);

        assert_eq!(
            cache.coins(),
            &[Coin::new(cell, 0), Coin::new(cell, 1), Coin::new(cell, 2)]
        );
    }

    #[test]
    fn collect_removes_only_the_requested_serial() {
        let cell = Cell::new(0, 0);
        let mut cache = Cache::minted(cell, 4);

        assert_eq!(cache.collect(2), Some(Coin::new(cell, 2)));
        assert_eq!(
            cache.coins(),
            &[Coin::new(cell, 0), Coin::new(cell, 1), Coin::new(cell, 3)]
        );
    }

    #[test]
    fn collect_absent_serial_changes_nothing() {
        let mut cache = Cache::minted(Cell::new(0, 0), 2);
        let before = cache.clone();

        assert_eq!(cache.collect(7), None);
        assert_eq!(cache, before);
    }

    #[test]
    fn deposit_appends_foreign_coin() {
        let mut cache = Cache::minted(Cell::new(0, 0), 1);
        let foreign = Coin::new(Cell::new(9, 9), 5);

        cache.deposit(foreign);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.coins().last(), Some(&foreign));
    }
}
