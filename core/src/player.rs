use serde::{Deserialize, Serialize};

use crate::*;

/// Where the player stands, what they carry, and where they have been.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    cell: Cell,
    coins: Vec<Coin>,
    history: Vec<LatLng>,
}

impl Player {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            ..Default::default()
        }
    }

    pub(crate) fn from_parts(cell: Cell, coins: Vec<Coin>, history: Vec<LatLng>) -> Self {
        Self {
            cell,
            coins,
            history,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn history(&self) -> &[LatLng] {
        &self.history
    }

    pub fn holds(&self, coin: &Coin) -> bool {
        self.coins.contains(coin)
    }

    /// Coin a deposit would hand over next.
    pub fn top_coin(&self) -> Option<Coin> {
        self.coins.last().copied()
    }

    pub fn step(&mut self, direction: Direction) -> Cell {
        self.cell = self.cell.step(direction);
        self.cell
    }

    pub fn move_to(&mut self, cell: Cell) {
        self.cell = cell;
    }

    pub fn record(&mut self, point: LatLng) {
        self.history.push(point);
    }

    pub(crate) fn push_coin(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub(crate) fn pop_coin(&mut self) -> Option<Coin> {
        self.coins.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_is_last_in_first_out() {
        let mut player = Player::default();
        let a = Coin::new(Cell::new(0, 0), 1);
        let b = Coin::new(Cell::new(0, 1), 4);

        player.push_coin(a);
        player.push_coin(b);

        assert_eq!(player.top_coin(), Some(b));
        assert_eq!(player.pop_coin(), Some(b));
        assert_eq!(player.pop_coin(), Some(a));
        assert_eq!(player.pop_coin(), None);
    }

    #[test]
    fn steps_are_unbounded_single_axis_moves() {
        let mut player = Player::new(Cell::new(0, 0));

        for _ in 0..3 {
            player.step(Direction::Left);
        }
        player.step(Direction::Up);

        assert_eq!(player.cell(), Cell::new(1, -3));
    }

    #[test]
    fn history_appends_in_order() {
        let mut player = Player::default();
        player.record(LatLng::new(1.0, 2.0));
        player.record(LatLng::new(1.5, 2.0));

        assert_eq!(
            player.history(),
            &[LatLng::new(1.0, 2.0), LatLng::new(1.5, 2.0)]
        );
    }
}
