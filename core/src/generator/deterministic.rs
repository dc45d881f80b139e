use super::*;

/// Places caches where the cell's luck falls under the spawn probability, with
/// `ceil(luck * coin_scale)` coins. Pure in the cell coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LuckCacheGenerator {
    spawn_probability: f64,
    coin_scale: u32,
}

impl LuckCacheGenerator {
    pub fn new(spawn_probability: f64, coin_scale: u32) -> Self {
        Self {
            spawn_probability,
            coin_scale,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.spawn_probability, config.coin_scale)
    }

    pub fn has_cache(&self, cell: Cell) -> bool {
        cell_luck(cell) < self.spawn_probability
    }

    pub fn initial_coin_count(&self, cell: Cell) -> Serial {
        (cell_luck(cell) * f64::from(self.coin_scale)).ceil() as Serial
    }
}

impl CacheGenerator for LuckCacheGenerator {
    fn generate(&self, cell: Cell) -> Option<Cache> {
        if !self.has_cache(cell) {
            return None;
        }

        let count = self.initial_coin_count(cell);
        if count == 0 {
            log::warn!("Cache at {} rolled zero coins", cell);
        }
        Some(Cache::minted(cell, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> LuckCacheGenerator {
        LuckCacheGenerator::new(0.1, 100)
    }

    #[test]
    fn generation_is_pure_in_cell() {
        let generator = generator();
        for i in -10..10 {
            for j in -10..10 {
                let cell = Cell::new(i, j);
                assert_eq!(generator.generate(cell), generator.generate(cell));
            }
        }
    }

    #[test]
    fn coin_count_follows_scaled_luck() {
        let generator = generator();
        let cell = (-30..30)
            .flat_map(|i| (-30..30).map(move |j| Cell::new(i, j)))
            .find(|&cell| generator.has_cache(cell))
            .expect("some cell should spawn a cache");

        let cache = generator.generate(cell).unwrap();
        let expected = (cell_luck(cell) * 100.0).ceil() as usize;

        assert_eq!(cache.len(), expected);
        assert!(cache.len() <= 10);
        assert_eq!(cache.coins().last().map(|coin| coin.serial_number as usize), expected.checked_sub(1));
    }

    #[test]
    fn probability_bounds_are_all_or_nothing() {
        let never = LuckCacheGenerator::new(0.0, 100);
        let always = LuckCacheGenerator::new(1.0, 100);

        for i in -5..5 {
            let cell = Cell::new(i, -i);
            assert_eq!(never.generate(cell), None);
            assert!(always.generate(cell).is_some());
        }
    }
}
