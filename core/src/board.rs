use hashbrown::HashMap;

use crate::*;

/// Translates between geographic points and the integer cell grid.
///
/// Cells are counted from `origin` in steps of `tile_degrees`. Every cell the
/// board hands out is interned, so equal coordinates always come back as the
/// same canonical value. The table only grows until [`Board::forget_beyond`]
/// trims it back to the current neighborhood.
#[derive(Clone, Debug)]
pub struct Board {
    tile_degrees: f64,
    origin: LatLng,
    known_cells: HashMap<(CellIndex, CellIndex), Cell>,
}

impl Board {
    pub fn new(tile_degrees: f64, origin: LatLng) -> Self {
        Self {
            tile_degrees,
            origin,
            known_cells: HashMap::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.tile_degrees, config.origin)
    }

    pub fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    pub fn origin(&self) -> LatLng {
        self.origin
    }

    pub fn known_cell_count(&self) -> usize {
        self.known_cells.len()
    }

    pub fn cell(&mut self, i: CellIndex, j: CellIndex) -> Cell {
        *self
            .known_cells
            .entry((i, j))
            .or_insert_with(|| Cell::new(i, j))
    }

    /// Drops interned cells farther than `radius` from `center`.
    pub fn forget_beyond(&mut self, center: Cell, radius: u32) {
        self.known_cells
            .retain(|_, cell| cell.distance(center) <= radius);
    }

    pub fn cell_for_point(&mut self, point: LatLng) -> Cell {
        let i = ((point.lat - self.origin.lat) / self.tile_degrees).floor() as CellIndex;
        let j = ((point.lng - self.origin.lng) / self.tile_degrees).floor() as CellIndex;
        self.cell(i, j)
    }

    pub fn cell_bounds(&self, cell: Cell) -> Bounds {
        let corner = |i: CellIndex, j: CellIndex| {
            LatLng::new(
                self.origin.lat + f64::from(i) * self.tile_degrees,
                self.origin.lng + f64::from(j) * self.tile_degrees,
            )
        };
        Bounds {
            south_west: corner(cell.i, cell.j),
            north_east: corner(cell.i.saturating_add(1), cell.j.saturating_add(1)),
        }
    }

    pub fn cell_center(&self, cell: Cell) -> LatLng {
        LatLng::new(
            self.origin.lat + (f64::from(cell.i) + 0.5) * self.tile_degrees,
            self.origin.lng + (f64::from(cell.j) + 0.5) * self.tile_degrees,
        )
    }

    /// Square neighborhood of the cell containing `point`, inclusive of `radius`.
    pub fn cells_near_point(&mut self, point: LatLng, radius: u32) -> Vec<Cell> {
        let center = self.cell_for_point(point);
        self.cells_near_cell(center, radius)
    }

    /// Cells within `radius` steps of `center` on each axis, row by row.
    pub fn cells_near_cell(&mut self, center: Cell, radius: u32) -> Vec<Cell> {
        let radius = CellIndex::try_from(radius).unwrap_or(CellIndex::MAX);
        let i_range = center.i.saturating_sub(radius)..=center.i.saturating_add(radius);
        let j_range = center.j.saturating_sub(radius)..=center.j.saturating_add(radius);

        let mut cells = Vec::with_capacity(i_range.clone().count() * j_range.clone().count());
        for i in i_range {
            for j in j_range.clone() {
                cells.push(self.cell(i, j));
            }
        }
        cells
    }
}
