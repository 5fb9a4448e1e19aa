//! Bounded, non-wrapping Game of Life field.

use bevy::math::{ivec2, uvec2, IVec2, UVec2};

use crate::error::{Error, Result};

/// Binary cell field of fixed size, advanced with the B3/S23 rule.
///
/// Cells are stored row-major in `cells`. `next` is scratch space for [`Grid::advance`]
/// and is swapped in only once a whole generation has been computed, so readers never
/// see a half-updated field.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
}

impl Grid {
    /// Allocates a `width` x `height` field with every cell dead.
    ///
    /// Both dimensions have to be non-zero and addressable with `i32` coordinates.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let invalid = || Error::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        i32::try_from(width).map_err(|_| invalid())?;
        i32::try_from(height).map_err(|_| invalid())?;
        let len = width.checked_mul(height).ok_or_else(invalid)?;

        Ok(Self {
            width,
            height,
            cells: vec![false; len],
            next: vec![false; len],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Sets each cell alive with probability `density`, drawn independently per cell.
    ///
    /// Densities outside `[0, 1]` are not rejected, they just saturate the draw.
    pub fn seed_random(&mut self, rng: &mut fastrand::Rng, density: f32) {
        for cell in self.cells.iter_mut() {
            *cell = rng.f32() < density;
        }
    }

    /// Reads a cell. Anything outside the field is dead.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.cells[idx])
    }

    /// Writes a cell. Writes outside the field are dropped.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, alive: bool) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = alive;
        }
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Row-major iterator over every cell coordinate and its state.
    pub fn iter(&self) -> impl Iterator<Item = (UVec2, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, alive)| (self.idx_to_cell_coord(idx), *alive))
    }

    /// Computes the next generation from the current one and swaps it in.
    pub fn advance(&mut self) {
        for idx in 0..self.cells.len() {
            let coord = self.idx_to_cell_coord(idx).as_ivec2();
            let neighbours = self.live_neighbours(coord);

            self.next[idx] = matches!((self.cells[idx], neighbours), (true, 2 | 3) | (false, 3));
        }

        std::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Counts live cells in the Moore neighbourhood, treating the outside as dead.
    fn live_neighbours(&self, cell_coord: IVec2) -> u8 {
        (-1..=1)
            .flat_map(|y| (-1..=1).map(move |x| ivec2(x, y)))
            // filter out if pos_offs is (0, 0)
            .filter(|pos_offs| *pos_offs != IVec2::ZERO)
            .map(|pos_offs| cell_coord + pos_offs)
            .filter(|pos| self.get(pos.x, pos.y))
            .count() as u8
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    #[inline]
    fn idx_to_cell_coord(&self, idx: usize) -> UVec2 {
        uvec2((idx % self.width) as u32, (idx / self.width) as u32)
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}
