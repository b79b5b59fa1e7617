use crate::grid::{GridDims, Vec3i};
use crate::rng::{RandomSource, XorShiftRng};

/// The playing volume and its single food cell.
#[derive(Debug, Clone)]
pub struct Field<R: RandomSource = XorShiftRng> {
    dims: GridDims,
    food: Vec3i,
    rng: R,
}

impl Field<XorShiftRng> {
    pub fn with_time_seed(dims: GridDims) -> Self {
        Self::new(dims, XorShiftRng::from_time())
    }
}

impl<R: RandomSource> Field<R> {
    /// Places the first food immediately.
    pub fn new(dims: GridDims, rng: R) -> Self {
        let mut field = Self {
            dims,
            food: Vec3i::ZERO,
            rng,
        };
        field.respawn_food();
        field
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn food(&self) -> Vec3i {
        self.food
    }

    /// Picks a new food cell, each axis uniform over `0..dim`.
    ///
    /// Cells occupied by the snake are not excluded.
    pub fn respawn_food(&mut self) -> Vec3i {
        let x = self.rng.below(self.dims.width.max(1) as u32) as i32;
        let y = self.rng.below(self.dims.height.max(1) as u32) as i32;
        let z = self.rng.below(self.dims.depth.max(1) as u32) as i32;
        self.food = Vec3i::new(x, y, z);
        log::debug!("food at {:?}", self.food);
        self.food
    }
}
