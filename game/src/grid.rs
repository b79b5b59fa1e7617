use std::ops::{Add, Neg};
use std::time::Duration;

pub const GRID_WIDTH: i32 = 8;
pub const GRID_HEIGHT: i32 = 8;
pub const GRID_DEPTH: i32 = 8;

/// Simulation step length.
pub const TICK_PERIOD: Duration = Duration::from_millis(200);

/// Integer grid coordinate or offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3i {
    pub const ZERO: Vec3i = Vec3i::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

impl Add for Vec3i {
    type Output = Vec3i;

    fn add(self, rhs: Vec3i) -> Vec3i {
        Vec3i::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Neg for Vec3i {
    type Output = Vec3i;

    fn neg(self) -> Vec3i {
        Vec3i::new(-self.x, -self.y, -self.z)
    }
}

/// One of the six unit axis headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    pub const fn to_vec(self) -> Vec3i {
        match self {
            Direction::PosX => Vec3i::new(1, 0, 0),
            Direction::NegX => Vec3i::new(-1, 0, 0),
            Direction::PosY => Vec3i::new(0, 1, 0),
            Direction::NegY => Vec3i::new(0, -1, 0),
            Direction::PosZ => Vec3i::new(0, 0, 1),
            Direction::NegZ => Vec3i::new(0, 0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// True when the two headings sum to the zero vector.
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Default for GridDims {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl GridDims {
    pub const STANDARD: GridDims = GridDims::new(GRID_WIDTH, GRID_HEIGHT, GRID_DEPTH);

    pub const fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn volume(&self) -> usize {
        (self.width.max(0) as usize)
            .saturating_mul(self.height.max(0) as usize)
            .saturating_mul(self.depth.max(0) as usize)
    }

    pub fn contains(&self, p: Vec3i) -> bool {
        (0..self.width).contains(&p.x)
            && (0..self.height).contains(&p.y)
            && (0..self.depth).contains(&p.z)
    }

    /// Toroidal wrap, each axis on its own: `-1` becomes `dim - 1` and `dim` becomes `0`.
    pub fn wrap(&self, p: Vec3i) -> Vec3i {
        Vec3i::new(
            p.x.rem_euclid(self.width),
            p.y.rem_euclid(self.height),
            p.z.rem_euclid(self.depth),
        )
    }
}
