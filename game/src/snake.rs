use crate::field::Field;
use crate::grid::{Direction, GridDims, Vec3i};
use crate::rng::RandomSource;

pub const SPAWN_POSITION: Vec3i = Vec3i::new(1, 1, 0);
pub const RESTART_POSITION: Vec3i = Vec3i::new(1, 1, 1);

// Slack on top of the grid volume so growth can never run out of slots.
const CAPACITY_SLACK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Grew,
    /// The head ran into the body; the snake restarted at [`RESTART_POSITION`].
    Collided,
}

/// The snake body as a ring inside a fixed arena.
///
/// Ring indices wrap modulo the current `length`. Each tick the head index steps one slot left and
/// the new head overwrites the old tail slot, so moving never shifts the body. Only growth shifts
/// elements, to duplicate the tail cell.
///
/// Invariants: `1 <= length <= capacity`, `best_length >= length`, and after every tick
/// `tail == left_of(head)`.
#[derive(Debug, Clone)]
pub struct Snake {
    segments: Box<[Vec3i]>,
    head: usize,
    tail: usize,
    length: usize,
    best_length: usize,
    heading: Direction,
    requested: Direction,
    dims: GridDims,
}

impl Snake {
    /// One segment at [`SPAWN_POSITION`], heading +Y.
    pub fn new(dims: GridDims) -> Self {
        let capacity = dims.volume() + CAPACITY_SLACK;
        let mut snake = Self {
            segments: vec![Vec3i::ZERO; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            length: 1,
            best_length: 1,
            heading: Direction::PosY,
            requested: Direction::PosY,
            dims,
        };
        snake.reset(SPAWN_POSITION);
        snake
    }

    pub fn capacity(&self) -> usize {
        self.segments.len()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn best_length(&self) -> usize {
        self.best_length
    }

    pub fn head(&self) -> Vec3i {
        self.segments[self.head]
    }

    pub fn tail(&self) -> Vec3i {
        self.segments[self.tail]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn requested_heading(&self) -> Direction {
        self.requested
    }

    /// Body cells from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = Vec3i> + '_ {
        (0..self.length).map(move |k| self.segments[(self.head + k) % self.length])
    }

    pub fn occupies(&self, cell: Vec3i) -> bool {
        self.segments[..self.length].contains(&cell)
    }

    /// Back to a single segment at `position`. Headings and best length are kept.
    pub fn reset(&mut self, position: Vec3i) {
        self.segments[..self.length].fill(position);
        self.length = 1;
        self.head = 0;
        self.tail = 0;
    }

    /// Takes effect at the next tick; the last call before a tick wins.
    pub fn set_direction(&mut self, direction: Direction) {
        self.requested = direction;
    }

    fn left_of(&self, index: usize) -> usize {
        if index == 0 { self.length - 1 } else { index - 1 }
    }

    /// Advances one simulation step.
    pub fn update<R: RandomSource>(&mut self, field: &mut Field<R>) -> TickOutcome {
        if !self.requested.is_opposite(self.heading) {
            self.heading = self.requested;
        }

        let next = self.dims.wrap(self.head() + self.heading.to_vec());

        // The tail slot is vacated this tick, so it never counts as a hit.
        let bites = (0..self.length).any(|i| i != self.tail && self.segments[i] == next);
        if bites {
            log::info!(
                "snake hit itself at {next:?} with length {}, best {}",
                self.length,
                self.best_length
            );
            self.reset(RESTART_POSITION);
            return TickOutcome::Collided;
        }

        let mut outcome = TickOutcome::Moved;
        if field.food() == next {
            self.grow();
            field.respawn_food();
            outcome = TickOutcome::Grew;
        }

        self.head = self.left_of(self.head);
        self.tail = self.left_of(self.head);
        self.segments[self.head] = next;
        outcome
    }

    /// Lengthens the body by duplicating the tail cell.
    ///
    /// Slots `tail..length` shift one to the right to open a gap; the head index follows when it
    /// sits right of the tail.
    pub fn grow(&mut self) {
        debug_assert!(self.length < self.capacity(), "snake outgrew its arena");
        if self.length >= self.capacity() {
            return;
        }

        let mut index = self.length;
        while index != self.tail {
            self.segments[index] = self.segments[index - 1];
            index -= 1;
        }

        self.length += 1;
        self.tail += 1;
        if self.head > 0 {
            self.head += 1;
        }
        if self.length > self.best_length {
            self.best_length = self.length;
        }
        log::debug!("snake grew to {}", self.length);
    }
}
