//! Cardinal directions, quarter-turn rotations and per-direction value maps
//!
//! Both [`Direction`] and [`Rotation`] are cyclic groups of order four. A
//! [`DirectionMap`] stores one value per edge of a tile and can be rotated as
//! a whole, which is how oriented tile deployments are derived.

use std::fmt;

/// One of the four edges of a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards decreasing column
    Left,
    /// Towards decreasing row
    Up,
    /// Towards increasing row
    Down,
    /// Towards increasing column
    Right,
}

impl Direction {
    /// All directions in declaration order
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Down, Self::Right];

    /// The direction facing the other way (UP ↔ DOWN, LEFT ↔ RIGHT)
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
        }
    }

    /// Next direction moving clockwise (UP → RIGHT → DOWN → LEFT)
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Next direction moving anticlockwise (UP → LEFT → DOWN → RIGHT)
    #[must_use]
    pub const fn anticlockwise(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Row and column delta of one step in this direction
    pub const fn offset(self) -> [isize; 2] {
        match self {
            Self::Left => [0, -1],
            Self::Up => [-1, 0],
            Self::Down => [1, 0],
            Self::Right => [0, 1],
        }
    }

    /// Lowercase name as used in rule files
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Up => "up",
            Self::Down => "down",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orientation of a deployed tile relative to how it was authored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rotation {
    /// As authored
    #[default]
    None,
    /// One quarter turn clockwise
    Clockwise,
    /// Two quarter turns
    Half,
    /// One quarter turn anticlockwise
    Anticlockwise,
}

impl Rotation {
    /// All rotations in increasing clockwise order
    pub const ALL: [Self; 4] = [Self::None, Self::Clockwise, Self::Half, Self::Anticlockwise];

    /// Number of clockwise quarter turns this rotation represents
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Clockwise => 1,
            Self::Half => 2,
            Self::Anticlockwise => 3,
        }
    }

    /// Rotation equivalent to the given number of clockwise quarter turns
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::None,
            1 => Self::Clockwise,
            2 => Self::Half,
            _ => Self::Anticlockwise,
        }
    }

    /// Rotation after one further clockwise quarter turn
    #[must_use]
    pub const fn clockwise(self) -> Self {
        self.compose(Self::Clockwise)
    }

    /// Rotation after one further anticlockwise quarter turn
    #[must_use]
    pub const fn anticlockwise(self) -> Self {
        self.compose(Self::Anticlockwise)
    }

    /// Group composition: apply `self` then `other`
    #[must_use]
    pub const fn compose(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// The rotation undoing this one
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Lowercase name as used in rule files
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Clockwise => "clockwise",
            Self::Half => "half",
            Self::Anticlockwise => "anticlockwise",
        }
    }

    /// Parse a rule-file rotation name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rotation| rotation.name() == name)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for each of the four directions
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DirectionMap<T> {
    /// Value for the left edge
    pub left: T,
    /// Value for the top edge
    pub up: T,
    /// Value for the bottom edge
    pub down: T,
    /// Value for the right edge
    pub right: T,
}

impl<T> DirectionMap<T> {
    /// Build a map by evaluating `f` for every direction
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            left: f(Direction::Left),
            up: f(Direction::Up),
            down: f(Direction::Down),
            right: f(Direction::Right),
        }
    }

    /// Value stored for `direction`
    pub const fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Left => &self.left,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Right => &self.right,
        }
    }

    /// Mutable value stored for `direction`
    pub const fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Right => &mut self.right,
        }
    }

    /// Iterate `(direction, value)` pairs in [`Direction::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, self.get(direction)))
    }
}

impl<T: Clone> DirectionMap<T> {
    /// Contents as seen after physically turning the tile by `rotation`
    ///
    /// One clockwise step moves the UP edge to RIGHT, RIGHT to DOWN, DOWN to
    /// LEFT and LEFT to UP, i.e. `new[d] = old[d.anticlockwise()]`.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut current = self.clone();
        let mut applied = Rotation::None;
        while applied != rotation {
            current = Self::from_fn(|direction| current.get(direction.anticlockwise()).clone());
            applied = applied.compose(Rotation::Clockwise);
        }
        current
    }
}
