//! Integer pixel and tile coordinates with component-wise arithmetic

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A `(x, y)` integer pair; `x` is the column, `y` the row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Column component
    pub x: i32,
    /// Row component
    pub y: i32,
}

impl Coord {
    /// Create a coordinate from its column and row components
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Swap the column and row components
    pub const fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl Add for Coord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Coord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
