//! 2D displacement vectors and the four unit steps.
//!
//! Board coordinates grow rightwards (x) and downwards (y), so `Up` is a
//! negative y displacement.

use std::fmt;
use std::ops::{Add, Neg};

/// An integer displacement or cell position on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vect2 {
    pub x: i32,
    pub y: i32,
}

impl Vect2 {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vect2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Neg for Vect2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Vect2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vect2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves a piece can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    /// All steps, in the order the solver expands them.
    ///
    /// The order decides which of several equally short solutions is returned.
    pub const ALL: [Step; 4] = [Step::Up, Step::Down, Step::Left, Step::Right];

    /// Unit displacement of this step.
    #[inline(always)]
    pub const fn vector(self) -> Vect2 {
        match self {
            Step::Up => Vect2::new(0, -1),
            Step::Down => Vect2::new(0, 1),
            Step::Left => Vect2::new(-1, 0),
            Step::Right => Vect2::new(1, 0),
        }
    }

    /// Arrow used when printing move lists.
    pub const fn symbol(self) -> char {
        match self {
            Step::Up => '↑',
            Step::Down => '↓',
            Step::Left => '←',
            Step::Right => '→',
        }
    }

    pub const fn opposite(self) -> Step {
        match self {
            Step::Up => Step::Down,
            Step::Down => Step::Up,
            Step::Left => Step::Right,
            Step::Right => Step::Left,
        }
    }

    /// Stable numeric code used by the binary solution format.
    pub const fn code(self) -> u8 {
        match self {
            Step::Up => 0,
            Step::Down => 1,
            Step::Left => 2,
            Step::Right => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<Step> {
        match code {
            0 => Some(Step::Up),
            1 => Some(Step::Down),
            2 => Some(Step::Left),
            3 => Some(Step::Right),
            _ => None,
        }
    }
}

impl Neg for Step {
    type Output = Self;

    fn neg(self) -> Self {
        self.opposite()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Up => "up",
            Step::Down => "down",
            Step::Left => "left",
            Step::Right => "right",
        })
    }
}
