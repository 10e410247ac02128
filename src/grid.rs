//! Board representation, placement validation and state keys.
//!
//! A [`Grid`] only stores piece positions. Validating it resolves the pieces
//! into a [`Cells`] occupancy map, which is then serialized into a state key
//! with one byte per cell. Keys are what the search uses for deduplication.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::{Step, Vect2};
use crate::pieces::{Piece, PieceTag};

/// Key byte for an empty cell.
const EMPTY_SYMBOL: u8 = b'.';
/// Key byte for an obstacle cell.
const OBSTACLE_SYMBOL: u8 = b'#';

/// One atomic transition: move the piece at `piece_index` by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece_index: usize,
    pub step: Step,
}

impl Move {
    pub const fn new(piece_index: usize, step: Step) -> Self {
        Self { piece_index, step }
    }

    /// The move that undoes this one.
    pub const fn inverse(self) -> Self {
        Self::new(self.piece_index, self.step.opposite())
    }
}

/// Content of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Obstacle,
    Piece(PieceTag),
}

impl Cell {
    /// Byte stored in state keys. Piece instance numbers are dropped.
    #[inline(always)]
    pub const fn symbol(self) -> u8 {
        match self {
            Cell::Empty => EMPTY_SYMBOL,
            Cell::Obstacle => OBSTACLE_SYMBOL,
            Cell::Piece(tag) => tag.symbol,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => f.write_str("**"),
            Cell::Obstacle => f.write_str("##"),
            Cell::Piece(tag) => write!(f, "{tag}"),
        }
    }
}

/// Why a board is not a legal placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{piece} covers cell {cell}, outside the {width}x{height} board")]
    OutOfBounds {
        piece: PieceTag,
        cell: Vect2,
        width: i32,
        height: i32,
    },
    #[error("obstacle at {cell} lies outside the {width}x{height} board")]
    ObstacleOutOfBounds { cell: Vect2, width: i32, height: i32 },
    #[error("{piece} overlaps {occupant} at cell {cell}")]
    Overlap {
        piece: PieceTag,
        occupant: Cell,
        cell: Vect2,
    },
}

/// Board symmetry used when computing state keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Every layout is its own state.
    None,
    /// A layout and its left-right mirror image are the same state.
    #[default]
    Horizontal,
}

impl Symmetry {
    pub const ALL: [Symmetry; 2] = [Symmetry::None, Symmetry::Horizontal];

    pub const fn name(self) -> &'static str {
        match self {
            Symmetry::None => "none",
            Symmetry::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A symmetry name that does not correspond to any supported mode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported symmetry {0:?} (expected \"none\" or \"horizontal\")")]
pub struct UnsupportedSymmetry(pub String);

impl FromStr for Symmetry {
    type Err = UnsupportedSymmetry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symmetry::ALL
            .into_iter()
            .find(|symmetry| symmetry.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedSymmetry(s.to_string()))
    }
}

/// Occupancy map produced by [`Grid::validate`], stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cells {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

/// Number of cells on a board, with negative sizes counting as zero.
fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

impl Cells {
    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; cell_count(width, height)],
        }
    }

    #[inline(always)]
    fn contains(&self, cell: Vect2) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    #[inline(always)]
    fn index(&self, cell: Vect2) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    /// Returns the content of a cell, or `None` outside the board.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let cell = Vect2::new(x, y);
        self.contains(cell).then(|| self.cells[self.index(cell)])
    }

    /// Returns one row, left to right.
    pub fn row(&self, y: i32) -> &[Cell] {
        let width = self.width.max(0) as usize;
        let start = y as usize * width;
        &self.cells[start..start + width]
    }

    /// Computes the state key of this map under the given symmetry.
    ///
    /// The plain key is the row-major list of cell symbols. With horizontal
    /// symmetry the key of the mirrored map is computed as well and the
    /// lexicographically smaller of the two is kept.
    pub fn key(&self, symmetry: Symmetry) -> Vec<u8> {
        let plain: Vec<u8> = self.cells.iter().map(|cell| cell.symbol()).collect();
        match symmetry {
            Symmetry::None => plain,
            Symmetry::Horizontal => {
                let mirrored: Vec<u8> = (0..self.height)
                    .flat_map(|y| self.row(y).iter().rev().map(|cell| cell.symbol()))
                    .collect();
                plain.min(mirrored)
            }
        }
    }
}

/// A rectangular board holding pieces and fixed obstacles.
///
/// Pieces are addressed by index, and moves never reorder them. Cloning a
/// grid yields an independent board (shapes are shared, positions are not).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    pieces: Vec<Piece>,
    obstacles: Vec<Vect2>,
}

impl Grid {
    pub fn new(width: i32, height: i32, pieces: Vec<Piece>) -> Self {
        Self {
            width,
            height,
            pieces,
            obstacles: Vec::new(),
        }
    }

    /// Adds fixed cells that no piece may enter.
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Vect2>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn obstacles(&self) -> &[Vect2] {
        &self.obstacles
    }

    /// Finds a piece by its tag.
    pub fn piece(&self, tag: PieceTag) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.tag() == tag)
    }

    /// Resolves the board into an occupancy map.
    ///
    /// Obstacles are placed first, then pieces in index order. The first
    /// cell that falls outside the board or onto an occupied cell fails the
    /// whole placement.
    pub fn validate(&self) -> Result<Cells, PlacementError> {
        let mut cells = Cells::empty(self.width, self.height);

        for &cell in &self.obstacles {
            if !cells.contains(cell) {
                return Err(PlacementError::ObstacleOutOfBounds {
                    cell,
                    width: self.width,
                    height: self.height,
                });
            }
            let index = cells.index(cell);
            cells.cells[index] = Cell::Obstacle;
        }

        for piece in &self.pieces {
            for cell in piece.cells() {
                if !cells.contains(cell) {
                    return Err(PlacementError::OutOfBounds {
                        piece: piece.tag(),
                        cell,
                        width: self.width,
                        height: self.height,
                    });
                }

                let index = cells.index(cell);
                let occupant = cells.cells[index];
                if occupant != Cell::Empty {
                    return Err(PlacementError::Overlap {
                        piece: piece.tag(),
                        occupant,
                        cell,
                    });
                }
                cells.cells[index] = Cell::Piece(piece.tag());
            }
        }

        Ok(cells)
    }

    /// Returns a copy of this board with the move applied.
    ///
    /// The result is not validated.
    ///
    /// # Panics
    ///
    /// Panics if the move refers to a piece index this board does not have.
    pub fn apply(&self, mv: Move) -> Grid {
        let mut next = self.clone();
        next.apply_mut(mv);
        next
    }

    /// Applies a move in place, without validation.
    pub fn apply_mut(&mut self, mv: Move) {
        let piece = &mut self.pieces[mv.piece_index];
        piece.position = piece.position + mv.step.vector();
    }

    /// Returns the board reflected left-right.
    pub fn mirrored(&self) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            pieces: self
                .pieces
                .iter()
                .map(|piece| piece.mirrored(self.width))
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|cell| Vect2::new(self.width - 1 - cell.x, cell.y))
                .collect(),
        }
    }

    /// Formats a move as the moved piece's tag followed by an arrow (`A1↓`).
    pub fn describe_move(&self, mv: Move) -> String {
        match self.pieces.get(mv.piece_index) {
            Some(piece) => format!("{}{}", piece.tag(), mv.step.symbol()),
            None => format!("#{}{}", mv.piece_index, mv.step.symbol()),
        }
    }

    /// Formats a list of moves separated by spaces.
    pub fn describe_moves(&self, moves: &[Move]) -> String {
        moves
            .iter()
            .map(|&mv| self.describe_move(mv))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(cells) = self.validate() else {
            return f.write_str("|  INVALID");
        };

        for y in 0..self.height {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str("|")?;
            for cell in cells.row(y) {
                write!(f, "  {cell}")?;
            }
        }
        Ok(())
    }
}
