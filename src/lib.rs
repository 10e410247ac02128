//! Sliding Block Puzzle Solver Library
//!
//! Finds shortest solutions to sliding block puzzles such as Klotski by
//! breadth-first search over board states. States that differ only by which
//! interchangeable piece sits where, or (optionally) by a left-right mirror,
//! are merged before they are explored.

pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod search_tree;
pub mod solver;
pub mod svg;

pub use geometry::{Step, Vect2};
pub use grid::{Cell, Cells, Grid, Move, PlacementError, Symmetry, UnsupportedSymmetry};
pub use pieces::{Piece, PieceTag, Puzzle};
pub use solver::{solve, solve_with_limits, SearchLimits, Solution, SolveError, SolveStats};
pub use svg::Style;
