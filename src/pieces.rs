//! Piece definitions and puzzle instances.
//!
//! A piece is a tag, a reference position and a shape. Shapes are lists of
//! offsets from the reference position, normalized so the top-left cell of
//! the bounding box is at the origin.

use std::fmt;
use std::sync::Arc;

use crate::geometry::Vect2;
use crate::grid::{Grid, Symmetry};

/// Identifies a piece: a kind symbol plus an instance number (`A1`, `B3`, ...).
///
/// Only the symbol takes part in state keys, so pieces of one kind are
/// interchangeable for the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceTag {
    pub symbol: u8,
    pub number: u16,
}

impl PieceTag {
    /// Symbols reserved for empty and obstacle cells in state keys.
    pub const RESERVED_SYMBOLS: [u8; 2] = [b'.', b'#'];

    pub const fn new(symbol: u8, number: u16) -> Self {
        Self { symbol, number }
    }
}

impl fmt::Display for PieceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(self.symbol), self.number)
    }
}

/// A piece placed on a board.
///
/// The shape is shared between copies of the board and never mutated. The
/// tag is fixed at construction, so a piece can never carry a reserved symbol:
///
/// ```compile_fail
/// use klotski::{Piece, PieceTag, Vect2};
///
/// let mut piece = Piece::new(PieceTag::new(b'D', 1), Vect2::ZERO, klotski::pieces::SHAPE_UNIT);
/// piece.tag.symbol = b'.';
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    tag: PieceTag,
    pub position: Vect2,
    shape: Arc<[Vect2]>,
}

impl Piece {
    /// Creates a piece.
    ///
    /// # Panics
    ///
    /// Panics if the tag symbol is one of [`PieceTag::RESERVED_SYMBOLS`] or is
    /// not printable ASCII, since keys store one byte per cell. Also panics
    /// if the shape has no cells.
    pub fn new(tag: PieceTag, position: Vect2, shape: impl Into<Arc<[Vect2]>>) -> Self {
        assert!(
            tag.symbol.is_ascii_graphic() && !PieceTag::RESERVED_SYMBOLS.contains(&tag.symbol),
            "piece symbol {:?} cannot be used in state keys",
            char::from(tag.symbol)
        );
        let shape: Arc<[Vect2]> = shape.into();
        assert!(!shape.is_empty(), "piece {tag} has an empty shape");
        Self {
            tag,
            position,
            shape,
        }
    }

    pub fn tag(&self) -> PieceTag {
        self.tag
    }

    pub fn shape(&self) -> &[Vect2] {
        &self.shape
    }

    /// Absolute cells covered by this piece, in shape order.
    pub fn cells(&self) -> impl Iterator<Item = Vect2> + '_ {
        self.shape.iter().map(move |&offset| self.position + offset)
    }

    /// Returns this piece reflected left-right on a board of the given width.
    pub fn mirrored(&self, width: i32) -> Self {
        let shape: Vec<Vect2> = self.shape.iter().map(|o| Vect2::new(-o.x, o.y)).collect();
        Self {
            tag: self.tag,
            position: Vect2::new(width - 1 - self.position.x, self.position.y),
            shape: shape.into(),
        }
    }

    /// Size of the shape's bounding box, in cells.
    pub fn extent(&self) -> (i32, i32) {
        let (min, max) = self.bounds();
        (max.x - min.x + 1, max.y - min.y + 1)
    }

    /// Minimum and maximum offsets of the shape.
    pub fn bounds(&self) -> (Vect2, Vect2) {
        let mut min = Vect2::new(i32::MAX, i32::MAX);
        let mut max = Vect2::new(i32::MIN, i32::MIN);
        for offset in self.shape.iter() {
            min = Vect2::new(min.x.min(offset.x), min.y.min(offset.y));
            max = Vect2::new(max.x.max(offset.x), max.y.max(offset.y));
        }
        (min, max)
    }

    /// True if the shape exactly fills its bounding box.
    pub fn is_rectangular(&self) -> bool {
        let (w, h) = self.extent();
        (w * h) as usize == self.shape.len()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece {} @ {}", self.tag, self.position)
    }
}

/// A puzzle instance: starting board, goal predicate and the symmetry that
/// may be used to merge equivalent states.
pub struct Puzzle {
    pub name: &'static str,
    pub initial: Grid,
    pub goal: fn(&Grid) -> bool,
    pub symmetry: Symmetry,
}

/// 2x2 square.
pub const SHAPE_SQUARE: &[Vect2] = &[
    Vect2::new(0, 0),
    Vect2::new(1, 0),
    Vect2::new(0, 1),
    Vect2::new(1, 1),
];

/// 1x2 vertical bar.
pub const SHAPE_TALL: &[Vect2] = &[Vect2::new(0, 0), Vect2::new(0, 1)];

/// 2x1 horizontal bar.
pub const SHAPE_WIDE: &[Vect2] = &[Vect2::new(0, 0), Vect2::new(1, 0)];

/// Single cell.
pub const SHAPE_UNIT: &[Vect2] = &[Vect2::new(0, 0)];

/// Tag of the large Klotski block that has to reach the exit.
pub const KLOTSKI_TARGET: PieceTag = PieceTag::new(b'A', 1);

/// Where the large block sits once it is in front of the exit.
pub const KLOTSKI_EXIT: Vect2 = Vect2::new(1, 3);

/// The classic Klotski layout on a 4x5 board.
///
/// ```text
/// B1 A1 A1 B2
/// B1 A1 A1 B2
/// B3 C1 C1 B4
/// B3 D2 D3 B4
/// D1 ** ** D4
/// ```
pub fn klotski() -> Puzzle {
    let square: Arc<[Vect2]> = SHAPE_SQUARE.into();
    let tall: Arc<[Vect2]> = SHAPE_TALL.into();
    let wide: Arc<[Vect2]> = SHAPE_WIDE.into();
    let unit: Arc<[Vect2]> = SHAPE_UNIT.into();

    let initial = Grid::new(
        4,
        5,
        vec![
            Piece::new(KLOTSKI_TARGET, Vect2::new(1, 0), square),
            Piece::new(PieceTag::new(b'B', 1), Vect2::new(0, 0), tall.clone()),
            Piece::new(PieceTag::new(b'B', 2), Vect2::new(3, 0), tall.clone()),
            Piece::new(PieceTag::new(b'B', 3), Vect2::new(0, 2), tall.clone()),
            Piece::new(PieceTag::new(b'B', 4), Vect2::new(3, 2), tall),
            Piece::new(PieceTag::new(b'C', 1), Vect2::new(1, 2), wide),
            Piece::new(PieceTag::new(b'D', 1), Vect2::new(0, 4), unit.clone()),
            Piece::new(PieceTag::new(b'D', 2), Vect2::new(1, 3), unit.clone()),
            Piece::new(PieceTag::new(b'D', 3), Vect2::new(2, 3), unit.clone()),
            Piece::new(PieceTag::new(b'D', 4), Vect2::new(3, 4), unit),
        ],
    );

    Puzzle {
        name: "klotski",
        initial,
        goal: klotski_is_solved,
        symmetry: Symmetry::Horizontal,
    }
}

/// The large block is in front of the exit at the bottom of the board.
pub fn klotski_is_solved(grid: &Grid) -> bool {
    grid.piece(KLOTSKI_TARGET)
        .is_some_and(|piece| piece.position == KLOTSKI_EXIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_klotski_start_is_valid_and_unsolved() {
        let puzzle = klotski();
        assert!(puzzle.initial.validate().is_ok());
        assert!(!(puzzle.goal)(&puzzle.initial));
    }

    #[test]
    fn test_klotski_leaves_two_free_cells() {
        let puzzle = klotski();
        let covered: usize = puzzle.initial.pieces().iter().map(|p| p.shape().len()).sum();
        assert_eq!(covered, 4 * 5 - 2);
    }

    #[test]
    fn test_mirrored_piece_covers_reflected_cells() {
        let piece = Piece::new(PieceTag::new(b'L', 1), Vect2::new(0, 1), vec![
            Vect2::new(0, 0),
            Vect2::new(0, 1),
            Vect2::new(1, 1),
        ]);
        let mirrored = piece.mirrored(4);
        let mut cells: Vec<Vect2> = mirrored.cells().collect();
        cells.sort();
        assert_eq!(
            cells,
            vec![Vect2::new(2, 2), Vect2::new(3, 1), Vect2::new(3, 2)]
        );
    }

    #[test]
    fn test_rectangular_shapes() {
        let square = Piece::new(PieceTag::new(b'A', 1), Vect2::ZERO, SHAPE_SQUARE);
        assert!(square.is_rectangular());
        assert_eq!(square.extent(), (2, 2));

        let corner = Piece::new(PieceTag::new(b'L', 1), Vect2::ZERO, vec![
            Vect2::new(0, 0),
            Vect2::new(1, 0),
            Vect2::new(0, 1),
        ]);
        assert!(!corner.is_rectangular());
    }

    #[test]
    #[should_panic(expected = "cannot be used in state keys")]
    fn test_reserved_symbol_is_rejected() {
        Piece::new(PieceTag::new(b'#', 1), Vect2::ZERO, SHAPE_UNIT);
    }

    #[test]
    #[should_panic(expected = "empty shape")]
    fn test_empty_shape_is_rejected() {
        Piece::new(PieceTag::new(b'E', 1), Vect2::ZERO, Vec::<Vect2>::new());
    }

    #[test]
    fn test_bounds_of_offset_shape() {
        let piece = Piece::new(PieceTag::new(b'B', 1), Vect2::new(2, 2), SHAPE_TALL);
        assert_eq!(piece.bounds(), (Vect2::ZERO, Vect2::new(0, 1)));
        assert_eq!(piece.extent(), (1, 2));
        assert_eq!(piece.tag(), PieceTag::new(b'B', 1));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(PieceTag::new(b'B', 3).to_string(), "B3");
    }
}
