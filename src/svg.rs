//! SVG diagrams of boards and solutions.
//!
//! A solution is drawn as a sequence of panels: the starting board, one panel
//! per move (showing the board before the move, with the moving piece marked
//! by an arrow) and the final board. Panels wrap after [`PANELS_PER_ROW`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::{Step, Vect2};
use crate::grid::{Grid, Move};
use crate::pieces::Piece;

/// Gap between cells and around the board edge.
const CELL_GAP: f64 = 4.0;
/// Gap between panels.
const PANEL_GAP: f64 = 16.0;
/// Side length of one cell.
const UNIT_SIZE: f64 = 20.0;
/// Vertical room reserved above a panel for its title.
const TITLE_HEIGHT: f64 = 12.0;
/// Half-pixel shift so 1px strokes land on pixel boundaries.
const PIXEL_OFFSET: f64 = 0.5;
const BORDER_RADIUS: f64 = 2.0;
pub const PANELS_PER_ROW: usize = 10;

const FONT_FAMILY: &str = "'Consolas','PT Mono','DejaVu Serif Mono',monospace";
const FONT_SIZE: &str = "16";
const TEXT_COLOR: &str = "#0d1e26";
const ARROW_COLOR: &str = "#ffffff";
const GRID_FILL: &str = "#ecf4f9";
const GRID_STROKE: &str = "#8f9ca3";
const OBSTACLE_FILL: &str = "#586e75";

/// Fill and stroke colors for one piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PieceColors {
    fill: &'static str,
    stroke: &'static str,
}

const SIMPLE_HIGHLIGHT: PieceColors = PieceColors {
    fill: "#00aaff",
    stroke: "#0d1e26",
};
const SIMPLE_IDLE: PieceColors = PieceColors {
    fill: "#8f9ca3",
    stroke: "#0d1e26",
};

/// Colors assigned to piece kinds in order of first appearance.
const PALETTE: [PieceColors; 8] = [
    PieceColors { fill: "#ec433b", stroke: "#dc322f" },
    PieceColors { fill: "#93a707", stroke: "#859900" },
    PieceColors { fill: "#3b98e0", stroke: "#268bd2" },
    PieceColors { fill: "#e5b01a", stroke: "#dba700" },
    PieceColors { fill: "#a66bbe", stroke: "#6c71c4" },
    PieceColors { fill: "#2aa198", stroke: "#1f8a80" },
    PieceColors { fill: "#d33682", stroke: "#b52a6f" },
    PieceColors { fill: "#cb4b16", stroke: "#a83c10" },
];

/// Visual style of a diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// Grey pieces; the moving piece is highlighted.
    Simple,
    /// One color per piece kind.
    #[default]
    Colorful,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Simple, Style::Colorful];

    pub const fn name(self) -> &'static str {
        match self {
            Style::Simple => "simple",
            Style::Colorful => "colorful",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported style {0:?} (expected \"simple\" or \"colorful\")")]
pub struct UnsupportedStyle(pub String);

impl FromStr for Style {
    type Err = UnsupportedStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedStyle(s.to_string()))
    }
}

/// Panel geometry for boards of one size, plus the color assignment.
struct Renderer {
    width: i32,
    height: i32,
    style: Style,
    /// Piece kind symbols in order of first appearance.
    kinds: Vec<u8>,
}

impl Renderer {
    fn new(grid: &Grid, style: Style) -> Self {
        let mut kinds = Vec::new();
        for piece in grid.pieces() {
            if !kinds.contains(&piece.tag().symbol) {
                kinds.push(piece.tag().symbol);
            }
        }
        Self {
            width: grid.width(),
            height: grid.height(),
            style,
            kinds,
        }
    }

    /// Size of one board panel, excluding or including its title.
    fn panel_size(&self, with_title: bool) -> (f64, f64) {
        let x = CELL_GAP + self.width as f64 * (UNIT_SIZE + CELL_GAP);
        let mut y = CELL_GAP + self.height as f64 * (UNIT_SIZE + CELL_GAP);
        if with_title {
            y += TITLE_HEIGHT;
        }
        (x, y)
    }

    fn document_size(&self, panel_count: usize, with_title: bool) -> (f64, f64) {
        let columns = panel_count.min(PANELS_PER_ROW);
        let rows = panel_count.div_ceil(PANELS_PER_ROW).max(1);
        let (panel_x, panel_y) = self.panel_size(with_title);
        (
            PANEL_GAP + columns as f64 * (panel_x + PANEL_GAP),
            PANEL_GAP + rows as f64 * (panel_y + PANEL_GAP),
        )
    }

    /// Top-left corner of the board inside the panel at `index`.
    fn panel_origin(&self, index: usize, with_title: bool) -> (f64, f64) {
        let (column, row) = (index % PANELS_PER_ROW, index / PANELS_PER_ROW);
        let (panel_x, panel_y) = self.panel_size(with_title);
        let title = if with_title { TITLE_HEIGHT } else { 0.0 };
        (
            PIXEL_OFFSET + PANEL_GAP + column as f64 * (panel_x + PANEL_GAP),
            PIXEL_OFFSET + PANEL_GAP + title + row as f64 * (panel_y + PANEL_GAP),
        )
    }

    /// Top-left corner of a cell, relative to the board.
    fn cell_origin(cell: Vect2) -> (f64, f64) {
        (
            CELL_GAP + cell.x as f64 * (UNIT_SIZE + CELL_GAP),
            CELL_GAP + cell.y as f64 * (UNIT_SIZE + CELL_GAP),
        )
    }

    fn colors(&self, piece: &Piece, highlighted: bool) -> PieceColors {
        match self.style {
            Style::Simple if highlighted => SIMPLE_HIGHLIGHT,
            Style::Simple => SIMPLE_IDLE,
            Style::Colorful => {
                let kind = self
                    .kinds
                    .iter()
                    .position(|&symbol| symbol == piece.tag().symbol)
                    .unwrap_or(0);
                PALETTE[kind % PALETTE.len()]
            }
        }
    }

    fn render_panel(
        &self,
        output: &mut String,
        index: usize,
        grid: &Grid,
        mv: Option<Move>,
        title: Option<&str>,
    ) {
        let (x, y) = self.panel_origin(index, title.is_some());
        output.push_str(&format!("<g transform=\"translate({x} {y})\">\n"));

        let (board_x, board_y) = self.panel_size(false);
        output.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{board_x}\" height=\"{board_y}\" rx=\"{BORDER_RADIUS}\" \
             fill=\"{GRID_FILL}\" stroke=\"{GRID_STROKE}\" stroke-width=\"1\"/>\n"
        ));
        if let Some(title) = title {
            output.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"{TEXT_COLOR}\" \
                 font-family=\"{FONT_FAMILY}\" font-size=\"{FONT_SIZE}\">{title}</text>\n",
                board_x * 0.5,
                TITLE_HEIGHT * -0.5,
            ));
        }

        for &cell in grid.obstacles() {
            let (cell_x, cell_y) = Self::cell_origin(cell);
            output.push_str(&format!(
                "<rect x=\"{cell_x}\" y=\"{cell_y}\" width=\"{UNIT_SIZE}\" height=\"{UNIT_SIZE}\" \
                 fill=\"{OBSTACLE_FILL}\"/>\n"
            ));
        }

        for (piece_index, piece) in grid.pieces().iter().enumerate() {
            let step = mv
                .filter(|mv| mv.piece_index == piece_index)
                .map(|mv| mv.step);
            self.render_piece(output, piece, step);
        }

        output.push_str("</g>\n");
    }

    fn render_piece(&self, output: &mut String, piece: &Piece, step: Option<Step>) {
        let colors = self.colors(piece, step.is_some());
        let stroke = format!(
            "rx=\"{BORDER_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"",
            colors.fill, colors.stroke
        );

        let (min, _) = piece.bounds();
        let (origin_x, origin_y) = Self::cell_origin(piece.position + min);
        let (extent_x, extent_y) = piece.extent();
        let size_x = extent_x as f64 * UNIT_SIZE + (extent_x - 1) as f64 * CELL_GAP;
        let size_y = extent_y as f64 * UNIT_SIZE + (extent_y - 1) as f64 * CELL_GAP;

        if piece.is_rectangular() {
            output.push_str(&format!(
                "<rect x=\"{origin_x}\" y=\"{origin_y}\" width=\"{size_x}\" height=\"{size_y}\" {stroke}/>\n"
            ));
        } else {
            for cell in piece.cells() {
                let (cell_x, cell_y) = Self::cell_origin(cell);
                output.push_str(&format!(
                    "<rect x=\"{cell_x}\" y=\"{cell_y}\" width=\"{UNIT_SIZE}\" height=\"{UNIT_SIZE}\" {stroke}/>\n"
                ));
            }
        }

        if let Some(step) = step {
            output.push_str(&format!(
                "<path d=\"{}\" fill=\"{ARROW_COLOR}\" transform=\"translate({} {})\"/>\n",
                arrow_path(step),
                origin_x + size_x * 0.5,
                origin_y + size_y * 0.5,
            ));
        }
    }
}

/// Triangle pointing in the step direction, centred on the origin.
fn arrow_path(step: Step) -> &'static str {
    match step {
        Step::Up => "M 0 -6 L -6 4 L 6 4 Z",
        Step::Down => "M 0 6 L -6 -4 L 6 -4 Z",
        Step::Left => "M -6 0 L 4 -6 L 4 6 Z",
        Step::Right => "M 6 0 L -4 -6 L -4 6 Z",
    }
}

fn document_header(output: &mut String, width: f64, height: f64) {
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    ));
}

/// Renders a single board without a title.
pub fn render_grid(grid: &Grid, style: Style) -> String {
    let renderer = Renderer::new(grid, style);
    let (width, height) = renderer.document_size(1, false);

    let mut output = String::new();
    document_header(&mut output, width, height);
    renderer.render_panel(&mut output, 0, grid, None, None);
    output.push_str("</svg>\n");
    output
}

/// Renders the starting board, every intermediate move and the final board.
///
/// Moves must refer to pieces of `grid`.
pub fn render_solution(grid: &Grid, moves: &[Move], style: Style) -> String {
    let renderer = Renderer::new(grid, style);
    let panel_count = moves.len() + 2;
    let (width, height) = renderer.document_size(panel_count, true);

    let mut output = String::new();
    document_header(&mut output, width, height);

    let mut current = grid.clone();
    renderer.render_panel(&mut output, 0, &current, None, Some("start"));
    for (index, &mv) in moves.iter().enumerate() {
        let title = format!("step {}", index + 1);
        renderer.render_panel(&mut output, index + 1, &current, Some(mv), Some(&title));
        current.apply_mut(mv);
    }
    renderer.render_panel(&mut output, panel_count - 1, &current, None, Some("end"));

    output.push_str("</svg>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{klotski, PieceTag, SHAPE_UNIT};

    fn single_cell_board() -> Grid {
        Grid::new(
            2,
            1,
            vec![Piece::new(PieceTag::new(b'D', 1), Vect2::ZERO, SHAPE_UNIT)],
        )
    }

    #[test]
    fn test_render_single_board() {
        insta::assert_snapshot!(render_grid(&single_cell_board(), Style::Simple), @r##"
        <?xml version="1.0" encoding="UTF-8"?>
        <svg width="84" height="60" xmlns="http://www.w3.org/2000/svg">
        <g transform="translate(16.5 16.5)">
        <rect x="0" y="0" width="52" height="28" rx="2" fill="#ecf4f9" stroke="#8f9ca3" stroke-width="1"/>
        <rect x="4" y="4" width="20" height="20" rx="2" fill="#8f9ca3" stroke="#0d1e26" stroke-width="1"/>
        </g>
        </svg>
        "##);
    }

    #[test]
    fn test_solution_has_one_panel_per_state() {
        let grid = single_cell_board();
        let svg = render_solution(&grid, &[Move::new(0, Step::Right)], Style::Simple);

        assert_eq!(svg.matches("<g ").count(), 3);
        assert!(svg.contains(">start</text>"));
        assert!(svg.contains(">step 1</text>"));
        assert!(svg.contains(">end</text>"));
        // the moving piece is highlighted and carries an arrow
        assert!(svg.contains("fill=\"#00aaff\""));
        assert!(svg.contains(arrow_path(Step::Right)));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_panels_wrap_after_a_full_row() {
        let renderer = Renderer::new(&klotski().initial, Style::Colorful);
        let (first_x, first_y) = renderer.panel_origin(0, true);
        let (wrapped_x, wrapped_y) = renderer.panel_origin(PANELS_PER_ROW, true);
        assert_eq!(first_x, wrapped_x);
        assert!(wrapped_y > first_y);

        let (_, one_row) = renderer.document_size(PANELS_PER_ROW, true);
        let (_, two_rows) = renderer.document_size(PANELS_PER_ROW + 1, true);
        assert!(two_rows > one_row);
    }

    #[test]
    fn test_colorful_assigns_colors_per_kind() {
        let grid = klotski().initial;
        let renderer = Renderer::new(&grid, Style::Colorful);
        let pieces = grid.pieces();
        // B1 and B4 share a kind, A1 does not
        assert_eq!(renderer.colors(&pieces[1], false), renderer.colors(&pieces[4], true));
        assert_ne!(renderer.colors(&pieces[0], false), renderer.colors(&pieces[1], false));
    }

    #[test]
    fn test_non_rectangular_piece_is_drawn_cell_by_cell() {
        let corner = Piece::new(PieceTag::new(b'L', 1), Vect2::ZERO, vec![
            Vect2::new(0, 0),
            Vect2::new(1, 0),
            Vect2::new(0, 1),
        ]);
        let grid = Grid::new(2, 2, vec![corner]);
        let svg = render_grid(&grid, Style::Colorful);
        // board background plus three cells
        assert_eq!(svg.matches("<rect ").count(), 4);
    }

    #[test]
    fn test_parse_style() {
        assert_eq!("colorful".parse::<Style>(), Ok(Style::Colorful));
        assert_eq!("SIMPLE".parse::<Style>(), Ok(Style::Simple));
        assert!("neon".parse::<Style>().is_err());
    }
}
