//! File I/O for saving and loading solved puzzles.
//!
//! A solution is saved as three files in one directory:
//! - `solution.txt`: every board along the way, in text form
//! - `solution.svg`: the diagram from [`crate::svg::render_solution`]
//! - `solution.bin`: the move list, for the viewer
//!
//! Binary format for `solution.bin` (little endian):
//! - u32: move count
//! - repeat per move:
//!   - u32: piece index (0-based)
//!   - u8: step code (see [`Step::code`])

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::geometry::Step;
use crate::grid::{Grid, Move};
use crate::svg::{render_solution, Style};

pub const SOLUTION_BIN: &str = "solution.bin";
pub const SOLUTION_TXT: &str = "solution.txt";
pub const SOLUTION_SVG: &str = "solution.svg";

/// Saves a solution as text, SVG and binary files under `dir`.
pub fn save(dir: &Path, initial: &Grid, moves: &[Move], style: Style) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    save_text(&dir.join(SOLUTION_TXT), initial, moves)?;
    std::fs::write(dir.join(SOLUTION_SVG), render_solution(initial, moves, style))?;
    save_binary(&dir.join(SOLUTION_BIN), moves)?;
    Ok(())
}

/// Writes every intermediate board, then the full move list.
fn save_text(path: &Path, initial: &Grid, moves: &[Move]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let mut grid = initial.clone();

    writeln!(file, "Initial board:\n{grid}\n")?;
    for (i, &mv) in moves.iter().enumerate() {
        let description = grid.describe_move(mv);
        grid.apply_mut(mv);
        writeln!(file, "Step {}: {}\n{grid}\n", i + 1, description)?;
    }
    writeln!(file, "Moves ({}):", moves.len())?;
    writeln!(file, "{}", initial.describe_moves(moves))?;
    file.flush()
}

fn save_binary(path: &Path, moves: &[Move]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    file.write_all(&(moves.len() as u32).to_le_bytes())?;
    for mv in moves {
        file.write_all(&(mv.piece_index as u32).to_le_bytes())?;
        file.write_all(&[mv.step.code()])?;
    }

    file.flush()
}

/// Loads the saved move list.
///
/// Returns `None` if the file is missing, truncated or holds an unknown step.
pub fn load_moves(dir: &Path) -> Option<Vec<Move>> {
    let mut file = File::open(dir.join(SOLUTION_BIN)).ok()?;
    let mut u32_buffer = [0u8; 4];

    file.read_exact(&mut u32_buffer).ok()?;
    let move_count = u32::from_le_bytes(u32_buffer) as usize;

    // Each move takes 5 bytes; reject counts the file cannot hold.
    let remaining = file.metadata().ok()?.len().saturating_sub(4) / 5;
    if (move_count as u64) > remaining {
        return None;
    }

    let mut moves = Vec::with_capacity(move_count);
    for _ in 0..move_count {
        file.read_exact(&mut u32_buffer).ok()?;
        let piece_index = u32::from_le_bytes(u32_buffer) as usize;

        let mut step_code = [0u8; 1];
        file.read_exact(&mut step_code).ok()?;
        let step = Step::from_code(step_code[0])?;

        moves.push(Move::new(piece_index, step));
    }

    Some(moves)
}

/// Returns the number of saved moves without loading them all.
pub fn count(dir: &Path) -> Option<usize> {
    let mut file = File::open(dir.join(SOLUTION_BIN)).ok()?;
    let mut u32_buffer = [0u8; 4];
    file.read_exact(&mut u32_buffer).ok()?;
    Some(u32::from_le_bytes(u32_buffer) as usize)
}
