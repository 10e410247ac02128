//! Sliding Block Puzzle Solver
//!
//! Solves the classic Klotski puzzle: the large square block has to reach the
//! exit at the bottom of a 4x5 board. The solver finds a shortest solution by
//! unit moves, saves it as text, SVG and binary files, and provides an
//! interactive viewer to step through it.

mod visualization;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use klotski::{persistence, pieces, solve_with_limits, SearchLimits, Solution, Style, Symmetry};

/// Solves the Klotski sliding block puzzle and visualizes the solution.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every expanded search level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the puzzle and save the solution to disk.
    Solve(SolveArgs),
    /// Step through a saved solution in an interactive viewer.
    Display {
        /// Directory holding solution.bin.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show the number of moves in the saved solution.
    Count {
        /// Directory holding solution.bin.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Solve the puzzle and write only the SVG diagram.
    ExportSvg {
        #[arg(long, default_value_t = Style::Colorful)]
        style: Style,
        /// Board symmetry used to merge states (defaults to the puzzle's own).
        #[arg(long)]
        symmetry: Option<Symmetry>,
        #[arg(long, default_value = "klotski_solution.svg")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Board symmetry used to merge states (defaults to the puzzle's own).
    #[arg(long)]
    symmetry: Option<Symmetry>,
    /// Diagram style for solution.svg.
    #[arg(long, default_value_t = Style::Colorful)]
    style: Style,
    /// Give up after exploring this many moves deep.
    #[arg(long)]
    max_levels: Option<usize>,
    /// Output directory for the solution files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

impl Default for SolveArgs {
    fn default() -> Self {
        Self {
            symmetry: None,
            style: Style::Colorful,
            max_levels: None,
            dir: PathBuf::from("."),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    match cli.command {
        Some(Command::Solve(args)) => {
            run_solver(&args)?;
        }
        Some(Command::Display { dir }) => run_display(&dir)?,
        Some(Command::Count { dir }) => run_count(&dir)?,
        Some(Command::ExportSvg {
            style,
            symmetry,
            out,
        }) => run_export_svg(style, symmetry, &out)?,
        None => {
            // default: solve and display
            let solution = run_solver(&SolveArgs::default())?;
            println!("Controls: Left/Right step, R reset");
            visualization::display(pieces::klotski().initial, solution.moves);
        }
    }
    Ok(())
}

/// Solves the puzzle, prints the result and saves it to disk.
fn run_solver(args: &SolveArgs) -> Result<Solution> {
    let puzzle = pieces::klotski();
    let symmetry = args.symmetry.unwrap_or(puzzle.symmetry);
    let limits = SearchLimits {
        max_levels: args.max_levels,
    };
    tracing::info!(puzzle = puzzle.name, %symmetry, max_levels = ?args.max_levels, "solve");

    println!("initial grid:\n{}", puzzle.initial);
    let solution = solve_with_limits(&puzzle.initial, puzzle.goal, symmetry, limits)
        .with_context(|| format!("solving {}", puzzle.name))?;

    println!("solved grid:\n{}", solution.grid);
    println!(
        "list of moves ({}):\n{}",
        solution.moves.len(),
        puzzle.initial.describe_moves(&solution.moves)
    );

    persistence::save(&args.dir, &puzzle.initial, &solution.moves, args.style)
        .with_context(|| format!("saving solution under {}", args.dir.display()))?;
    println!(
        "Wrote {}, {} and {}",
        persistence::SOLUTION_TXT,
        persistence::SOLUTION_SVG,
        persistence::SOLUTION_BIN
    );

    Ok(solution)
}

/// Loads and displays a saved solution.
fn run_display(dir: &Path) -> Result<()> {
    let moves = persistence::load_moves(dir).with_context(|| {
        format!(
            "no readable {} in {}, run 'klotski solve' first",
            persistence::SOLUTION_BIN,
            dir.display()
        )
    })?;

    let initial = pieces::klotski().initial;
    if let Some(mv) = moves
        .iter()
        .find(|mv| mv.piece_index >= initial.pieces().len())
    {
        bail!("saved move {mv:?} refers to a piece the puzzle does not have");
    }

    println!("Loaded {} moves", moves.len());
    println!("Controls: Left/Right step, R reset");
    visualization::display(initial, moves);
    Ok(())
}

/// Prints the number of saved moves.
fn run_count(dir: &Path) -> Result<()> {
    let count = persistence::count(dir).with_context(|| {
        format!(
            "no readable {} in {}, run 'klotski solve' first",
            persistence::SOLUTION_BIN,
            dir.display()
        )
    })?;
    println!("{} moves", count);
    Ok(())
}

/// Solves the puzzle and writes its diagram to `out`.
fn run_export_svg(style: Style, symmetry: Option<Symmetry>, out: &Path) -> Result<()> {
    let puzzle = pieces::klotski();
    let symmetry = symmetry.unwrap_or(puzzle.symmetry);
    let moves = klotski::solve(&puzzle.initial, puzzle.goal, symmetry)
        .with_context(|| format!("solving {}", puzzle.name))?
        .moves;

    std::fs::write(out, klotski::svg::render_solution(&puzzle.initial, &moves, style))
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), moves = moves.len(), "wrote diagram");
    Ok(())
}
