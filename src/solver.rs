//! Breadth-first sliding puzzle solver.
//!
//! The search expands one BFS level at a time: every state found at depth
//! `d` is tried with every piece and every step, and each legal, previously
//! unseen result becomes a state at depth `d + 1`. The first admitted state
//! that satisfies the goal is therefore a shortest solution by move count.
//!
//! Memory, not CPU, is the limiting resource: the search keeps one key and
//! one back-link for every distinct state it has ever seen.

use thiserror::Error;

use crate::geometry::Step;
use crate::grid::{Grid, Move, PlacementError, Symmetry};
use crate::pieces::Puzzle;
use crate::search_tree::{Edge, SearchTree};

/// A solved puzzle: the final board and the moves that lead to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub grid: Grid,
    pub moves: Vec<Move>,
    pub stats: SolveStats,
}

/// Counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Number of BFS levels that were expanded.
    pub levels: usize,
    /// Distinct states admitted into the search tree.
    pub states: usize,
    /// Candidate boards generated, legal or not.
    pub candidates: usize,
}

/// Optional bounds on a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop once every state up to this many moves has been explored.
    pub max_levels: Option<usize>,
}

/// Reasons a search produced no solution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("initial board is invalid: {0}")]
    InvalidStart(#[from] PlacementError),
    #[error("no solution: all {states} reachable states explored up to depth {depth}")]
    Exhausted { depth: usize, states: usize },
    #[error("no solution within {max_levels} moves ({states} states explored)")]
    LevelLimit { max_levels: usize, states: usize },
}

/// Finds a shortest move sequence from `initial` to a board satisfying `goal`.
///
/// States whose boards have the same key under `symmetry` are merged, so the
/// goal must not distinguish between boards that the symmetry identifies.
/// Among several shortest solutions the first one in expansion order (piece
/// index, then [`Step::ALL`]) is returned.
///
/// Memory grows with the number of distinct states discovered.
pub fn solve<F>(initial: &Grid, goal: F, symmetry: Symmetry) -> Result<Solution, SolveError>
where
    F: Fn(&Grid) -> bool,
{
    solve_with_limits(initial, goal, symmetry, SearchLimits::default())
}

/// Like [`solve`], but gives up with [`SolveError::LevelLimit`] once the
/// configured depth has been explored.
pub fn solve_with_limits<F>(
    initial: &Grid,
    goal: F,
    symmetry: Symmetry,
    limits: SearchLimits,
) -> Result<Solution, SolveError>
where
    F: Fn(&Grid) -> bool,
{
    let start = initial.validate().inspect_err(|error| {
        tracing::warn!(%error, "initial board is invalid");
    })?;

    let mut stats = SolveStats::default();
    if goal(initial) {
        tracing::info!("initial board already satisfies the goal");
        return Ok(Solution {
            grid: initial.clone(),
            moves: Vec::new(),
            stats,
        });
    }

    let mut tree: SearchTree<Grid, Vec<u8>> = SearchTree::new();
    tree.append(initial.clone(), Edge::Root, start.key(symmetry));
    let piece_count = initial.pieces().len();

    loop {
        tree.begin_level();
        let level = tree.current_level();
        let depth = tree.level_count() - 1;
        stats.states = tree.len();

        if level.is_empty() {
            tracing::info!(depth = depth - 1, states = stats.states, "search space exhausted");
            return Err(SolveError::Exhausted {
                depth: depth - 1,
                states: stats.states,
            });
        }
        if let Some(max_levels) = limits.max_levels.filter(|&max| depth >= max) {
            tracing::info!(max_levels, states = stats.states, "level limit reached");
            return Err(SolveError::LevelLimit {
                max_levels,
                states: stats.states,
            });
        }

        tracing::debug!(
            depth,
            width = level.len(),
            states = stats.states,
            resident = tree.resident_nodes(),
            "expanding level"
        );
        stats.levels += 1;

        for parent in level {
            let Some(parent_grid) = tree.node_at(parent) else {
                debug_assert!(false, "node {parent} of the current level is not resident");
                tracing::error!(parent, "current level node missing, skipping it");
                continue;
            };

            let mut successors = Vec::new();
            for piece_index in 0..piece_count {
                for step in Step::ALL {
                    let mv = Move::new(piece_index, step);
                    let candidate = parent_grid.apply(mv);
                    stats.candidates += 1;

                    let Ok(cells) = candidate.validate() else {
                        continue;
                    };
                    let key = cells.key(symmetry);
                    if !tree.contains_key(&key) {
                        successors.push((candidate, mv, key));
                    }
                }
            }

            for (candidate, mv, key) in successors {
                let reached = goal(&candidate).then(|| candidate.clone());
                if !tree.append(candidate, Edge::Step { parent, mv }, key) {
                    continue;
                }

                if let Some(grid) = reached {
                    let moves = tree.path_to(tree.len() - 1);
                    stats.states = tree.len();
                    tracing::info!(
                        moves = moves.len(),
                        states = stats.states,
                        candidates = stats.candidates,
                        "solution found"
                    );
                    return Ok(Solution { grid, moves, stats });
                }
            }
        }
    }
}

impl Puzzle {
    /// Solves this puzzle with its own goal and symmetry.
    pub fn solve(&self, limits: SearchLimits) -> Result<Solution, SolveError> {
        solve_with_limits(&self.initial, self.goal, self.symmetry, limits)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::geometry::Vect2;
    use crate::pieces::{klotski, Piece, PieceTag, SHAPE_SQUARE, SHAPE_TALL, SHAPE_UNIT};

    fn unit(symbol: u8, x: i32, y: i32) -> Piece {
        Piece::new(PieceTag::new(symbol, 1), Vect2::new(x, y), SHAPE_UNIT)
    }

    fn at(tag: PieceTag, target: Vect2) -> impl Fn(&Grid) -> bool {
        move |grid: &Grid| grid.piece(tag).is_some_and(|p| p.position == target)
    }

    /// Plain BFS over full piece positions, used as a reference for move counts.
    fn reference_shortest(initial: &Grid, goal: &dyn Fn(&Grid) -> bool) -> Option<usize> {
        let positions = |grid: &Grid| -> Vec<Vect2> {
            grid.pieces().iter().map(|p| p.position).collect()
        };
        let mut seen = HashSet::from([positions(initial)]);
        let mut queue = VecDeque::from([(initial.clone(), 0)]);

        while let Some((grid, depth)) = queue.pop_front() {
            if goal(&grid) {
                return Some(depth);
            }
            for piece_index in 0..grid.pieces().len() {
                for step in Step::ALL {
                    let next = grid.apply(Move::new(piece_index, step));
                    if next.validate().is_ok() && seen.insert(positions(&next)) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }
        None
    }

    fn replay(initial: &Grid, moves: &[Move]) -> Grid {
        let mut grid = initial.clone();
        for &mv in moves {
            grid.apply_mut(mv);
            assert!(grid.validate().is_ok(), "illegal move {mv:?} in solution");
        }
        grid
    }

    #[test]
    fn test_single_step_right() {
        let grid = Grid::new(2, 1, vec![unit(b'D', 0, 0)]);
        let goal = at(PieceTag::new(b'D', 1), Vect2::new(1, 0));

        let solution = solve(&grid, goal, Symmetry::None).unwrap();
        assert_eq!(solution.moves, vec![Move::new(0, Step::Right)]);
        assert_eq!(solution.grid.pieces()[0].position, Vect2::new(1, 0));
    }

    #[test]
    fn test_every_level_node_is_expanded() {
        let grid = Grid::new(3, 1, vec![unit(b'D', 0, 0)]);
        let goal = at(PieceTag::new(b'D', 1), Vect2::new(2, 0));

        let solution = solve(&grid, goal, Symmetry::None).unwrap();
        assert_eq!(solution.moves.len(), 2);
        assert_eq!(
            solution.stats,
            SolveStats {
                levels: 2,
                states: 3,
                candidates: 8,
            }
        );
    }

    #[test]
    fn test_already_solved() {
        let grid = Grid::new(2, 1, vec![unit(b'D', 1, 0)]);
        let goal = at(PieceTag::new(b'D', 1), Vect2::new(1, 0));

        let solution = solve(&grid, goal, Symmetry::Horizontal).unwrap();
        assert!(solution.moves.is_empty());
        assert_eq!(solution.grid, grid);
    }

    #[test]
    fn test_overlapping_start_has_no_solution() {
        let grid = Grid::new(3, 1, vec![unit(b'D', 0, 0), unit(b'E', 0, 0)]);
        let result = solve(&grid, |_: &Grid| true, Symmetry::None);
        assert!(matches!(
            result,
            Err(SolveError::InvalidStart(PlacementError::Overlap { .. }))
        ));
    }

    #[test]
    fn test_blocked_by_immovable_piece() {
        // both pieces fill the board, so nothing can ever move
        let grid = Grid::new(2, 1, vec![unit(b'D', 0, 0), unit(b'E', 1, 0)]);
        let goal = at(PieceTag::new(b'D', 1), Vect2::new(1, 0));

        let result = solve(&grid, goal, Symmetry::None);
        assert_eq!(result, Err(SolveError::Exhausted { depth: 0, states: 1 }));
    }

    #[test]
    fn test_blocked_by_obstacle() {
        let grid = Grid::new(3, 2, vec![unit(b'D', 0, 0)])
            .with_obstacles([Vect2::new(1, 0), Vect2::new(1, 1)]);
        let goal = at(PieceTag::new(b'D', 1), Vect2::new(2, 0));

        let result = solve(&grid, goal, Symmetry::None);
        assert_eq!(result, Err(SolveError::Exhausted { depth: 1, states: 2 }));
    }

    #[test]
    fn test_level_limit_is_distinct_from_exhaustion() {
        let grid = Grid::new(5, 1, vec![unit(b'D', 0, 0)]);
        let tag = PieceTag::new(b'D', 1);
        let limits = |max| SearchLimits {
            max_levels: Some(max),
        };

        let result = solve_with_limits(&grid, at(tag, Vect2::new(4, 0)), Symmetry::None, limits(3));
        assert_eq!(
            result,
            Err(SolveError::LevelLimit {
                max_levels: 3,
                states: 4
            })
        );

        let solution =
            solve_with_limits(&grid, at(tag, Vect2::new(4, 0)), Symmetry::None, limits(4)).unwrap();
        assert_eq!(solution.moves, vec![Move::new(0, Step::Right); 4]);
    }

    #[test]
    fn test_first_found_follows_step_order() {
        // from the middle, left is tried before right
        let grid = Grid::new(3, 1, vec![unit(b'D', 1, 0)]);
        let tag = PieceTag::new(b'D', 1);
        let goal = move |g: &Grid| g.piece(tag).is_some_and(|p| p.position.x != 1);

        let solution = solve(&grid, goal, Symmetry::None).unwrap();
        assert_eq!(solution.moves, vec![Move::new(0, Step::Left)]);
    }

    #[test]
    fn test_horizontal_symmetry_merges_mirror_states() {
        let grid = Grid::new(3, 1, vec![unit(b'D', 1, 0)]);
        let never = |_: &Grid| false;

        // left and right of centre are mirror images of each other
        let plain = solve(&grid, never, Symmetry::None).unwrap_err();
        let mirrored = solve(&grid, never, Symmetry::Horizontal).unwrap_err();
        assert_eq!(plain, SolveError::Exhausted { depth: 1, states: 3 });
        assert_eq!(mirrored, SolveError::Exhausted { depth: 1, states: 2 });
    }

    #[test]
    fn test_matches_reference_bfs_on_sliding_tiles() {
        // 2x3 board with five distinct tiles and one hole
        let grid = Grid::new(
            3,
            2,
            vec![
                unit(b'A', 0, 0),
                unit(b'B', 1, 0),
                unit(b'C', 2, 0),
                unit(b'D', 0, 1),
                unit(b'E', 1, 1),
            ],
        );
        let goal = at(PieceTag::new(b'A', 1), Vect2::new(2, 1));

        let expected = reference_shortest(&grid, &goal).unwrap();
        assert_eq!(expected, 9);
        let solution = solve(&grid, &goal, Symmetry::None).unwrap();
        assert_eq!(solution.moves.len(), expected);
        assert_eq!(replay(&grid, &solution.moves), solution.grid);
        assert!(goal(&solution.grid));
    }

    #[test]
    fn test_matches_reference_bfs_with_large_block() {
        // a 2x2 block has to travel to the bottom of a 3x4 board
        let block = PieceTag::new(b'A', 1);
        let grid = Grid::new(
            3,
            4,
            vec![
                Piece::new(block, Vect2::new(0, 0), SHAPE_SQUARE),
                Piece::new(PieceTag::new(b'B', 1), Vect2::new(2, 0), SHAPE_TALL),
                Piece::new(PieceTag::new(b'D', 1), Vect2::new(0, 2), SHAPE_UNIT),
                Piece::new(PieceTag::new(b'D', 2), Vect2::new(1, 2), SHAPE_UNIT),
            ],
        );
        let goal = move |g: &Grid| g.piece(block).is_some_and(|p| p.position.y == 2);

        let expected = reference_shortest(&grid, &goal).unwrap();
        assert_eq!(expected, 6);
        for symmetry in Symmetry::ALL {
            let solution = solve(&grid, goal, symmetry).unwrap();
            assert_eq!(solution.moves.len(), expected, "symmetry {symmetry}");
            assert_eq!(replay(&grid, &solution.moves), solution.grid);
        }
    }

    #[test]
    fn test_klotski_solution_replays_to_goal() {
        let puzzle = klotski();
        let solution = puzzle.solve(SearchLimits::default()).unwrap();

        assert!((puzzle.goal)(&solution.grid));
        assert_eq!(replay(&puzzle.initial, &solution.moves), solution.grid);
        assert_eq!(solution.moves.len(), 116);
        assert_eq!(solution.stats.levels, solution.moves.len());

        // the goal is symmetric, so ignoring symmetry finds an equally short path
        let plain = solve(&puzzle.initial, puzzle.goal, Symmetry::None).unwrap();
        assert_eq!(plain.moves.len(), solution.moves.len());
    }
}
