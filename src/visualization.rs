//! Interactive viewer for stepping through a solution using kiss3d.

use kiss3d::prelude::*;

use klotski::grid::{Grid, Move};

/// Returns the display color for a piece kind, by order of first appearance.
///
/// The mapping is stable to keep colors consistent across steps.
fn kind_color(kind: usize) -> Color {
    match kind % 6 {
        0 => Color::new(0.93, 0.26, 0.23, 1.0), // red
        1 => Color::new(0.58, 0.65, 0.03, 1.0), // green
        2 => Color::new(0.23, 0.60, 0.88, 1.0), // blue
        3 => Color::new(0.90, 0.69, 0.10, 1.0), // yellow
        4 => Color::new(0.65, 0.42, 0.75, 1.0), // purple
        _ => Color::new(0.16, 0.63, 0.60, 1.0), // teal
    }
}

/// Builds the scene for one board.
///
/// Coordinate conventions:
/// - Board cell (x, y) maps to world (X, -Y) so the top row is drawn on top.
/// - The board is centered at the origin.
/// - The piece that moves next is lifted along Z.
fn build_scene(scene: &mut SceneNode3d, grid: &Grid, next_move: Option<Move>) -> Vec<SceneNode3d> {
    /// Size of each rendered cell (slightly smaller than 1.0 for visible gaps).
    const CELL_SIZE: f32 = 0.9;
    /// Thickness of the pieces.
    const PIECE_DEPTH: f32 = 0.5;
    /// How far the next piece to move is raised.
    const LIFT: f32 = 0.4;

    let center_x = (grid.width() - 1) as f32 * 0.5;
    let center_y = (grid.height() - 1) as f32 * 0.5;
    let world = |x: i32, y: i32, z: f32| Vec3::new(x as f32 - center_x, center_y - y as f32, z);

    let mut nodes = Vec::new();

    // board base
    let base = scene
        .add_cube(grid.width() as f32, grid.height() as f32, 0.1)
        .set_color(Color::new(0.85, 0.9, 0.93, 1.0))
        .set_position(Vec3::new(0.0, 0.0, -PIECE_DEPTH * 0.5 - 0.05));
    nodes.push(base);

    for &cell in grid.obstacles() {
        let node = scene
            .add_cube(1.0, 1.0, PIECE_DEPTH)
            .set_color(Color::new(0.35, 0.43, 0.46, 1.0))
            .set_position(world(cell.x, cell.y, 0.0));
        nodes.push(node);
    }

    let mut kinds: Vec<u8> = Vec::new();
    for (piece_index, piece) in grid.pieces().iter().enumerate() {
        let kind = match kinds.iter().position(|&symbol| symbol == piece.tag().symbol) {
            Some(kind) => kind,
            None => {
                kinds.push(piece.tag().symbol);
                kinds.len() - 1
            }
        };
        let lifted = next_move.is_some_and(|mv| mv.piece_index == piece_index);
        let z = if lifted { LIFT } else { 0.0 };

        for cell in piece.cells() {
            let node = scene
                .add_cube(CELL_SIZE, CELL_SIZE, PIECE_DEPTH)
                .set_color(kind_color(kind))
                .set_position(world(cell.x, cell.y, z));
            nodes.push(node);
        }
    }

    nodes
}

/// Replays the moves and returns every board along the way.
fn replay(initial: &Grid, moves: &[Move]) -> Vec<Grid> {
    let mut states = Vec::with_capacity(moves.len() + 1);
    let mut grid = initial.clone();
    states.push(grid.clone());
    for &mv in moves {
        grid.apply_mut(mv);
        states.push(grid.clone());
    }
    states
}

fn window_title(initial: &Grid, moves: &[Move], index: usize) -> String {
    let next = match moves.get(index) {
        Some(&mv) => format!("next {}", initial.describe_move(mv)),
        None => "solved".to_string(),
    };
    format!(
        "Step {}/{} ({}) - [Left/Right] step, [R] reset",
        index,
        moves.len(),
        next
    )
}

/// Displays a solution in an interactive viewer.
pub fn display(initial: Grid, moves: Vec<Move>) {
    pollster::block_on(display_async(initial, moves));
}

async fn display_async(initial: Grid, moves: Vec<Move>) {
    let states = replay(&initial, &moves);
    let mut current_index = 0;

    let mut window = Window::new(&window_title(&initial, &moves, current_index)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(10.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 8.0));

    let mut nodes = build_scene(&mut scene, &states[current_index], moves.first().copied());
    // whether the scene needs to be rebuilt (after a step change)
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Right if current_index + 1 < states.len() => {
                            current_index += 1;
                            needs_rebuild = true;
                        }
                        Key::Left if current_index > 0 => {
                            current_index -= 1;
                            needs_rebuild = true;
                        }
                        Key::R => {
                            current_index = 0;
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut node in nodes.drain(..) {
                node.remove();
            }
            nodes = build_scene(
                &mut scene,
                &states[current_index],
                moves.get(current_index).copied(),
            );
            window.set_title(&window_title(&initial, &moves, current_index));
            needs_rebuild = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
