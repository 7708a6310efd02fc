use crate::board::{Rect, CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};
use crate::game::{GameState, LogMessage, Tile};
use coord_2d::{Coord, Size};
use grid_2d::Grid;
use std::fmt::Write;

const EMPTY_CELL: char = '.';

// The board is drawn as a lattice with cell contents on even coordinates and
// wall slots between them. A wall rectangle hugs the right or bottom edge of
// its cell, so it lands one lattice slot right or below the cell's glyph.
fn lattice_coord(rect: Rect, tile: Tile) -> Coord {
    let column = rect.x / CELL_SIZE;
    let row = rect.y / CELL_SIZE;
    match tile {
        Tile::Wall if rect.height > rect.width => Coord::new(2 * column + 1, 2 * row),
        Tile::Wall => Coord::new(2 * column, 2 * row + 1),
        _ => Coord::new(2 * column, 2 * row),
    }
}

fn glyph(tile: Tile, rect: Rect) -> char {
    match tile {
        Tile::Player => '@',
        Tile::Coin => 'o',
        Tile::Trap => 'x',
        Tile::Wall if rect.height > rect.width => '|',
        Tile::Wall => '_',
    }
}

pub fn render_board(game_state: &GameState) -> String {
    let size = Size::new(2 * GRID_WIDTH, 2 * GRID_HEIGHT);
    let mut lattice = Grid::new_copy(size, ' ');
    for coord in size.coord_iter_row_major() {
        if coord.x % 2 == 0 && coord.y % 2 == 0 {
            *lattice.get_checked_mut(coord) = EMPTY_CELL;
        }
    }
    for entity in game_state.entities_to_render() {
        let coord = lattice_coord(entity.rect, entity.tile);
        *lattice.get_checked_mut(coord) = glyph(entity.tile, entity.rect);
    }
    let mut out = String::new();
    for y in 0..size.height() as i32 {
        for x in 0..size.width() as i32 {
            out.push(*lattice.get_checked(Coord::new(x, y)));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

pub fn render_status(game_state: &GameState) -> String {
    let mut out = String::new();
    write!(
        &mut out,
        "Score: {}  Steps: {}",
        game_state.score(),
        game_state.steps()
    )
    .unwrap();
    if !game_state.can_move() {
        out.push_str("  [frozen]");
    }
    if game_state.is_immune() {
        out.push_str("  [immune]");
    }
    out
}

pub fn message_text(message: LogMessage) -> String {
    match message {
        LogMessage::OffGrid => "OFF THE GRID!".to_string(),
        LogMessage::WallInTheWay => "A WALL IS IN THE WAY".to_string(),
        LogMessage::CoinCollected { score } => format!("Score: {}", score),
        LogMessage::CoinBonus => "Bonus! 5th coin worth 2 points.".to_string(),
        LogMessage::TrapHit { score } => format!("Hit trap! Score: {}", score),
        LogMessage::SafeStep => {
            "Stepped on trap safely! You are immune for 2 seconds.".to_string()
        }
        LogMessage::MovementRestored => "You can move again!".to_string(),
        LogMessage::ImmunityEnded => "Immunity ended. You can move again!".to_string(),
        LogMessage::Escaped => "YOU MADE IT!".to_string(),
        LogMessage::QuitTooSoon => "OOPS, YOU QUIT TOO SOON!".to_string(),
    }
}
