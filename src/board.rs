use coord_2d::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BOARD_WIDTH: i32 = 510;
pub const BOARD_HEIGHT: i32 = 360;
pub const CELL_SIZE: i32 = 60;
pub const GRID_WIDTH: u32 = 8;
pub const GRID_HEIGHT: u32 = 5;
pub const PLAYER_START: Coord = Coord { x: 15, y: 15 };
pub const PLAYER_SIZE: i32 = 40;
pub const COIN_SIZE: i32 = 15;
pub const TRAP_SIZE: i32 = 40;

// Placed items sit this far inside the top-left corner of their cell
pub const CELL_OFFSET: i32 = 15;

const WALL_THICKNESS: i32 = 8;
const WALL_EDGE_MARGIN: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    // The top and left edges are inside the rectangle, the right and bottom edges are not
    pub fn contains(&self, point: Coord) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }

    pub fn move_to(&mut self, position: Coord) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    // Returns true if a player at `position` stepping by `delta` along a single axis
    // would cross this rectangle's near edge while overlapping its span on the other
    // axis. The span comparisons are inclusive at both ends, so collisions at cell
    // boundaries keep the board's original behaviour.
    pub fn blocks(&self, position: Coord, delta: Coord) -> bool {
        let (from, to, near, span_position, span_start, span_end) = if delta.x != 0 {
            (
                position.x,
                position.x + delta.x,
                self.x,
                position.y,
                self.y,
                self.y + self.height,
            )
        } else {
            (
                position.y,
                position.y + delta.y,
                self.y,
                position.x,
                self.x,
                self.x + self.width,
            )
        };
        let crosses = if to > from {
            from <= near && near <= to
        } else if to < from {
            from >= near && near >= to
        } else {
            false
        };
        crosses && span_position >= span_start && span_position <= span_end
    }
}

pub fn random_cell<R: Rng>(rng: &mut R) -> Coord {
    let column = rng.gen_range(0..GRID_WIDTH) as i32;
    let row = rng.gen_range(0..GRID_HEIGHT) as i32;
    Coord::new(column * CELL_SIZE, row * CELL_SIZE)
}

// Grid-aligned position for a coin or the trap
pub fn random_item_position<R: Rng>(rng: &mut R) -> Coord {
    random_cell(rng) + Coord::new(CELL_OFFSET, CELL_OFFSET)
}

pub fn random_coin<R: Rng>(rng: &mut R) -> Rect {
    let position = random_item_position(rng);
    Rect::new(position.x, position.y, COIN_SIZE, COIN_SIZE)
}

pub fn random_trap<R: Rng>(rng: &mut R) -> Rect {
    let position = random_item_position(rng);
    Rect::new(position.x, position.y, TRAP_SIZE, TRAP_SIZE)
}

// Each wall hugs the right or bottom edge of a random cell, spanning the full cell
// along that edge
pub fn generate_walls<R: Rng>(count: usize, rng: &mut R) -> Vec<Rect> {
    (0..count)
        .map(|_| {
            let cell = random_cell(rng);
            if rng.gen_range(0..2) == 0 {
                // vertical
                Rect::new(
                    cell.x + CELL_SIZE - WALL_EDGE_MARGIN,
                    cell.y,
                    WALL_THICKNESS,
                    CELL_SIZE,
                )
            } else {
                // horizontal
                Rect::new(
                    cell.x,
                    cell.y + CELL_SIZE - WALL_EDGE_MARGIN,
                    CELL_SIZE,
                    WALL_THICKNESS,
                )
            }
        })
        .collect()
}
