use crate::board::{self, Rect, BOARD_WIDTH, CELL_SIZE};
use coord_2d::Coord;
use direction::CardinalDirection;
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Rejected moves report these as negative return values; they are never folded
// into the score
pub const OFF_GRID_PENALTY: i32 = 5;
pub const HIT_WALL_PENALTY: i32 = 5;
pub const END_REWARD: i32 = 10;

pub const FREEZE_DURATION: Duration = Duration::from_secs(3);
pub const IMMUNITY_DURATION: Duration = Duration::from_secs(2);

const DEFAULT_WALLS: usize = 20;
const DEFAULT_TRAPS: usize = 5;

// Coin pickup tests the player's visual centre; the trap uses a deeper probe point
const COIN_PROBE: Coord = Coord { x: 10, y: 10 };
const TRAP_PROBE: Coord = Coord { x: 20, y: 20 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Player,
    Coin,
    Trap,
    Wall,
}

pub struct EntityToRender {
    pub tile: Tile,
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogMessage {
    OffGrid,
    WallInTheWay,
    CoinCollected { score: u32 },
    CoinBonus,
    TrapHit { score: u32 },
    SafeStep,
    MovementRestored,
    ImmunityEnded,
    Escaped,
    QuitTooSoon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum StateTransition {
    RestoreMovement,
    EndImmunity,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ScheduledTransition {
    remaining: Duration,
    transition: StateTransition,
}

pub fn step_delta(direction: CardinalDirection) -> Coord {
    let unit = direction.coord();
    Coord::new(unit.x * CELL_SIZE, unit.y * CELL_SIZE)
}

#[derive(Serialize, Deserialize)]
pub struct GameState {
    player: Coord,
    steps: u32,
    score: u32,
    can_move: bool,
    immune: bool,
    game_over: bool,
    coins: Vec<Rect>,
    trap: Rect,
    walls: Vec<Rect>,
    coin_override: Option<usize>,
    total_walls: usize,
    total_traps: usize,
    scheduled: Vec<ScheduledTransition>,
    message_log: Vec<LogMessage>,
    rng: Isaac64Rng,
}

impl GameState {
    pub fn new(rng_seed: u64) -> Self {
        Self {
            player: board::PLAYER_START,
            steps: 0,
            score: 0,
            can_move: true,
            immune: false,
            game_over: false,
            coins: Vec::new(),
            trap: Rect::new(0, 0, 0, 0),
            walls: Vec::new(),
            coin_override: None,
            total_walls: DEFAULT_WALLS,
            total_traps: DEFAULT_TRAPS,
            scheduled: Vec::new(),
            message_log: Vec::new(),
            rng: Isaac64Rng::seed_from_u64(rng_seed),
        }
    }

    pub fn configure_coins(&mut self, total_coins: usize) {
        self.coin_override = Some(total_coins);
    }

    // Stored for configuration completeness, but the board only ever places a
    // single trap
    pub fn configure_traps(&mut self, total_traps: usize) {
        self.total_traps = total_traps;
    }

    pub fn configure_walls(&mut self, total_walls: usize) {
        self.total_walls = total_walls;
    }

    // Coins and the trap may land on the same cell; overlap is allowed
    pub fn create_board(&mut self) {
        let total_coins = match self.coin_override {
            Some(total_coins) => total_coins,
            None => self.rng.gen_range(2..4),
        };
        let mut coins = Vec::with_capacity(total_coins);
        for _ in 0..total_coins {
            coins.push(board::random_coin(&mut self.rng));
        }
        self.coins = coins;
        self.trap = board::random_trap(&mut self.rng);
        self.walls = board::generate_walls(self.total_walls, &mut self.rng);
    }

    // Attempt to displace the player by `delta`, which the input layer always
    // supplies as a single cell edge along one axis. Returns 0 for an accepted
    // move and a negative penalty for an off-grid or wall rejection. Coin and
    // trap side effects apply to the score directly and are not reflected in
    // the return value.
    pub fn move_player(&mut self, delta: Coord) -> i32 {
        if !self.can_move {
            return 0;
        }
        let candidate = self.player + delta;
        self.steps += 1;
        if candidate.x < 0
            || candidate.x > BOARD_WIDTH - CELL_SIZE
            || candidate.y < 0
            || candidate.y > board::BOARD_HEIGHT - CELL_SIZE
        {
            self.message_log.push(LogMessage::OffGrid);
            return -OFF_GRID_PENALTY;
        }
        if self.walls.iter().any(|wall| wall.blocks(self.player, delta)) {
            self.message_log.push(LogMessage::WallInTheWay);
            return -HIT_WALL_PENALTY;
        }
        self.player = candidate;
        self.collect_coins();
        self.check_trap();
        0
    }

    fn collect_coins(&mut self) {
        let probe = self.player + COIN_PROBE;
        for i in 0..self.coins.len() {
            if self.coins[i].contains(probe) {
                // every 5th point of cumulative score doubles the award
                if (self.score + 1) % 5 == 0 {
                    self.score += 2;
                    self.message_log.push(LogMessage::CoinBonus);
                } else {
                    self.score += 1;
                }
                self.message_log
                    .push(LogMessage::CoinCollected { score: self.score });
                let position = board::random_item_position(&mut self.rng);
                self.coins[i].move_to(position);
            }
        }
    }

    fn check_trap(&mut self) {
        let probe = self.player + TRAP_PROBE;
        if self.trap.contains(probe) {
            if !self.immune {
                self.score = self.score.saturating_sub(1);
                self.message_log
                    .push(LogMessage::TrapHit { score: self.score });
                self.can_move = false;
                self.schedule(StateTransition::RestoreMovement, FREEZE_DURATION);
            }
            let position = board::random_item_position(&mut self.rng);
            self.trap.move_to(position);
        }
    }

    // Arm the immunity window. Like directional input, this is dropped while
    // movement is frozen
    pub fn safe_step(&mut self) {
        if !self.can_move {
            return;
        }
        self.immune = true;
        self.message_log.push(LogMessage::SafeStep);
        self.schedule(StateTransition::EndImmunity, IMMUNITY_DURATION);
    }

    // Timers are single-shot and never cancelled. Re-arming adds another entry;
    // each fires on its own, and applying the same transition twice has no
    // further effect
    fn schedule(&mut self, transition: StateTransition, delay: Duration) {
        self.scheduled.push(ScheduledTransition {
            remaining: delay,
            transition,
        });
    }

    pub fn tick(&mut self, since_last_tick: Duration) {
        let mut i = 0;
        while i < self.scheduled.len() {
            if self.scheduled[i].remaining <= since_last_tick {
                let transition = self.scheduled.swap_remove(i).transition;
                self.apply_transition(transition);
            } else {
                self.scheduled[i].remaining -= since_last_tick;
                i += 1;
            }
        }
    }

    fn apply_transition(&mut self, transition: StateTransition) {
        match transition {
            StateTransition::RestoreMovement => {
                self.can_move = true;
                self.message_log.push(LogMessage::MovementRestored);
            }
            StateTransition::EndImmunity => {
                self.immune = false;
                self.message_log.push(LogMessage::ImmunityEnded);
            }
        }
    }

    pub fn evaluate_outcome(&mut self) -> i32 {
        if self.player.x > BOARD_WIDTH - 2 * CELL_SIZE {
            self.message_log.push(LogMessage::Escaped);
            END_REWARD
        } else {
            self.message_log.push(LogMessage::QuitTooSoon);
            -END_REWARD
        }
    }

    // The outcome is evaluated before anything is reset, so the returned value
    // reflects where the player stood when replay was requested
    pub fn replay(&mut self) -> i32 {
        let outcome = self.evaluate_outcome();
        for coin in &mut self.coins {
            coin.resize(CELL_SIZE / 3, CELL_SIZE / 3);
        }
        self.player = board::PLAYER_START;
        self.steps = 0;
        outcome
    }

    pub fn end_game(&mut self) -> i32 {
        let outcome = self.evaluate_outcome();
        self.game_over = true;
        outcome
    }

    pub fn player_position(&self) -> Coord {
        self.player
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn is_immune(&self) -> bool {
        self.immune
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn coins(&self) -> &[Rect] {
        &self.coins
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn trap(&self) -> Rect {
        self.trap
    }

    pub fn message_log(&self) -> &[LogMessage] {
        &self.message_log
    }

    // Entities in draw order: the player comes last so it wins a shared cell
    pub fn entities_to_render<'a>(&'a self) -> impl 'a + Iterator<Item = EntityToRender> {
        let trap = EntityToRender {
            tile: Tile::Trap,
            rect: self.trap,
        };
        let player = EntityToRender {
            tile: Tile::Player,
            rect: Rect::new(
                self.player.x,
                self.player.y,
                board::PLAYER_SIZE,
                board::PLAYER_SIZE,
            ),
        };
        self.coins
            .iter()
            .map(|&rect| EntityToRender {
                tile: Tile::Coin,
                rect,
            })
            .chain(std::iter::once(trap))
            .chain(self.walls.iter().map(|&rect| EntityToRender {
                tile: Tile::Wall,
                rect,
            }))
            .chain(std::iter::once(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, CELL_OFFSET, PLAYER_START};

    fn open_board_game() -> GameState {
        let mut game_state = GameState::new(0);
        game_state.configure_walls(0);
        game_state.create_board();
        game_state
    }

    // A coin guaranteed to contain the player's coin probe point
    fn coin_under_player(game_state: &GameState) -> Rect {
        let probe = game_state.player + COIN_PROBE;
        Rect::new(probe.x, probe.y, board::COIN_SIZE, board::COIN_SIZE)
    }

    fn trap_under_player(game_state: &GameState) -> Rect {
        let probe = game_state.player + TRAP_PROBE;
        Rect::new(probe.x, probe.y, board::TRAP_SIZE, board::TRAP_SIZE)
    }

    #[test]
    fn off_grid_move_is_rejected_but_counted() {
        let mut game_state = open_board_game();
        let result = game_state.move_player(Coord::new(-CELL_SIZE, 0));
        assert_eq!(result, -OFF_GRID_PENALTY);
        assert_eq!(game_state.player_position(), PLAYER_START);
        assert_eq!(game_state.steps(), 1);
        assert_eq!(game_state.message_log(), &[LogMessage::OffGrid]);
    }

    #[test]
    fn off_grid_check_uses_board_edge_minus_one_cell() {
        let mut game_state = open_board_game();
        game_state.coins = Vec::new();
        game_state.trap = Rect::new(0, 0, 0, 0);
        game_state.player = Coord::new(435, 15);
        assert_eq!(
            game_state.move_player(Coord::new(CELL_SIZE, 0)),
            -OFF_GRID_PENALTY
        );
        // 255 + 60 = 315 overshoots HEIGHT - CELL_SIZE = 300
        game_state.player = Coord::new(15, 195);
        assert_eq!(game_state.move_player(Coord::new(0, CELL_SIZE)), 0);
        assert_eq!(
            game_state.move_player(Coord::new(0, CELL_SIZE)),
            -OFF_GRID_PENALTY
        );
        assert_eq!(game_state.player_position(), Coord::new(15, 255));
        assert!(game_state.player_position().y <= BOARD_HEIGHT - CELL_SIZE);
    }

    #[test]
    fn wall_rejection_keeps_position_and_counts_step() {
        let mut game_state = open_board_game();
        game_state.walls = vec![Rect::new(55, 0, 8, 60)];
        let result = game_state.move_player(Coord::new(CELL_SIZE, 0));
        assert_eq!(result, -HIT_WALL_PENALTY);
        assert_eq!(game_state.player_position(), PLAYER_START);
        assert_eq!(game_state.steps(), 1);
        assert_eq!(game_state.message_log(), &[LogMessage::WallInTheWay]);
    }

    #[test]
    fn frozen_move_is_a_silent_no_op() {
        let mut game_state = open_board_game();
        game_state.can_move = false;
        let score_before = game_state.score();
        let result = game_state.move_player(Coord::new(CELL_SIZE, 0));
        assert_eq!(result, 0);
        assert_eq!(game_state.player_position(), PLAYER_START);
        assert_eq!(game_state.steps(), 0);
        assert_eq!(game_state.score(), score_before);
        assert!(game_state.message_log().is_empty());
    }

    #[test]
    fn coin_scores_follow_the_bonus_sequence() {
        let mut game_state = open_board_game();
        let mut observed = Vec::new();
        for _ in 0..9 {
            let coin = coin_under_player(&game_state);
            game_state.coins = vec![coin];
            game_state.collect_coins();
            observed.push(game_state.score());
        }
        assert_eq!(observed, vec![1, 2, 3, 4, 6, 7, 8, 9, 11]);
    }

    #[test]
    fn collected_coin_relocates_to_an_aligned_cell() {
        let mut game_state = open_board_game();
        let coin = coin_under_player(&game_state);
        game_state.coins = vec![coin];
        game_state.collect_coins();
        let relocated = game_state.coins()[0];
        assert_eq!((relocated.x - CELL_OFFSET) % CELL_SIZE, 0);
        assert_eq!((relocated.y - CELL_OFFSET) % CELL_SIZE, 0);
        assert!(relocated.x >= 0 && relocated.x < BOARD_WIDTH);
        assert!(relocated.y >= 0 && relocated.y < BOARD_HEIGHT);
    }

    #[test]
    fn coin_pickup_through_a_committed_move() {
        let mut game_state = open_board_game();
        // coin in the cell one step to the right of the start
        game_state.coins = vec![Rect::new(75, 15, board::COIN_SIZE, board::COIN_SIZE)];
        // keep the trap out of the way
        game_state.trap = Rect::new(0, 0, 0, 0);
        let result = game_state.move_player(Coord::new(CELL_SIZE, 0));
        assert_eq!(result, 0);
        assert_eq!(game_state.score(), 1);
        assert_eq!(game_state.player_position(), Coord::new(75, 15));
    }

    #[test]
    fn trap_hit_penalises_freezes_and_relocates() {
        let mut game_state = open_board_game();
        game_state.score = 3;
        let trap = trap_under_player(&game_state);
        game_state.trap = trap;
        game_state.check_trap();
        assert_eq!(game_state.score(), 2);
        assert!(!game_state.can_move());
        assert_ne!(game_state.trap(), trap);
        assert_eq!((game_state.trap().x - CELL_OFFSET) % CELL_SIZE, 0);
        assert_eq!((game_state.trap().y - CELL_OFFSET) % CELL_SIZE, 0);
    }

    #[test]
    fn score_is_clamped_at_zero_by_trap_hits() {
        let mut game_state = open_board_game();
        for _ in 0..3 {
            game_state.trap = trap_under_player(&game_state);
            game_state.can_move = true;
            game_state.check_trap();
            assert_eq!(game_state.score(), 0);
        }
    }

    #[test]
    fn freeze_expires_after_three_seconds_of_ticks() {
        let mut game_state = open_board_game();
        game_state.trap = trap_under_player(&game_state);
        game_state.check_trap();
        assert!(!game_state.can_move());
        game_state.tick(Duration::from_secs(1));
        game_state.tick(Duration::from_secs(1));
        assert!(!game_state.can_move());
        game_state.tick(Duration::from_secs(1));
        assert!(game_state.can_move());
        assert!(game_state
            .message_log()
            .contains(&LogMessage::MovementRestored));
    }

    #[test]
    fn overlapping_freeze_timers_both_fire_harmlessly() {
        let mut game_state = open_board_game();
        game_state.schedule(StateTransition::RestoreMovement, FREEZE_DURATION);
        game_state.schedule(StateTransition::RestoreMovement, FREEZE_DURATION);
        game_state.can_move = false;
        game_state.tick(FREEZE_DURATION);
        assert!(game_state.can_move());
        assert!(game_state.scheduled.is_empty());
    }

    #[test]
    fn immune_trap_contact_skips_penalty_but_still_relocates() {
        let mut game_state = open_board_game();
        game_state.score = 3;
        game_state.safe_step();
        assert!(game_state.is_immune());
        let trap = trap_under_player(&game_state);
        game_state.trap = trap;
        game_state.check_trap();
        assert_eq!(game_state.score(), 3);
        assert!(game_state.can_move());
        assert_ne!(game_state.trap(), trap);
    }

    #[test]
    fn immunity_clears_when_its_window_elapses() {
        let mut game_state = open_board_game();
        game_state.safe_step();
        game_state.tick(Duration::from_secs(1));
        assert!(game_state.is_immune());
        game_state.tick(Duration::from_secs(1));
        assert!(!game_state.is_immune());
        assert!(game_state.message_log().contains(&LogMessage::ImmunityEnded));
    }

    #[test]
    fn safe_step_is_dropped_while_frozen() {
        let mut game_state = open_board_game();
        game_state.can_move = false;
        game_state.safe_step();
        assert!(!game_state.is_immune());
        assert!(game_state.scheduled.is_empty());
    }

    #[test]
    fn outcome_threshold_is_two_cells_from_the_far_edge() {
        let mut game_state = open_board_game();
        game_state.player = Coord::new(400, 15);
        assert_eq!(game_state.evaluate_outcome(), END_REWARD);
        game_state.player = Coord::new(390, 15);
        assert_eq!(game_state.evaluate_outcome(), -END_REWARD);
        game_state.player = Coord::new(200, 15);
        assert_eq!(game_state.evaluate_outcome(), -END_REWARD);
    }

    #[test]
    fn replay_reports_the_pre_reset_outcome() {
        let mut game_state = open_board_game();
        game_state.player = Coord::new(435, 15);
        game_state.steps = 12;
        assert_eq!(game_state.replay(), END_REWARD);
        assert_eq!(game_state.player_position(), PLAYER_START);
        assert_eq!(game_state.steps(), 0);
        for coin in game_state.coins() {
            assert_eq!(coin.width, CELL_SIZE / 3);
            assert_eq!(coin.height, CELL_SIZE / 3);
        }
    }

    #[test]
    fn end_game_evaluates_and_marks_the_session_over() {
        let mut game_state = open_board_game();
        assert_eq!(game_state.end_game(), -END_REWARD);
        assert!(game_state.is_game_over());
    }

    #[test]
    fn coin_count_override_survives_board_creation() {
        let mut game_state = GameState::new(0);
        game_state.configure_coins(5);
        game_state.create_board();
        assert_eq!(game_state.coins().len(), 5);
    }

    #[test]
    fn default_coin_count_is_two_or_three() {
        for seed in 0..20 {
            let mut game_state = GameState::new(seed);
            game_state.create_board();
            let count = game_state.coins().len();
            assert!(count == 2 || count == 3, "unexpected coin count {}", count);
        }
    }
}
