use crate::game::{self, GameState};
use crate::ui;
use direction::CardinalDirection;
use std::io::{self, Write};
use std::time::Instant;

const SAVE_FILE: &str = "escape-room-save.json";

enum Command {
    Move(CardinalDirection),
    SafeStep,
    Replay,
    Quit,
    Save,
    Load,
    Help,
}

fn parse_command(input: &str) -> Option<Command> {
    match input.trim() {
        "a" | "left" => Some(Command::Move(CardinalDirection::West)),
        "d" | "right" => Some(Command::Move(CardinalDirection::East)),
        "w" | "up" => Some(Command::Move(CardinalDirection::North)),
        "s" | "down" => Some(Command::Move(CardinalDirection::South)),
        "x" | "space" => Some(Command::SafeStep),
        "r" | "replay" => Some(Command::Replay),
        "q" | "quit" => Some(Command::Quit),
        "save" => Some(Command::Save),
        "load" => Some(Command::Load),
        "h" | "help" | "?" => Some(Command::Help),
        _ => None,
    }
}

pub struct App {
    game_state: GameState,
    last_tick: Instant,
    printed_messages: usize,
}

impl App {
    pub fn new(game_state: GameState) -> Self {
        Self {
            game_state,
            last_tick: Instant::now(),
            printed_messages: 0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        self.draw()?;
        let mut line = String::new();
        loop {
            line.clear();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }
            // expire any freeze or immunity windows that elapsed while waiting
            // for input
            self.game_state.tick(self.last_tick.elapsed());
            self.last_tick = Instant::now();
            match parse_command(&line) {
                Some(Command::Move(direction)) => {
                    let penalty = self.game_state.move_player(game::step_delta(direction));
                    if penalty != 0 {
                        log::debug!("move rejected with penalty {}", penalty);
                    }
                }
                Some(Command::SafeStep) => self.game_state.safe_step(),
                Some(Command::Replay) => {
                    let outcome = self.game_state.replay();
                    log::info!("replay outcome: {}", outcome);
                }
                Some(Command::Quit) => {
                    let outcome = self.game_state.end_game();
                    log::info!("final outcome: {}", outcome);
                }
                Some(Command::Save) => self.save(),
                Some(Command::Load) => self.load(),
                Some(Command::Help) => print_help(),
                None => log::warn!("unrecognised input: {:?}", line.trim()),
            }
            self.draw()?;
            if self.game_state.is_game_over() {
                break;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        let messages = self.game_state.message_log();
        for &message in &messages[self.printed_messages..] {
            println!("{}", ui::message_text(message));
        }
        self.printed_messages = messages.len();
        print!("{}", ui::render_board(&self.game_state));
        println!("{}", ui::render_status(&self.game_state));
        print!("> ");
        io::stdout().flush()
    }

    // Save and load failures are reported and tolerated; the game stays playable
    fn save(&self) {
        match serde_json::to_string(&self.game_state) {
            Ok(json) => {
                if let Err(error) = std::fs::write(SAVE_FILE, json) {
                    log::error!("failed to write {}: {}", SAVE_FILE, error);
                }
            }
            Err(error) => log::error!("failed to serialise game state: {}", error),
        }
    }

    fn load(&mut self) {
        let json = match std::fs::read_to_string(SAVE_FILE) {
            Ok(json) => json,
            Err(error) => {
                log::error!("failed to read {}: {}", SAVE_FILE, error);
                return;
            }
        };
        match serde_json::from_str(&json) {
            Ok(game_state) => {
                self.game_state = game_state;
                self.printed_messages = self.game_state.message_log().len();
            }
            Err(error) => log::error!("failed to parse {}: {}", SAVE_FILE, error),
        }
    }
}

fn print_help() {
    println!("w/a/s/d or up/left/down/right: move one cell");
    println!("x or space: step safely (2 seconds of trap immunity)");
    println!("r: evaluate the outcome and restart from the start cell");
    println!("q: evaluate the outcome and quit");
    println!("save / load: snapshot the game to {}", SAVE_FILE);
}
