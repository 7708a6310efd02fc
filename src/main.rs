use escape_room::app::App;
use escape_room::game::GameState;
use meap::Parser;
use rand::Rng;

struct Args {
    rng_seed: Option<u64>,
    walls: Option<usize>,
    coins: Option<usize>,
}

impl Args {
    fn parser() -> impl meap::Parser<Item = Self> {
        meap::let_map! {
            let {
                rng_seed = opt_opt::<u64, _>("INT", 'r')
                    .name("rng-seed")
                    .desc("seed for the random number generator");
                walls = opt_opt::<usize, _>("INT", 'w')
                    .name("walls")
                    .desc("number of walls to place");
                coins = opt_opt::<usize, _>("INT", 'c')
                    .name("coins")
                    .desc("number of coins to place (default: random 2 or 3)");
            } in {
                Self { rng_seed, walls, coins }
            }
        }
    }
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let Args {
        rng_seed,
        walls,
        coins,
    } = Args::parser().with_help_default().parse_env_or_exit();
    let rng_seed = rng_seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("rng seed: {}", rng_seed);
    let mut game_state = GameState::new(rng_seed);
    if let Some(walls) = walls {
        game_state.configure_walls(walls);
    }
    if let Some(coins) = coins {
        game_state.configure_coins(coins);
    }
    game_state.create_board();
    App::new(game_state).run()
}
