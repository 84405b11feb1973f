use std::{error::Error, time::Duration};

use clap::{Parser, Subcommand};
use connectx::{
    board::Board, clock::SystemClock, parsers::moves, transposition_table::TranspositionTable,
    Agent, AgentConfig, GameState, Player, Position,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value_t = 6, global = true)]
    rows: usize,
    #[arg(short, long, default_value_t = 7, global = true)]
    cols: usize,
    #[arg(short = 'x', long, default_value_t = 4, global = true)]
    connect: usize,
    /// Seconds per move.
    #[arg(short, long, default_value_t = 1.0, global = true)]
    timeout: f64,
    #[arg(short, long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the column the agent picks for a position.
    Select {
        /// 0-based columns played so far, e.g. "3 3 4 2".
        #[arg(default_value = "")]
        moves: String,
    },
    /// Let two agents play each other.
    Play {
        #[arg(short, long, default_value_t = 1)]
        games: usize,
    },
}

impl Cli {
    fn config(&self, first: bool) -> Result<AgentConfig, Box<dyn Error>> {
        let timeout = Duration::try_from_secs_f64(self.timeout)?;
        let mut config = AgentConfig::new(self.rows, self.cols, self.connect, first, timeout);
        if let Some(seed) = self.seed {
            // Distinct streams for the two sides.
            config = config.with_seed(seed.wrapping_add(u64::from(!first)));
        }
        Ok(config)
    }
}

fn select(cli: &Cli, notation: &str) -> Result<(), Box<dyn Error>> {
    let mut board = moves::parse(cli.rows, cli.cols, cli.connect, notation)?;
    if board.state().is_terminal() {
        return Err(format!("game is already over: {:?}", board.state()).into());
    }
    let first = board.side_to_move() == Player::First;
    let mut agent = Agent::new(cli.config(first)?)?;
    let report = agent.select_move_with_report(&mut board);

    println!("{board}");
    println!("{}", report.column);
    println!(
        "{:?} at depth {}, score {:?}, {} nodes, {} cache hits in {:?}",
        report.kind,
        report.depth,
        report.score,
        report.stats.nodes,
        report.stats.cache_hits,
        report.elapsed
    );
    Ok(())
}

fn play(cli: &Cli, games: usize) -> Result<(), Box<dyn Error>> {
    let mut tables = [TranspositionTable::new(), TranspositionTable::new()];
    let mut wins = [0usize; 2];
    let mut draws = 0;

    for game in 1..=games {
        let [first_table, second_table] = std::mem::take(&mut tables);
        let mut agents = [
            Agent::with_table(cli.config(true)?, SystemClock::default(), first_table)?,
            Agent::with_table(cli.config(false)?, SystemClock::default(), second_table)?,
        ];
        let mut board = Board::new(cli.rows, cli.cols, cli.connect);

        println!("Game {game}");
        while !board.state().is_terminal() {
            let mover = board.side_to_move();
            let report = agents[mover.index()].select_move_with_report(&mut board);
            board.try_play(report.column)?;
            println!(
                "{mover} plays {} ({:?}, depth {})\n{board}",
                report.column, report.kind, report.depth
            );
        }
        match board.state() {
            GameState::Won(player) => {
                wins[player.index()] += 1;
                println!("{player} wins\n");
            }
            _ => {
                draws += 1;
                println!("Draw\n");
            }
        }

        let [first, second] = agents;
        tables = [first.into_table(), second.into_table()];
    }

    println!(
        "{}: {}, {}: {}, draws: {draws}",
        Player::First,
        wins[0],
        Player::Second,
        wins[1]
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match &cli.command {
        Command::Select { moves } => select(&cli, moves),
        Command::Play { games } => play(&cli, *games),
    }
}
