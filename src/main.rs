use chess_referee::chess_board::fen::INITIAL_POSITION;
use chess_referee::chess_board::{perft, Color, Rules};
use chess_referee::error::GameResult;
use chess_referee::game::{Game, Selector};
use chess_referee::players::{RandomPlayer, SharedTerminal, Terminal};
use std::io;
use std::process::ExitCode;
use std::time::Instant;

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use log::{error, info};

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

fn rules_args(command: Command) -> Command {
    command
        .arg(arg!(
            --"allow-pinned-moves" "Let pinned pieces move even if that exposes their king"
        ))
        .arg(arg!(
            --"stalemate-draw" "Score a stalemate as a draw instead of a loss"
        ))
}

fn play_command() -> Command {
    let command = Command::new("play")
        .about("Play a game on the terminal")
        .arg(arg!(
            -f --fen <FEN> "Start position"
        ))
        .arg(
            arg!(
                --white <PLAYER> "Who plays White"
            )
            .value_parser(["human", "random"])
            .default_value("human"),
        )
        .arg(
            arg!(
                --black <PLAYER> "Who plays Black"
            )
            .value_parser(["human", "random"])
            .default_value("human"),
        )
        .arg(
            arg!(
                --seed <SEED> "Seed for the random players"
            )
            .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(
                --"max-plies" <N> "Stop the game after this many plies"
            )
            .value_parser(clap::value_parser!(u32)),
        );
    rules_args(command)
}

fn cli() -> Command {
    command!()
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(play_command())
        .subcommand(rules_args(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(INITIAL_POSITION),
                )
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8).range(1..)),
                ),
        ))
        .subcommand(rules_args(
            Command::new("moves").about("List the legal moves of a position").arg(
                arg!(
                -f --fen <FEN> "Board position"
                        )
                .default_value(INITIAL_POSITION),
            ),
        ))
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("debug"));

    let result = match matches.subcommand() {
        Some(("play", arg_matches)) => play(arg_matches),
        Some(("perft", arg_matches)) => run_perft(arg_matches),
        Some(("moves", arg_matches)) => list_moves(arg_matches),
        None => play(&play_command().get_matches_from(["play"])),
        _ => unreachable!("Exhausted list of subcommands"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn rules_from(matches: &ArgMatches) -> Rules {
    Rules {
        forbid_self_check: !matches.get_flag("allow-pinned-moves"),
        stalemate_is_draw: matches.get_flag("stalemate-draw"),
    }
}

fn fen_from(matches: &ArgMatches) -> &str {
    matches.get_one::<String>("fen").map(String::as_str).unwrap_or(INITIAL_POSITION)
}

type StdioTerminal = SharedTerminal<io::StdinLock<'static>, io::Stdout>;

fn seat(matches: &ArgMatches, color: Color, terminal: &StdioTerminal, seed: Option<u64>) -> Box<dyn Selector> {
    let name = if color == Color::White { "white" } else { "black" };
    match matches.get_one::<String>(name).map(String::as_str) {
        Some("random") => match seed {
            Some(seed) => Box::new(RandomPlayer::new(seed)),
            None => Box::new(RandomPlayer::from_entropy()),
        },
        _ => Box::new(terminal.clone()),
    }
}

fn play(matches: &ArgMatches) -> GameResult<()> {
    let mut game = Game::from_fen(fen_from(matches), rules_from(matches))?;
    let terminal = SharedTerminal::new(Terminal::stdio());
    let seed = matches.get_one::<u64>("seed").copied();
    let mut white = seat(matches, Color::White, &terminal, seed);
    let mut black = seat(matches, Color::Black, &terminal, seed.map(|s| s.wrapping_add(1)));
    let mut display = terminal;

    let outcome = match matches.get_one::<u32>("max-plies").copied() {
        None => Some(game.play(&mut display, white.as_mut(), black.as_mut())?),
        Some(max_plies) => {
            let mut outcome = None;
            for _ in 0..max_plies {
                let selector = if game.to_move() == Color::Black { black.as_mut() } else { white.as_mut() };
                outcome = game.play_turn(&mut display, selector)?;
                if outcome.is_some() {
                    break;
                }
            }
            outcome
        }
    };

    match outcome {
        Some(outcome) => info!("{}", outcome),
        None => println!("Stopped after the ply limit, final position {}", game.to_fen()),
    }
    Ok(())
}

#[derive(Tabled)]
struct PerftRow {
    #[tabled(rename = "move")]
    mv: String,
    nodes: u64,
}

fn run_perft(matches: &ArgMatches) -> GameResult<()> {
    let fen = fen_from(matches);
    let depth = *matches.get_one::<u8>("depth").unwrap_or(&3);
    let rules = rules_from(matches);
    println!("Perft test for {} with depth {}", fen, depth);

    let game = Game::from_fen(fen, rules)?;

    let start_time = Instant::now();
    let split = perft::divide(game.board(), game.to_move(), game.last_move(), &rules, depth);
    let elapsed = start_time.elapsed();

    let num_nodes: u64 = split.iter().map(|(_, nodes)| nodes).sum();
    let mut rows: Vec<PerftRow> = split
        .into_iter()
        .map(|(mv, nodes)| PerftRow {
            mv: mv.as_algebraic(),
            nodes,
        })
        .collect();
    rows.sort_by(|a, b| a.mv.cmp(&b.mv));
    println!("{}", Table::new(rows).with(Style::modern()));
    println!("\nNodes searched: {} in {:.3}s", num_nodes, elapsed.as_secs_f32());
    Ok(())
}

#[derive(Tabled)]
struct MovesRow {
    piece: String,
    square: String,
    moves: String,
}

fn list_moves(matches: &ArgMatches) -> GameResult<()> {
    let game = Game::from_fen(fen_from(matches), rules_from(matches))?;
    println!("{}", game.board());

    if let Some(outcome) = game.outcome() {
        println!("{}", outcome);
        return Ok(());
    }

    let rows: Vec<MovesRow> = game
        .selectable_pieces()
        .iter()
        .map(|piece| MovesRow {
            piece: piece.kind.to_string(),
            square: piece.square().as_algebraic(),
            moves: game
                .legal_moves(piece)
                .iter()
                .map(|mv| mv.to.as_algebraic())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect();
    let in_check = if game.check().in_check() { ", in check" } else { "" };
    println!("{} to move{}", game.to_move(), in_check);
    println!("{}", Table::new(rows).with(Style::modern()));
    Ok(())
}
