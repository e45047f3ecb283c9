//! Solve a Futoshiki board from a file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};

use csp_propagators::futoshiki::{self, Board};
use csp_propagators::{BacktrackSearch, Propagator, VarOrder};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModelKind {
    /// Pairwise not-equal constraints for rows and columns.
    Binary,
    /// One all-different table per row and column.
    AllDiff,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The board to solve, one row per line: cells (`0` when empty) at even
    /// columns, `<`, `>` or `.` at odd columns.
    board_path: PathBuf,

    /// The propagator run after every assignment: bt, fc or gac.
    #[arg(short = 'p', long = "propagator", default_value_t = Propagator::Gac)]
    propagator: Propagator,

    /// The variable ordering: mrv or input.
    #[arg(short = 'o', long = "ordering", default_value_t = VarOrder::Mrv)]
    ordering: VarOrder,

    /// How rows and columns are modelled.
    #[arg(short = 'm', long = "model", value_enum, default_value_t = ModelKind::AllDiff)]
    model: ModelKind,

    /// Print every solution instead of the first one.
    #[arg(short = 'a', long = "all", default_value_t = false)]
    all: bool,

    /// Enables log message output from the propagators.
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "c {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: &Args) -> csp_propagators::Result<bool> {
    let text = match fs::read_to_string(&args.board_path) {
        Ok(text) => text,
        Err(err) => {
            error!("Cannot read {}: {}", args.board_path.display(), err);
            return Ok(false);
        }
    };

    let board: Board = text.parse()?;
    let (mut csp, vars) = match args.model {
        ModelKind::Binary => futoshiki::model_binary(&board)?,
        ModelKind::AllDiff => futoshiki::model_all_diff(&board)?,
    };
    info!(
        "{}x{} board, {} constraints",
        board.size(),
        board.size(),
        csp.constraints().len()
    );

    let mut search = BacktrackSearch::new(args.propagator, args.ordering);
    let solutions = if args.all {
        search.solve_all(&mut csp)
    } else {
        search.solve_any(&mut csp).into_iter().collect()
    };

    if solutions.is_empty() {
        println!("UNSATISFIABLE");
        return Ok(true);
    }

    for (idx, solution) in solutions.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print!("{}", board.render(&vars, solution));
    }
    info!("{} guesses", search.num_guesses());

    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
