//! Command-line unit conversion
//!
//! Reads conversion queries from the arguments: everything is joined with
//! spaces and split on commas, so `metra 2 meters in inches, 1 mile in km`
//! runs two queries. Each result prints on its own line; the first failure
//! stops the run with the diagnostic on stderr and a nonzero exit code.

use clap::Parser;
use metra::Universe;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "metra", version, about = "Natural-language unit conversion")]
struct Args {
    /// The universe definition file to load
    #[arg(short, long, default_value = "universe.txt")]
    universe: PathBuf,

    /// Currency cache file; defaults to <universe>-currencies.<ext>
    #[arg(long)]
    currencies: Option<PathBuf>,

    /// Conversion queries; arguments are joined with spaces and split on
    /// commas into separate queries
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), metra::Error> {
    let mut universe = match &args.currencies {
        Some(currencies) => Universe::load_with_files(&args.universe, currencies)?,
        None => Universe::load(&args.universe)?,
    };
    log::debug!("loaded universe from {}", args.universe.display());

    let joined = args.query.join(" ");
    for query in joined.split(',') {
        let result = universe.convert(query)?;
        println!("{}", result.to_results_string(&universe));
    }
    Ok(())
}
