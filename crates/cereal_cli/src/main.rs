#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "cereal", about = "cereal text inspection tools")]
struct Cli {
	/// Log decode decisions to stderr.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse text without a schema and print the node tree.
	Inspect(cmd::inspect::Args),
	/// Parse a fixed-point decimal and print its canonical form.
	Decimal(cmd::numeric::DecimalArgs),
	/// Parse a fraction and print it reduced.
	Rational(cmd::numeric::RationalArgs),
	/// Print the 31-multiply-accumulate hash of a string.
	Hash(cmd::hash::Args),
}

fn main() {
	let cli = Cli::parse();
	if cli.verbose {
		tracing_subscriber::fmt()
			.with_writer(std::io::stderr)
			.with_max_level(tracing::Level::TRACE)
			.with_target(false)
			.init();
	}

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> cereal::model::Result<()> {
	match command {
		Commands::Inspect(args) => cmd::inspect::run(args),
		Commands::Decimal(args) => cmd::numeric::run_decimal(args),
		Commands::Rational(args) => cmd::numeric::run_rational(args),
		Commands::Hash(args) => cmd::hash::run(args),
	}
}
