use clap::{Parser, Subcommand};
use pickforge::grid::GridSpec;
use std::process;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Floor geometry JSON; the standard 11x13 floor when omitted.
    #[arg(global = true, short, long)]
    grid: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Route(cmd::route::RouteArgs),
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("\n🏭 Initializing PickForge Core...");

    // 1. Resolve Floor Geometry
    let spec = match &cli.grid {
        Some(path) => {
            println!("📂 Loading Floor: {}", path);
            match GridSpec::load_from_file(path) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("\n❌ FATAL ERROR LOADING FLOOR:");
                    eprintln!("   {}", e);
                    process::exit(1);
                }
            }
        }
        None => {
            println!("📐 Using Standard 11x13 Floor");
            GridSpec::standard()
        }
    };

    // 2. Execute
    let result = match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args, &spec),
        Commands::Route(args) => cmd::route::run(args, &spec),
        Commands::Validate(args) => cmd::validate::run(args, &spec),
    };

    if let Err(e) = result {
        eprintln!("\n❌ FATAL: {}", e);
        process::exit(1);
    }
}
