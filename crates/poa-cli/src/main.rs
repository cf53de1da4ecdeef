use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(
    name = "poa",
    version,
    about = "Personal Operations Assistant – zero pleasantries, pure execution."
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deliver the brutal morning brief
    Morning,
    /// Score a task against your brain chemistry
    Evaluate {
        /// Task description to evaluate
        description: String,
    },
    /// Trigger the focus protector rituals
    Focus,
    /// Make a low-stakes decision without emotion
    Decide {
        /// Decision prompt
        question: String,
    },
    /// Check current energy and recommended usage
    Energy,
    /// Run the weekly reality check
    Weekly,
    /// Get the OB1 focus briefing
    Ob1,
    /// Engage the cognitive load manager
    Load,
    /// Inspect stored tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Inspect or reopen open loops
    Loops {
        #[command(subcommand)]
        action: commands::loops::LoopsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Morning => commands::ops::morning(),
        Commands::Evaluate { description } => commands::ops::evaluate(&description),
        Commands::Focus => commands::ops::focus(),
        Commands::Decide { question } => commands::ops::decide(&question),
        Commands::Energy => commands::ops::energy(),
        Commands::Weekly => commands::ops::weekly(),
        Commands::Ob1 => commands::ops::ob1(),
        Commands::Load => commands::ops::load(),
        Commands::Task { action } => commands::task::run(action),
        Commands::Loops { action } => commands::loops::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "poa", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
