use crate::commands::{run_assess, run_encoders, run_wellness, AssessArgs, WellnessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wellness_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wellness Risk Engine",
    about = "Score vitamin D, eye health, posture and overall wellness risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single domain and print the result as JSON
    Assess(AssessArgs),
    /// Score every domain and print the blended wellness score
    Wellness(WellnessArgs),
    /// List model load state and the category vocabularies each model accepts
    Encoders,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Wellness(args) => run_wellness(args),
        Command::Encoders => run_encoders(),
    }
}
