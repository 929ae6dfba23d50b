mod encode;
mod reduce;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "whittle",
    about = "Whittle large 2D point series down to their most significant points"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reduce a point series to a target number of points
    Reduce(reduce::Opts),
    /// Transcode point streams between encodings
    Encode(encode::Opts),
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Reduce(opts) => reduce::reduce(&opts).await,
        Command::Encode(opts) => encode::encode(&opts).await,
    }
}
