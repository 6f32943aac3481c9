use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "senti", version, about = "Sentiment classification for short social-media text")]
pub struct Cli {
    /// Config file path (default: ~/.senti/config.toml)
    #[arg(long, env = "SENTI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize texts (arguments, or one per stdin line)
    Clean(CleanArgs),
    /// Train on a labelled corpus, then classify texts
    Predict(PredictArgs),
    /// Train on one corpus and report accuracy on another
    Evaluate(EvaluateArgs),
    /// Show model type, status and training accuracy
    Info(InfoArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Texts to clean; reads stdin when omitted
    pub texts: Vec<String>,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Training corpus (JSON Lines: {"text": ..., "label": ...})
    #[arg(long)]
    pub corpus: PathBuf,

    /// Classify all inputs in one batch and print a single results object
    #[arg(long)]
    pub batch: bool,

    /// Texts to classify; reads stdin when omitted
    pub texts: Vec<String>,
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Training corpus (JSON Lines)
    #[arg(long)]
    pub corpus: PathBuf,

    /// Held-out corpus (JSON Lines)
    #[arg(long)]
    pub test: PathBuf,
}

#[derive(Parser)]
pub struct InfoArgs {
    /// Train on this corpus before reporting
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}
