use clap::{Args, Parser, Subcommand, ValueEnum};
use growthlab_topics::{Embedder, LexicalEmbedder, SemanticEmbedder};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "growthlab")]
#[command(version)]
#[command(about = "Performance drivers and topic momentum for a video channel")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a channel snapshot and save the report
    Analyze(AnalyzeArgs),

    /// Convert a saved videos.list payload into a channel snapshot
    Import {
        /// Channel id the payload belongs to
        channel_id: String,

        /// Path to the videos.list JSON (one page or an array of pages)
        #[arg(short, long)]
        payload: PathBuf,

        /// Channel display name stored with the snapshot
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// List saved reports, newest first
    Results {
        /// Only this channel's reports
        #[arg(short, long)]
        channel: Option<String>,

        /// Print a summary of the newest report
        #[arg(long)]
        show: bool,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Channel id (UC...)
    pub channel_id: String,

    /// Snapshot file; defaults to the imported snapshot for the channel
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON analysis config; omitted fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Most recent uploads to analyze
    #[arg(short = 'n', long, default_value_t = 50)]
    pub n_videos: usize,

    /// Recent uploads forming the views-per-day baseline
    #[arg(short, long, default_value_t = 20)]
    pub baseline_window: usize,

    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = EmbedderKind::Semantic)]
    pub embedder: EmbedderKind,

    /// Print the full report JSON instead of a summary
    #[arg(long)]
    pub print: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Sentence embeddings (downloads all-MiniLM-L6-v2 on first use)
    Semantic,
    /// Hashed bag of words, offline
    Lexical,
}

impl EmbedderKind {
    /// Build the embedder, loading the sentence model up front. If the model
    /// cannot be loaded the lexical embedder takes its place.
    pub fn load(self) -> Box<dyn Embedder> {
        match self {
            EmbedderKind::Semantic => {
                let semantic = SemanticEmbedder::new();
                match semantic.warm_up() {
                    Ok(()) => Box::new(semantic),
                    Err(e) => {
                        warn!(error = %e, "Sentence model unavailable, using lexical embedder");
                        Box::new(LexicalEmbedder::default())
                    }
                }
            }
            EmbedderKind::Lexical => Box::new(LexicalEmbedder::default()),
        }
    }
}
