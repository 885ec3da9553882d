//! SceneLens command-line front end.

mod frames;
mod input;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scenelens_engine::{
    MemorySampler, MemoryVideo, SearchOptions, SegmentationEngine, VideoSearch,
};
use scenelens_ml_client::{EmbeddingScorer, JudgmentScorer, MlClient};
use scenelens_models::{ScoredFrame, SearchMode, SearchRequest, VideoRef};

use crate::input::{load_policy, read_records, FrameRecord};
use crate::output::{print_json, report_with_keyframe_names};

#[derive(Debug, Parser)]
#[command(name = "scenelens", version, about = "Find the moments of a video that match a text query")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Segment a JSON array of scored frames
    Segment(SegmentArgs),
    /// Pick temporally spread frames from a JSON array of scored frames
    Select(SelectArgs),
    /// Score a directory of frames with the model service and segment them
    Search(SearchArgs),
    /// Print the effective segmentation policy
    Policy {
        /// Policy JSON file (defaults plus SCENELENS_* variables otherwise)
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Check that the model service is reachable
    Health,
}

#[derive(Debug, Args)]
struct SegmentArgs {
    /// Frame records JSON file, or - for stdin
    #[arg(long, default_value = "-")]
    frames: String,

    /// Query the frames were scored against
    #[arg(long, default_value = "")]
    query: String,

    /// Relevance threshold (defaults to the policy's)
    #[arg(long)]
    threshold: Option<f64>,

    /// Policy JSON file
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Cap candidates to this many temporally spread frames first
    #[arg(long)]
    preview: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Args)]
struct SelectArgs {
    /// Frame records JSON file, or - for stdin
    #[arg(long, default_value = "-")]
    frames: String,

    /// Number of frames to select
    #[arg(long)]
    k: usize,

    /// Policy JSON file
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScorerKind {
    /// Cosine similarity of image and query embeddings
    Embedding,
    /// Yes/no visual question per frame
    Judgment,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Directory of consecutive frame images (jpg or png), in file name order
    #[arg(long)]
    frames_dir: PathBuf,

    /// Frame rate of the frames in the directory
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Free-text query
    #[arg(long)]
    query: String,

    #[arg(long, value_enum, default_value_t = ScorerKind::Embedding)]
    scorer: ScorerKind,

    /// Sampling interval in seconds
    #[arg(long, default_value_t = 0.25)]
    interval: f64,

    /// Maximum number of segments
    #[arg(long, default_value_t = 10)]
    top_k: usize,

    /// Relevance threshold (defaults to the policy's)
    #[arg(long)]
    threshold: Option<f64>,

    /// Cap candidates with the temporal diversity selector before segmenting
    #[arg(long)]
    preview: bool,

    /// Policy JSON file
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("scenelens=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

fn read_scored_frames(source: &str) -> Result<Vec<ScoredFrame<String>>> {
    Ok(read_records(source)?
        .into_iter()
        .map(FrameRecord::into_scored)
        .collect())
}

fn sort_by_score_desc<I>(frames: &mut [ScoredFrame<I>]) {
    frames.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

fn run_segment(args: SegmentArgs) -> Result<()> {
    let engine = SegmentationEngine::new(load_policy(args.policy.as_deref())?)?;
    let frames = read_scored_frames(&args.frames)?;
    let threshold = args
        .threshold
        .unwrap_or(engine.policy().relevance_threshold);

    let candidates = match args.preview {
        Some(k) => {
            let mut ranked = frames.clone();
            sort_by_score_desc(&mut ranked);
            let mut selected: Vec<ScoredFrame<String>> =
                engine.select_diverse(&ranked, k).into_iter().cloned().collect();
            selected.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
            selected
        }
        None => frames,
    };

    let segments = engine
        .segment_with_threshold(&candidates, &args.query, threshold)
        .context("Segmentation failed")?;

    info!(
        frames = candidates.len(),
        segments = segments.len(),
        threshold,
        "Segmented frames"
    );

    print_json(&segments, args.pretty)
}

fn run_select(args: SelectArgs) -> Result<()> {
    let engine = SegmentationEngine::new(load_policy(args.policy.as_deref())?)?;
    let mut ranked = read_scored_frames(&args.frames)?;
    sort_by_score_desc(&mut ranked);

    let selected = engine.select_diverse(&ranked, args.k);
    print_json(&selected, args.pretty)
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let engine = SegmentationEngine::new(load_policy(args.policy.as_deref())?)?;
    let frames = frames::load_frames(&args.frames_dir)?;

    let video_id = args
        .frames_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frames".to_string());
    let video = VideoRef::new(video_id.clone(), args.frames_dir.display().to_string());
    let sampler = MemorySampler::new().with_video(video_id, MemoryVideo::new(args.fps, frames));

    let mut request = SearchRequest::new(args.query)
        .with_top_k(args.top_k)
        .with_frame_interval(args.interval)
        .with_mode(if args.preview {
            SearchMode::Preview
        } else {
            SearchMode::Segments
        });
    if let Some(threshold) = args.threshold {
        request = request.with_relevance_threshold(threshold);
    }

    let client = Arc::new(MlClient::from_env()?);
    if !client.health_check().await? {
        warn!(url = %client.config().base_url, "Model service reports unhealthy, continuing");
    }

    let options = SearchOptions::from_env();
    let report = match args.scorer {
        ScorerKind::Embedding => {
            VideoSearch::new(sampler, EmbeddingScorer::new(client), engine)
                .with_options(options)
                .search(&video, &request)
                .await?
        }
        ScorerKind::Judgment => {
            VideoSearch::new(sampler, JudgmentScorer::new(client), engine)
                .with_options(options)
                .search(&video, &request)
                .await?
        }
    };

    print_json(&report_with_keyframe_names(report, "query"), args.pretty)
}

async fn run_health() -> Result<bool> {
    let client = MlClient::from_env()?;
    let healthy = client.health_check().await?;
    println!(
        "{} {}",
        client.config().base_url,
        if healthy { "healthy" } else { "unhealthy" }
    );
    Ok(healthy)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Segment(args) => run_segment(args),
        Command::Select(args) => run_select(args),
        Command::Search(args) => run_search(args).await,
        Command::Policy { policy } => print_json(&load_policy(policy.as_deref())?, true),
        Command::Health => {
            if !run_health().await? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
