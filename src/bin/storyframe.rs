use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "storyframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a slide JSON to a story image or video plus thumbnail.
    Render(RenderArgs),
    /// Print a filter descriptor scaled to an intensity.
    Filter(FilterArgs),
    /// Print the letterbox placement of media inside a canvas as JSON.
    Fit(FitArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Slide editing state JSON.
    #[arg(long)]
    slide: PathBuf,

    /// Output directory for `story.*` and `thumb.jpg`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default font for text layers.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Video container/codec.
    #[arg(long, value_enum)]
    codec: Option<CodecChoice>,

    /// Media root for relative locators (defaults to the slide's directory).
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FilterArgs {
    /// Full-strength descriptor, e.g. "brightness(1.2) contrast(1.4)".
    #[arg(long)]
    filter: String,

    /// Strength in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    intensity: f64,
}

#[derive(Parser, Debug)]
struct FitArgs {
    media_width: f64,
    media_height: f64,
    canvas_width: f64,
    canvas_height: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Webm,
    Mp4,
}

impl From<CodecChoice> for storyframe::VideoCodec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::Webm => Self::Vp9Webm,
            CodecChoice::Mp4 => Self::H264Mp4,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Filter(args) => cmd_filter(args),
        Command::Fit(args) => cmd_fit(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let slide = storyframe::StorySlide::from_path(&args.slide)?;

    let mut opts = match &args.config {
        Some(path) => storyframe::RenderOpts::from_json_path(path)?,
        None => storyframe::RenderOpts::default(),
    }
    .with_env_overrides();
    if let Some(font) = args.font {
        opts.font = Some(font);
    }
    if let Some(codec) = args.codec {
        opts.codec = codec.into();
    }
    let codec = opts.codec;
    let renderer = storyframe::StoryRenderer::from_opts(opts)?;

    let media_root = args.media_root.unwrap_or_else(|| {
        args.slide
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let loader = storyframe::FsMediaLoader::new(media_root);
    let mut recorder = storyframe::FfmpegRecorder::new();
    let mut scheduler = storyframe::ImmediateScheduler::new();
    let out = renderer.render(
        &slide,
        &loader,
        &mut recorder,
        &mut scheduler,
        &storyframe::CancelToken::new(),
    )?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory '{}'", args.out_dir.display()))?;
    let ext = match out.kind {
        storyframe::OutputKind::Image => "jpg",
        storyframe::OutputKind::Video => codec.extension(),
    };
    let file_path = args.out_dir.join(format!("story.{ext}"));
    let thumb_path = args.out_dir.join("thumb.jpg");
    std::fs::write(&file_path, &out.file)
        .with_context(|| format!("write '{}'", file_path.display()))?;
    std::fs::write(&thumb_path, &out.thumbnail)
        .with_context(|| format!("write '{}'", thumb_path.display()))?;

    eprintln!("wrote {}", file_path.display());
    eprintln!("wrote {}", thumb_path.display());
    Ok(())
}

fn cmd_filter(args: FilterArgs) -> anyhow::Result<()> {
    println!(
        "{}",
        storyframe::interpolate_filter(&args.filter, args.intensity)
    );
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let fit = storyframe::get_fit_dimensions(
        args.media_width,
        args.media_height,
        args.canvas_width,
        args.canvas_height,
    );
    println!("{}", serde_json::to_string(&fit)?);
    Ok(())
}
