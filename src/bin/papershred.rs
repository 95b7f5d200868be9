use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "papershred", version, about = "Paper-shredder animation for still images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame of the animation as numbered PNGs.
    Sequence(SequenceArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Play the animation in real time and optionally save the last frame.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Image to shred. Without it the sheet is the background only.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Settings JSON. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background image drawn unscaled under the sheet image.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Number of strips (2..=100).
    #[arg(long)]
    strips: Option<u32>,

    /// Animation length in seconds (1..=20).
    #[arg(long)]
    duration: Option<f64>,

    /// How the image is mapped onto the sheet.
    #[arg(long, value_enum)]
    fit: Option<FitChoice>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Animation progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Write the surface without the slide-out translation.
    #[arg(long)]
    no_present: bool,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Write the surface without the slide-out translation.
    #[arg(long)]
    no_present: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Frame rate of the real-time loop.
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// Save the final surface as a PNG.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitChoice {
    Stretch,
    Contain,
}

impl From<FitChoice> for papershred::Fit {
    fn from(c: FitChoice) -> Self {
        match c {
            FitChoice::Stretch => papershred::Fit::Stretch,
            FitChoice::Contain => papershred::Fit::Contain,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn resolve_config(args: &SheetArgs, fps: Option<u32>) -> anyhow::Result<papershred::ShredConfig> {
    let mut cfg = match &args.config {
        Some(path) => papershred::ShredConfig::load(path)?,
        None => papershred::ShredConfig::default(),
    };
    if let Some(n) = args.strips {
        cfg.strip_count = n;
    }
    if let Some(secs) = args.duration {
        cfg.duration_secs = secs;
    }
    if let Some(fit) = args.fit {
        cfg.fit = fit.into();
    }
    if let Some(bg) = &args.background {
        cfg.background_image = Some(bg.clone());
    }
    if let Some(fps) = fps {
        cfg.fps = fps;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_optional(path: Option<&Path>) -> anyhow::Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).with_context(|| format!("read image '{}'", p.display())))
        .transpose()
}

fn load_sheet(
    args: &SheetArgs,
    cfg: &papershred::ShredConfig,
) -> anyhow::Result<papershred::PixelBuffer> {
    let image = read_optional(args.image.as_deref())?;
    let background = read_optional(cfg.background_image.as_deref())?;
    let sheet = papershred::load_pixel_buffer(
        image.as_deref(),
        background.as_deref(),
        &cfg.sheet_opts(),
    )?;
    Ok(sheet)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be in [0, 1], got {}", args.progress);
    }
    let cfg = resolve_config(&args.sheet, None)?;
    let sheet = load_sheet(&args.sheet, &cfg)?;

    let frame = papershred::render_progress_frame(
        Some(&sheet),
        cfg.canvas,
        cfg.strip_count,
        args.progress,
        !args.no_present,
        &cfg.render_settings(),
    );

    papershred::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.sheet, args.fps)?;
    let sheet = load_sheet(&args.sheet, &cfg)?;

    let stats = papershred::write_png_sequence(
        Some(&sheet),
        cfg.canvas,
        &cfg.export_opts(!args.no_present),
        &args.out_dir,
    )?;

    eprintln!("wrote {} frames to {}", stats.frames, args.out_dir.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.sheet, args.fps)?;
    let sheet = load_sheet(&args.sheet, &cfg)?;

    papershred::render_to_mp4(
        Some(&sheet),
        cfg.canvas,
        &cfg.export_opts(true),
        &args.out,
        cfg.background_rgba,
    )?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.sheet, None)?;
    let sheet = load_sheet(&args.sheet, &cfg)?;

    let mut session = papershred::ShredderSession::new(
        cfg.canvas,
        papershred::SystemClock::new(),
        cfg.render_settings(),
    );
    session.set_sheet(Some(sheet));
    session.set_strip_count(cfg.strip_count);
    session.set_duration_seconds(cfg.duration_secs);
    session.on_play_state_changed(|playing| {
        tracing::info!(state = if playing { "pause" } else { "play" }, "toggle label");
    });

    let mut pacer = papershred::IntervalPacer::from_hz(args.hz);
    let mut next_tenth = 1u32;
    session.play();
    let report = papershred::run_frame_loop(&mut session, &mut pacer, |s, _| {
        let tenths = (s.progress() * 10.0).floor() as u32;
        if tenths >= next_tenth {
            tracing::info!(
                percent = (s.progress() * 100.0).round(),
                translate = %s.presentation().css_transform(),
                "shredding"
            );
            next_tenth = tenths + 1;
        }
    });
    tracing::info!(
        ticks = report.ticks,
        frames = session.frames_rendered(),
        "done"
    );

    if let Some(out) = &args.out {
        papershred::encode::ffmpeg::ensure_parent_dir(out)?;
        session.surface().to_frame().save_png(out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}
