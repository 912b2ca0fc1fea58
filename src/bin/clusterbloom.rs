use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use clusterbloom::{
    FfmpegSink, FfmpegSinkOpts, FinalizeOutcome, FrameSink, PngSequenceOpts, PngSequenceSink,
    Sketch, SketchConfig,
};

#[derive(Parser, Debug)]
#[command(name = "clusterbloom", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sketch to a given tick and write that frame as a PNG.
    Frame(FrameArgs),
    /// Record the whole animation as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Record the whole animation as an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input sketch JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Animation tick (1-based). The final frame is written if the animation ends earlier.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input sketch JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// File name prefix of every frame.
    #[arg(long, default_value = "frame")]
    prefix: String,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input sketch JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Encode quality, 0..=100 (100 is lossless).
    #[arg(long, default_value_t = clusterbloom::encode::ffmpeg::DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> anyhow::Result<(SketchConfig, Sketch)> {
    let cfg = SketchConfig::from_path(path)
        .with_context(|| format!("load sketch '{}'", path.display()))?;
    let sketch = cfg.session()?;
    Ok((cfg, sketch))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (cfg, mut sketch) = load(&args.in_path)?;

    let mut seen = 0u64;
    let mut last = None;
    let report = cfg.run(&mut sketch, |out| {
        seen += 1;
        last = Some(out.frame.clone());
        Ok(if seen >= args.tick {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    })?;
    let commands = last.context("scripted run produced no frames")?;
    if !report.stopped {
        tracing::info!(
            requested = args.tick,
            ticks = report.ticks,
            "animation ended before the requested tick; writing the final frame"
        );
    }

    let frame = sketch.render(&commands)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (cfg, mut sketch) = load(&args.in_path)?;

    let opts = PngSequenceOpts {
        prefix: args.prefix,
        bg_rgba: cfg.background.to_rgba8(),
        ..PngSequenceOpts::new(&args.out_dir)
    };
    let frames = record(&cfg, &mut sketch, Box::new(PngSequenceSink::new(opts)))?;

    eprintln!("wrote {frames} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (cfg, mut sketch) = load(&args.in_path)?;

    let opts = FfmpegSinkOpts {
        overwrite: !args.no_overwrite,
        bg_rgba: cfg.background.to_rgba8(),
        quality: args.quality,
        ..FfmpegSinkOpts::new(&args.out)
    };
    record(&cfg, &mut sketch, Box::new(FfmpegSink::new(opts)))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn record(
    cfg: &SketchConfig,
    sketch: &mut Sketch,
    sink: Box<dyn FrameSink>,
) -> anyhow::Result<u64> {
    sketch.start_recording(sink)?;
    let report = match cfg.run(sketch, |_| Ok(ControlFlow::Continue(()))) {
        Ok(report) => report,
        Err(e) => {
            sketch.reset();
            return Err(e.into());
        }
    };
    match report.finalized {
        Some(FinalizeOutcome::Finalized { frames }) => Ok(frames),
        _ => {
            sketch.reset();
            anyhow::bail!("animation never completed; recording discarded")
        }
    }
}
