use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sprite-compose", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place two images (or animations) side by side.
    Merge(MergeArgs),
    /// Print the bounding box of the visible pixels across all frames.
    Bbox(BboxArgs),
    /// Compose an animated actor next to a still target on a background.
    Action(ActionArgs),
    /// Crop a render down to its head.
    Emote(EmoteArgs),
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Left image (PNG, GIF or APNG).
    #[arg(long)]
    left: PathBuf,

    /// Right image (PNG, GIF or APNG).
    #[arg(long)]
    right: PathBuf,

    /// Gap between the two images in pixels; negative values overlap them.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pad: i32,

    /// Paint the right image over the left one.
    #[arg(long)]
    right_on_top: bool,

    /// Canvas fill as R,G,B,A.
    #[arg(long, value_parser = parse_rgba)]
    background: Option<[u8; 4]>,

    /// Frame delay in milliseconds for animated output.
    #[arg(long, default_value_t = 100)]
    duration: u32,

    /// Output path; `.gif` writes an animation, anything else a PNG of the first frame.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BboxArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Treat this R,G,B,A color as transparent.
    #[arg(long, value_parser = parse_rgba)]
    ignore: Option<[u8; 4]>,
}

#[derive(Parser, Debug)]
struct ActionArgs {
    /// Actor animation (feet-centered render).
    #[arg(long)]
    actor: PathBuf,

    /// Target still (feet-centered render).
    #[arg(long)]
    target: PathBuf,

    /// Treat the target as a profile picture and stand it in for a render.
    #[arg(long)]
    pfp: bool,

    /// Optional compose config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct EmoteArgs {
    /// Full-body render.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Zoom factor the render was made at.
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// Optional compose config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path (PNG).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Merge(args) => cmd_merge(args),
        Command::Bbox(args) => cmd_bbox(args),
        Command::Action(args) => cmd_action(args),
        Command::Emote(args) => cmd_emote(args),
    }
}

fn parse_rgba(s: &str) -> Result<[u8; 4], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected R,G,B,A, got '{s}'"));
    }
    let mut out = [0u8; 4];
    for (o, p) in out.iter_mut().zip(&parts) {
        *o = p
            .parse()
            .map_err(|e| format!("bad channel '{p}' in '{s}': {e}"))?;
    }
    Ok(out)
}

fn read_sequence(path: &Path) -> anyhow::Result<sprite_compose::FrameSequence> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let seq = sprite_compose::decode_sequence(&bytes)
        .with_context(|| format!("decode '{}'", path.display()))?;
    Ok(seq)
}

fn output_format(path: &Path) -> sprite_compose::OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("gif") => sprite_compose::OutputFormat::Animated,
        _ => sprite_compose::OutputFormat::Still,
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let left = read_sequence(&args.left)?;
    let right = read_sequence(&args.right)?;

    let opts = sprite_compose::MergeOpts {
        pad: args.pad,
        z_order: if args.right_on_top {
            sprite_compose::ZOrder::RightOnTop
        } else {
            sprite_compose::ZOrder::LeftOnTop
        },
        background: args.background.unwrap_or(sprite_compose::TRANSPARENT),
    };
    let merged = sprite_compose::merge_symmetric(
        left.frames().into(),
        right.frames().into(),
        &opts,
    )?;

    let bytes = sprite_compose::encode(
        &merged,
        &sprite_compose::Durations::Uniform(args.duration),
        true,
        output_format(&args.out),
    )?;
    write_output(&args.out, &bytes)
}

fn cmd_bbox(args: BboxArgs) -> anyhow::Result<()> {
    let seq = read_sequence(&args.in_path)?;
    let b = sprite_compose::compute_bounding_box(seq.frames(), args.ignore)?;
    println!("{} {} {} {}", b.left, b.top, b.right, b.bottom);
    Ok(())
}

fn read_config(path: Option<&Path>) -> anyhow::Result<sprite_compose::ComposeConfig> {
    let Some(path) = path else {
        return Ok(sprite_compose::ComposeConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = sprite_compose::ComposeConfig::from_json_reader(BufReader::new(f))
        .with_context(|| format!("load config '{}'", path.display()))?;
    Ok(cfg)
}

fn cmd_action(args: ActionArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;

    let actor = read_sequence(&args.actor)?;
    let target = read_sequence(&args.target)?;
    let target = if args.pfp {
        cfg.pfp_target(target.first())?
    } else {
        target.first().clone()
    };

    let seq = sprite_compose::compose_action(&actor, &target, &cfg.action_opts())?;
    let mut enc = cfg.encode_config();
    enc.format = output_format(&args.out);
    let bytes = sprite_compose::encode_sequence(&seq, &enc)?;
    write_output(&args.out, &bytes)
}

fn cmd_emote(args: EmoteArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let render = sprite_compose::decode_frame(&bytes)
        .with_context(|| format!("decode '{}'", args.in_path.display()))?;

    let head = cfg.emote(&render, args.zoom)?;
    write_output(&args.out, &sprite_compose::encode_png(&head)?)
}
