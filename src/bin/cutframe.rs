use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cutframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a session as a print-resolution PNG.
    Export(ExportArgs),
    /// Recolor the near-white area of frame artwork.
    Recolor(RecolorArgs),
    /// List every frame template.
    Layouts(LayoutsArgs),
    /// Print the export target for a frame and stage width.
    Resolve(ResolveArgs),
    /// Print the frame color palette.
    Palette(PaletteArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Session JSON.
    #[arg(long)]
    session: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Apply the mobile pixel-ratio cap.
    #[arg(long)]
    mobile: bool,

    /// On-screen stage width in pixels; overrides the session.
    #[arg(long)]
    stage_width: Option<f64>,
}

#[derive(Parser, Debug)]
struct RecolorArgs {
    /// Frame artwork (PNG, JPEG or SVG).
    #[arg(long)]
    artwork: PathBuf,

    /// Replacement color, `#RGB` or `#RRGGBB`.
    #[arg(long)]
    color: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Frame type identifier, e.g. `2h`.
    #[arg(long)]
    frame: String,

    /// On-screen stage width in pixels.
    #[arg(long)]
    stage_width: f64,

    /// Apply the mobile pixel-ratio cap.
    #[arg(long)]
    mobile: bool,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Palette JSON; the built-in palette is used when missing or invalid.
    #[arg(long)]
    config: Option<PathBuf>,
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
        Command::Export(args) => cmd_export(args),
        Command::Recolor(args) => cmd_recolor(args),
        Command::Layouts(args) => cmd_layouts(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Palette(args) => cmd_palette(args),
    }
}

/// `--mobile` forces the mobile class; otherwise `fallback` applies.
fn device(mobile: bool, fallback: cutframe::DeviceClass) -> cutframe::DeviceClass {
    if mobile {
        cutframe::DeviceClass::Mobile
    } else {
        fallback
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let session = cutframe::SessionFile::load(&args.session)?;
    let mut editor = session.build_editor()?;
    if let Some(w) = args.stage_width {
        editor.attach_stage(w)?;
    }
    let class = device(args.mobile, session.device);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let out = editor.export_now(class, now, true)?;
    eprintln!(
        "{}x{} px at ratio {:.3}{}",
        out.width,
        out.height,
        out.target.pixel_ratio,
        if out.target.capped { " (capped)" } else { "" }
    );
    write_output(&args.out, &out.png)
}

fn cmd_recolor(args: RecolorArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.artwork)
        .with_context(|| format!("read artwork '{}'", args.artwork.display()))?;
    let is_svg = args
        .artwork
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    let raster = if is_svg {
        let size = cutframe::assets::decode::parse_svg(&bytes)?.size();
        cutframe::assets::decode::rasterize_svg(
            &bytes,
            size.width().ceil().max(1.0) as u32,
            size.height().ceil().max(1.0) as u32,
        )?
    } else {
        cutframe::assets::decode::decode_image(&bytes)?
    };

    let Some(recolored) = cutframe::recolor_near_white(&raster, &args.color) else {
        anyhow::bail!("'{}' is not a hex color", args.color);
    };
    let frame = cutframe::FrameRGBA {
        width: recolored.width,
        height: recolored.height,
        data: recolored.pixels()?.to_vec(),
        premultiplied: false,
    };
    let png = cutframe::encode_png(&frame)?;
    write_output(&args.out, &png)
}

fn cmd_layouts(args: LayoutsArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(cutframe::layouts())?);
        return Ok(());
    }
    for l in cutframe::layouts() {
        println!(
            "{:<3} {}x{} {:?} {}",
            l.frame_type.as_str(),
            l.canvas.width,
            l.canvas.height,
            l.orientation(),
            l.name
        );
        for s in l.slots {
            println!(
                "    {} at ({}, {}) size {}x{}",
                s.id, s.x, s.y, s.width, s.height
            );
        }
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let frame = cutframe::FrameType::parse(&args.frame)
        .with_context(|| format!("unknown frame type '{}'", args.frame))?;
    let class = device(args.mobile, cutframe::DeviceClass::Desktop);
    let target = cutframe::resolve_export_target(frame, args.stage_width, class)?;
    println!("{}", serde_json::to_string_pretty(&target)?);
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let palette = match &args.config {
        Some(path) => cutframe::Palette::load(path),
        None => cutframe::Palette::default(),
    };
    for c in palette.colors() {
        println!("{c}");
    }
    Ok(())
}
