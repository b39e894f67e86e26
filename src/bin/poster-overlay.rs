use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use poster_overlay::{
    BuildOptions, CanvasTemplate, CpuBackend, LayoutResult, MemoryImageMap, NameRegistry,
    Overlay, OverlayEngine, OverlayFile, OverlayKind,
    assets::decode::read_image,
    overlay::normalize::sanitize_file_name,
};

#[derive(Parser, Debug)]
#[command(name = "poster-overlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out every overlay of a definition file and print anchors and signatures.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Overlay definition file (JSON or YAML).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Canvas template(s) to lay out on.
    #[arg(long, value_enum, default_value_t = TemplateChoice::Both)]
    template: TemplateChoice,

    /// Write one preview PNG per overlay and template into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Assets root (`overlays/`, `fonts/`); defaults to the definition file's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Rating (0..10) used for rating text overlays.
    #[arg(long)]
    rating: Option<f64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TemplateChoice {
    Portrait,
    Landscape,
    Both,
}

impl TemplateChoice {
    fn templates(self) -> &'static [CanvasTemplate] {
        match self {
            Self::Portrait => &[CanvasTemplate::Portrait],
            Self::Landscape => &[CanvasTemplate::Landscape],
            Self::Both => &CanvasTemplate::ALL,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
    }
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let file = OverlayFile::from_path(&args.in_path)?;
    let root = match &args.root {
        Some(r) => r.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    let mut engine = OverlayEngine::new(CpuBackend::new(), BuildOptions::with_root(root));
    let mut registry = NameRegistry::new();
    let mut images = MemoryImageMap::new();
    let report = engine.load_file(&file, &mut registry, &mut images);

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }

    let total = report.overlays.len() + report.errors.len();
    let mut failed = Vec::new();
    for overlay in &report.overlays {
        let layouts = match lay_out(&mut engine, overlay, &args) {
            Ok(layouts) => layouts,
            Err(e) => {
                failed.push((overlay.mapping_name.clone(), e));
                continue;
            }
        };

        let line = serde_json::json!({
            "mapping": overlay.mapping_name,
            "name": overlay.spec.name,
            "signature": overlay.signature,
            "updated": overlay.updated,
            "layouts": layouts,
        });
        println!("{line}");
    }

    for (mapping, err) in &report.errors {
        eprintln!("{mapping}: {err}");
    }
    for (mapping, err) in &failed {
        eprintln!("{mapping}: {err:#}");
    }
    let failures = report.errors.len() + failed.len();
    if failures > 0 {
        anyhow::bail!("{failures} of {total} overlays failed");
    }
    Ok(())
}

/// Layout results of one overlay keyed by template, writing previews on the way.
fn lay_out(
    engine: &mut OverlayEngine<CpuBackend>,
    overlay: &Overlay,
    args: &LayoutArgs,
) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let mut layouts = serde_json::Map::new();
    for &template in args.template.templates() {
        let result = match (overlay.result(template), args.rating) {
            (Some(r), _) => Some(r.clone()),
            (None, Some(rating)) if overlay.is_deferred() => {
                engine.layout_rating(overlay, template, rating)?
            }
            (None, _) => None,
        };
        let Some(result) = result else {
            continue;
        };
        if let Some(dir) = &args.out_dir {
            write_preview(dir, overlay, &result)?;
        }
        layouts.insert(template.to_string(), serde_json::to_value(&result)?);
    }
    Ok(layouts)
}

/// Layer with the bound image stamped at its anchor, as the poster pipeline would composite it.
fn write_preview(dir: &Path, overlay: &Overlay, result: &LayoutResult) -> anyhow::Result<()> {
    let mut layer = match &result.layer {
        Some(l) => l.clone(),
        None => poster_overlay::OverlayLayer::transparent(result.template.canvas()),
    };
    let source = match &overlay.spec.kind {
        OverlayKind::Image { source } => Some(source),
        OverlayKind::Text { addon, .. } => addon.as_ref().map(|a| &a.source),
        OverlayKind::Blur { .. } => None,
    };
    if let Some(source) = source {
        layer.stamp(&read_image(&source.path)?, result.anchor);
    }

    let out = dir.join(format!(
        "{}.{}.png",
        sanitize_file_name(&overlay.mapping_name),
        result.template
    ));
    layer
        .to_rgba_image()
        .save_with_format(&out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}
