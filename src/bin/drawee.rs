use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use drawee::{
    ColorDrawable, DisplayList, Drawable, FadeState, GenericHierarchy, HierarchyBuilder,
    HierarchyOptions, HierarchyState, Rect, Rgba8Premul, RoundingParams, ScaleType, Size,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drawee", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive a hierarchy with a scripted event list and print one JSON line per frame.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Hierarchy config JSON (options plus solid-color content).
    #[arg(long)]
    config: PathBuf,

    /// Event script JSON: a list of `{ "at_ms": .., "event": .., ... }` steps.
    #[arg(long)]
    script: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 30)]
    frames: u64,

    /// Milliseconds between frames.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,
}

/// Solid-color content with an optional intrinsic size.
#[derive(Clone, Debug, serde::Deserialize)]
struct SolidContent {
    /// Straight (non-premultiplied) RGBA.
    color: [u8; 4],
    #[serde(default)]
    size: Option<[f64; 2]>,
}

impl SolidContent {
    fn drawable(&self) -> ColorDrawable {
        let [r, g, b, a] = self.color;
        let d = ColorDrawable::new(Rgba8Premul::from_straight_rgba(r, g, b, a));
        match self.size {
            Some([w, h]) => d.with_size(Size::new(w, h)),
            None => d,
        }
    }

    fn boxed(&self) -> Box<dyn Drawable> {
        Box::new(self.drawable())
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SimConfig {
    options: HierarchyOptions,
    width: Option<f64>,
    height: Option<f64>,
    background: Option<SolidContent>,
    placeholder: Option<SolidContent>,
    retry: Option<SolidContent>,
    failure: Option<SolidContent>,
    progress_bar: Option<SolidContent>,
    overlays: Vec<SolidContent>,
    pressed_state_overlay: Option<SolidContent>,
}

fn default_progress() -> f64 {
    1.0
}

#[derive(Debug, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    SetImage {
        image: SolidContent,
        #[serde(default = "default_progress")]
        progress: f64,
        #[serde(default)]
        immediate: bool,
    },
    SetProgress {
        progress: f64,
        #[serde(default)]
        immediate: bool,
    },
    SetFailure,
    SetRetry,
    Reset,
    SetOverlay {
        #[serde(default)]
        index: usize,
        image: Option<SolidContent>,
    },
    SetPlaceholder {
        image: Option<SolidContent>,
    },
    SetRoundingParams {
        params: Option<RoundingParams>,
    },
    SetActualImageScaleType {
        scale_type: ScaleType,
    },
    SetFadeDuration {
        ms: u64,
    },
    SetPressed {
        pressed: bool,
    },
}

#[derive(Debug, serde::Deserialize)]
struct ScriptStep {
    at_ms: u64,
    #[serde(flatten)]
    event: ScriptEvent,
}

#[derive(Debug, serde::Serialize)]
struct LayerReport {
    index: usize,
    empty: bool,
    state: FadeState,
    alpha: f64,
}

#[derive(Debug, serde::Serialize)]
struct FrameReport {
    frame: u64,
    t_ms: u64,
    state: HierarchyState,
    animating: bool,
    ops: usize,
    layers: Vec<LayerReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))?;
    Ok(value)
}

fn build_hierarchy(config: SimConfig) -> anyhow::Result<GenericHierarchy> {
    let mut builder = HierarchyBuilder::from_options(config.options);
    if let Some(c) = &config.background {
        builder = builder.background(c.drawable());
    }
    if let Some(c) = &config.placeholder {
        builder = builder.placeholder(c.drawable());
    }
    if let Some(c) = &config.retry {
        builder = builder.retry(c.drawable());
    }
    if let Some(c) = &config.failure {
        builder = builder.failure(c.drawable());
    }
    if let Some(c) = &config.progress_bar {
        builder = builder.progress_bar(c.drawable());
    }
    for c in &config.overlays {
        builder = builder.overlay(c.drawable());
    }
    if let Some(c) = &config.pressed_state_overlay {
        builder = builder.pressed_state_overlay(c.drawable());
    }
    let mut hierarchy = builder.build().context("build hierarchy")?;
    let width = config.width.unwrap_or(100.0);
    let height = config.height.unwrap_or(100.0);
    hierarchy.set_bounds(Rect::new(0.0, 0.0, width, height));
    Ok(hierarchy)
}

fn apply_event(h: &mut GenericHierarchy, event: &ScriptEvent) -> anyhow::Result<()> {
    match event {
        ScriptEvent::SetImage {
            image,
            progress,
            immediate,
        } => h.set_image(image.boxed(), *progress, *immediate)?,
        ScriptEvent::SetProgress {
            progress,
            immediate,
        } => h.set_progress(*progress, *immediate)?,
        ScriptEvent::SetFailure => h.set_failure()?,
        ScriptEvent::SetRetry => h.set_retry()?,
        ScriptEvent::Reset => h.reset()?,
        ScriptEvent::SetOverlay { index, image } => {
            h.set_overlay_image(*index, image.as_ref().map(SolidContent::boxed))?
        }
        ScriptEvent::SetPlaceholder { image } => {
            h.set_placeholder_image(image.as_ref().map(SolidContent::boxed))?
        }
        ScriptEvent::SetRoundingParams { params } => h.set_rounding_params(params.clone())?,
        ScriptEvent::SetActualImageScaleType { scale_type } => {
            h.set_actual_image_scale_type(*scale_type)?
        }
        ScriptEvent::SetFadeDuration { ms } => h.set_fade_duration(Duration::from_millis(*ms)),
        ScriptEvent::SetPressed { pressed } => h.set_pressed(*pressed)?,
    }
    Ok(())
}

fn frame_report(
    h: &GenericHierarchy,
    frame: u64,
    t_ms: u64,
    animating: bool,
    ops: usize,
) -> FrameReport {
    let layers = h
        .compositor()
        .layers()
        .enumerate()
        .map(|(index, slot)| LayerReport {
            index,
            empty: slot.is_empty(),
            state: slot.state(),
            alpha: slot.alpha(),
        })
        .collect();
    FrameReport {
        frame,
        t_ms,
        state: h.state(),
        animating,
        ops,
        layers,
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config: SimConfig = read_json(&args.config, "config")?;
    let mut steps: Vec<ScriptStep> = read_json(&args.script, "script")?;
    steps.sort_by_key(|s| s.at_ms);

    let mut hierarchy = build_hierarchy(config)?;
    let mut pending = steps.iter().peekable();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for frame in 0..args.frames {
        let t_ms = frame * args.step_ms;
        while let Some(step) = pending.next_if(|s| s.at_ms <= t_ms) {
            apply_event(&mut hierarchy, &step.event)
                .with_context(|| format!("apply {:?} at {} ms", step.event, step.at_ms))?;
        }
        let animating = hierarchy.tick(Duration::from_millis(t_ms));
        let mut list = DisplayList::new();
        hierarchy.draw(&mut list);
        let report = frame_report(&hierarchy, frame, t_ms, animating, list.ops().len());
        serde_json::to_writer(&mut out, &report).context("write frame report")?;
        writeln!(out).context("write frame report")?;
    }
    Ok(())
}
