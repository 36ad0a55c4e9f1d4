//! Headless host for the tone curve editor.
//!
//! Replays a JSON script of pointer/layout actions, prints every listener
//! callback as one JSON line on stdout, and optionally writes the final
//! frame as SVG and grades an image with the resulting curves.

mod image_pass;
mod script;
mod svg;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tonecurve_core::{CurveEventQueue, DEFAULT_LUT_SIZE, EditorConfig, ToneCurveEditor};

#[derive(Parser, Debug)]
#[command(name = "tonecurve", about = "Replay tone curve edits headlessly")]
struct Args {
    /// JSON array of host actions to replay.
    #[arg(short, long)]
    script: PathBuf,

    /// Editor config as JSON (defaults apply to missing fields).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final frame as SVG.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Image to grade with the edited curves.
    #[arg(short, long, requires = "output")]
    input: Option<PathBuf>,

    /// Where to save the graded image.
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Entries per baked curve.
    #[arg(long, default_value_t = DEFAULT_LUT_SIZE)]
    lut_size: usize,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    EditorConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    log::info!("density {} / inset {}dp", config.density, config.inset_dp);

    let actions = script::load_script(&args.script)
        .with_context(|| format!("loading script {}", args.script.display()))?;

    let queue = CurveEventQueue::new();
    let mut editor = ToneCurveEditor::new(config).with_listener(queue.clone());
    let scene = script::replay(&mut editor, &actions);

    for event in queue.drain() {
        println!("{}", serde_json::to_string(&event)?);
    }

    if let Some(path) = &args.svg {
        match &scene {
            Some(scene) => {
                let mut renderer = svg::SvgRenderer::new(scene.bounds.width, scene.bounds.height);
                scene.paint(&mut renderer);
                std::fs::write(path, renderer.finish())
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {}", path.display());
            }
            None => log::warn!("no frame was painted, skipping SVG output"),
        }
    }

    if let (Some(input), Some(output)) = (&args.input, &args.output) {
        let lut = editor.tone_lut(args.lut_size.max(2));
        let (w, h) = image_pass::grade_file(input, output, &lut)?;
        log::info!("graded {w}x{h} image -> {}", output.display());
    }

    Ok(())
}
