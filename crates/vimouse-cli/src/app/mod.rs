//! Command implementations and the host-side collaborators.

pub mod paths;
// Only `run` uses these outside tests.
#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
pub mod render;
#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
pub mod runner;
pub mod settings;

#[cfg(feature = "desktop")]
mod desktop;

use std::path::Path;

use anyhow::Context;
use vimouse_core::config::Config;
use vimouse_core::frame::Frame;
use vimouse_core::labels::{generate_labels, KeyboardLayout, LabelAssigner};
use vimouse_core::vision::detect_frame;

/// Decode a PNG or JPEG screenshot into an intensity frame.
pub fn load_frame(path: &Path) -> anyhow::Result<Frame> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_luma8();
    Ok(Frame::from_luma(image)?)
}

/// `vimouse detect`: run the pipeline on a file and print JSON.
pub fn detect(config: &Config, image: &Path, with_labels: bool) -> anyhow::Result<()> {
    let frame = load_frame(image)?;
    let regions = detect_frame(&frame, &config.detector)?;

    let json = if with_labels {
        let labels = LabelAssigner::new(&config.labels).assign(&regions);
        serde_json::to_string_pretty(&labels)?
    } else {
        serde_json::to_string_pretty(&regions)?
    };
    println!("{}", json);
    Ok(())
}

/// The first `count` codes that `count` regions would receive.
pub fn label_codes(config: &Config, count: usize) -> Vec<String> {
    let layout = KeyboardLayout::from_config(&config.labels);
    let mut codes = generate_labels(&layout, count);
    codes.truncate(count);
    codes
}

/// `vimouse labels`.
pub fn labels(config: &Config, count: usize) -> anyhow::Result<()> {
    let codes = label_codes(config, count);
    if codes.len() < count {
        tracing::warn!(
            available = codes.len(),
            requested = count,
            "layout cannot label every region"
        );
    }
    println!("{}", serde_json::to_string_pretty(&codes)?);
    Ok(())
}

/// `vimouse config`.
pub fn print_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// `vimouse run`: wire the desktop collaborators and poll until quit.
#[cfg(feature = "desktop")]
pub fn run(config: Config) -> anyhow::Result<()> {
    use tracing::info;
    use vimouse_core::overlay::Overlay;
    use vimouse_core::sequencer::InputSequencer;

    use self::desktop::{DesktopCapture, DesktopPointer, GlobalKeys};
    use self::render::JsonLineRenderer;

    let capture = DesktopCapture::probe()?;
    let keys = GlobalKeys::start()?;
    let pointer = DesktopPointer::new();
    let overlay = Overlay::new(&config, capture, JsonLineRenderer::stdout());
    let mut sequencer = InputSequencer::new(&config.input, keys, pointer, overlay)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let reason = runtime.block_on(runner::poll_loop(
        &mut sequencer,
        config.input.poll_interval(),
    ));
    info!(?reason, "stopped");
    Ok(())
}

#[cfg(not(feature = "desktop"))]
pub fn run(_config: Config) -> anyhow::Result<()> {
    anyhow::bail!(
        "this build has no desktop backend; rebuild with `--features desktop` to capture the \
         screen and listen for hotkeys"
    )
}
