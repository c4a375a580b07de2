//! deskshot — save the current display to an image file.
//!
//! ```text
//! deskshot width
//! deskshot height
//! deskshot take <content-type> <path> <quality> <width> <height>
//! deskshot snap <path> [--config <file.json>]
//! ```
//!
//! `take` prints the result code and its description; the exit status is 0
//! only when the screenshot was saved. `snap` fills everything but the path
//! from `ScreenshotConfig` (`--config`, then `$DESKSHOT_CONFIG`, then defaults).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use deskshot::{ResultCode, ScreenshotArgs, ScreenshotConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: deskshot <width | height | take <content-type> <path> <quality> <width> <height> | snap <path> [--config <file>]>";

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("deskshot v{}", env!("CARGO_PKG_VERSION"));

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = argv.split_first() else {
        bail!("{USAGE}");
    };

    match command.as_str() {
        "width" | "getWidth" => {
            println!("width: {}", deskshot::display_width());
            Ok(ExitCode::SUCCESS)
        }
        "height" | "getHeight" => {
            println!("height: {}", deskshot::display_height());
            Ok(ExitCode::SUCCESS)
        }
        "take" => {
            let args = ScreenshotArgs::parse(rest)?;
            report(deskshot::take_screenshot_args(&args)?)
        }
        "snap" => snap(rest),
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn snap(rest: &[String]) -> Result<ExitCode> {
    let mut path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut it = rest.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let file = it.next().context("--config needs a file")?;
                config_path = Some(PathBuf::from(file));
            }
            p if path.is_none() => path = Some(PathBuf::from(p)),
            extra => bail!("unexpected argument {extra:?}\n{USAGE}"),
        }
    }
    let path = path.context("snap needs a destination path")?;
    let config = ScreenshotConfig::load(config_path.as_deref()).context("loading config")?;
    report(snap_with_config(&path, &config)?)
}

fn snap_with_config(path: &Path, config: &ScreenshotConfig) -> Result<i32> {
    let (w, h) = (deskshot::display_width(), deskshot::display_height());
    if w < 0 || h < 0 {
        return Ok(ResultCode::PlatformUnsupported.code());
    }
    let (width, height) = config.target_size(w as u32, h as u32);
    let code = deskshot::take_screenshot(
        &config.content_type,
        path,
        config.quality,
        i32::try_from(width).context("width out of range")?,
        i32::try_from(height).context("height out of range")?,
    )?;
    Ok(code)
}

fn report(code: i32) -> Result<ExitCode> {
    println!("{code}: {}", ResultCode::describe_code(code));
    Ok(if code == ResultCode::Success.code() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
