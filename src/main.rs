// SPDX-License-Identifier: GPL-3.0-only

//! Oskboard command-line inspector
//!
//! Loads a layout document, fits it into an allocation and prints the
//! resulting key geometry. Useful for checking a layout without a toolkit.
//!
//! ```text
//! oskboard <layout.json> [--size WxH] [--at X,Y] [--config FILE]
//! ```

use std::process::ExitCode;

use clap::Parser;
use oskboard::app_settings::APP_NAME;
use oskboard::config::RendererConfig;
use oskboard::layout::parse_layout_file;
use oskboard::renderer::{DisplayListBackend, Renderer};

#[derive(Debug, Parser)]
#[command(
    name = "oskboard",
    about = "Print the key geometry of an on-screen keyboard layout",
    version
)]
struct Options {
    /// JSON layout document
    #[arg(value_name = "LAYOUT")]
    layout: String,

    /// Allocation to fit the keyboard into, e.g. 800x300
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    size: Option<(f64, f64)>,

    /// Point to hit-test, e.g. 10,20
    #[arg(long, value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
    at: Option<(f64, f64)>,

    /// Renderer configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
}

fn parse_pair(value: &str, separator: char) -> Option<(f64, f64)> {
    let (a, b) = value.split_once(separator)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_size(value: &str) -> Result<(f64, f64), String> {
    parse_pair(value, 'x').ok_or_else(|| format!("invalid size '{}', expected WxH", value))
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    parse_pair(value, ',').ok_or_else(|| format!("invalid point '{}', expected X,Y", value))
}

fn run(options: Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let result = parse_layout_file(&options.layout)?;
    for warning in &result.warnings {
        eprintln!("{}", warning);
    }
    let mut keyboard = result.layout;

    let mut renderer = Renderer::new(&mut keyboard, DisplayListBackend::new(), config);
    if let Some((width, height)) = options.size {
        renderer.set_allocation_size(&keyboard, width, height)?;
    }

    let (width, height) = renderer.get_size(&keyboard);
    println!("size {:.1}x{:.1} (scale {:.3})", width, height, renderer.scale());

    for (section, key) in keyboard.keys() {
        let Some(bounds) = renderer.get_key_bounds(&keyboard, key, true) else {
            continue;
        };
        let label = keyboard
            .symbol_for_key(key)
            .map(|symbol| symbol.display_label().to_string())
            .unwrap_or_default();
        println!(
            "{} {} {:?} ({:.1}, {:.1}, {:.1}, {:.1})",
            section, key, label, bounds.x, bounds.y, bounds.width, bounds.height
        );
    }

    if let Some((x, y)) = options.at {
        match renderer.find_key_by_position(&keyboard, x, y) {
            Some(key) => println!("({}, {}) -> {}", x, y, key),
            None => println!("({}, {}) -> no key", x, y),
        }
    }

    renderer.detach(&mut keyboard);
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("{}=info", APP_NAME)
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Options::parse();

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}: {}", APP_NAME, e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: All options are recognized.
    #[test]
    fn test_parse_args() {
        let options = Options::try_parse_from([
            "oskboard", "us.json", "--size", "800x300", "--at", "10,20", "--config", "c.json",
        ])
        .unwrap();

        assert_eq!(options.layout, "us.json");
        assert_eq!(options.size, Some((800.0, 300.0)));
        assert_eq!(options.at, Some((10.0, 20.0)));
        assert_eq!(options.config.as_deref(), Some("c.json"));
    }

    /// Test 2: Bad input is rejected.
    #[test]
    fn test_parse_args_errors() {
        assert!(Options::try_parse_from(["oskboard"]).is_err());
        assert!(Options::try_parse_from(["oskboard", "a.json", "--size", "800"]).is_err());
        assert!(Options::try_parse_from(["oskboard", "a.json", "--at"]).is_err());
        assert!(Options::try_parse_from(["oskboard", "a.json", "b.json"]).is_err());
        assert!(Options::try_parse_from(["oskboard", "a.json", "--verbose"]).is_err());
    }

    /// Test 3: Pair values are split on their separator.
    #[test]
    fn test_parse_pairs() {
        assert_eq!(parse_size("640x 200"), Ok((640.0, 200.0)));
        assert_eq!(parse_point("-5,7.5"), Ok((-5.0, 7.5)));
        assert!(parse_size("640,200").is_err());
        assert!(parse_point("x,1").is_err());
    }
}
