//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::camera::ViewMode;
use crate::controls::allowed_view;
use crate::error::{Error, Result};
use crate::params::{RainParams, RenderConfig};
use crate::scene::DisplayMode;
use crate::weather::TimeOfDay;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Paddock")]
#[command(about = "F1 circuit, garage and car demo with day/night and rain", long_about = None)]
pub struct Args {
    /// Display mode at startup: circuit (default), garage, car
    #[arg(long, value_name = "MODE", default_value = "circuit")]
    pub mode: String,

    /// Camera at startup: orbit (default), chase
    #[arg(long, value_name = "VIEW", default_value = "orbit")]
    pub view: String,

    /// Start at night
    #[arg(long)]
    pub night: bool,

    /// Disable rain (it only falls at night)
    #[arg(long)]
    pub no_rain: bool,

    /// Number of rain drops
    #[arg(long, value_name = "N", default_value_t = RainParams::default().drop_count)]
    pub drops: u32,

    /// Seed for rain scattering and generated textures
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub seed: u32,

    /// Directory holding texture and skybox images
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = RenderConfig::default().window_width)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = RenderConfig::default().window_height)]
    pub height: u32,

    /// Hide the axis gizmo at startup
    #[arg(long)]
    pub no_axes: bool,
}

/// Startup state resolved from the arguments
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: DisplayMode,
    pub view: ViewMode,
    pub time: TimeOfDay,
    pub rain_enabled: bool,
    pub axes: bool,
    pub seed: u32,
    pub render: RenderConfig,
    pub rain: RainParams,
}

impl Args {
    /// Check the arguments and turn them into startup settings
    pub fn validate(&self) -> Result<Settings> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.drops == 0 {
            return Err(Error::InvalidConfig(
                "drop count must be at least 1 (use --no-rain to disable rain)".into(),
            ));
        }

        let mode = parse_mode(&self.mode)?;
        let requested = parse_view(&self.view)?;
        let view = allowed_view(requested, mode);
        if view != requested {
            log::warn!("Chase view needs the circuit; starting in orbit view");
        }

        Ok(Settings {
            mode,
            view,
            time: if self.night {
                TimeOfDay::Night
            } else {
                TimeOfDay::Day
            },
            rain_enabled: !self.no_rain,
            axes: !self.no_axes,
            seed: self.seed,
            render: RenderConfig {
                window_width: self.width,
                window_height: self.height,
                assets_dir: self.assets.clone(),
                ..Default::default()
            },
            rain: RainParams {
                drop_count: self.drops,
                ..Default::default()
            },
        })
    }
}

fn parse_mode(s: &str) -> Result<DisplayMode> {
    match s.to_lowercase().as_str() {
        "circuit" => Ok(DisplayMode::Circuit),
        "garage" => Ok(DisplayMode::Garage),
        "car" => Ok(DisplayMode::Car),
        other => Err(Error::InvalidConfig(format!(
            "unknown mode '{other}' (expected circuit, garage or car)"
        ))),
    }
}

fn parse_view(s: &str) -> Result<ViewMode> {
    match s.to_lowercase().as_str() {
        "orbit" => Ok(ViewMode::Orbit),
        "chase" => Ok(ViewMode::Chase),
        other => Err(Error::InvalidConfig(format!(
            "unknown view '{other}' (expected orbit or chase)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("paddock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&[]).validate().unwrap();
        assert_eq!(settings.mode, DisplayMode::Circuit);
        assert_eq!(settings.view, ViewMode::Orbit);
        assert_eq!(settings.time, TimeOfDay::Day);
        assert!(settings.rain_enabled);
        assert!(settings.axes);
        assert_eq!(settings.render.window_width, 600);
        assert_eq!(settings.rain.drop_count, 5000);
    }

    #[test]
    fn test_flags() {
        let settings = parse(&[
            "--mode", "Garage", "--night", "--no-rain", "--no-axes", "--drops", "200", "--assets",
            "/tmp/tex",
        ])
        .validate()
        .unwrap();
        assert_eq!(settings.mode, DisplayMode::Garage);
        assert_eq!(settings.time, TimeOfDay::Night);
        assert!(!settings.rain_enabled);
        assert!(!settings.axes);
        assert_eq!(settings.rain.drop_count, 200);
        assert_eq!(settings.render.assets_dir, PathBuf::from("/tmp/tex"));
    }

    #[test]
    fn test_chase_only_on_circuit() {
        let on_circuit = parse(&["--view", "chase"]).validate().unwrap();
        assert_eq!(on_circuit.view, ViewMode::Chase);
        let in_garage = parse(&["--view", "chase", "--mode", "garage"])
            .validate()
            .unwrap();
        assert_eq!(in_garage.view, ViewMode::Orbit);
    }

    #[test]
    fn test_rejects_bad_values() {
        for args in [
            &["--width", "0"][..],
            &["--height", "0"],
            &["--drops", "0"],
            &["--mode", "pitlane"],
            &["--view", "cockpit"],
        ] {
            assert!(
                matches!(parse(args).validate(), Err(Error::InvalidConfig(_))),
                "{args:?} accepted"
            );
        }
    }
}
