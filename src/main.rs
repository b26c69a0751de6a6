mod error;
mod fault;
mod figure;
mod graphics;
mod math;
mod scene;
mod state;
mod svg;
mod vertex;
mod widget;

use anyhow::{Context, Result};
use clap::Parser;
use scene::SceneConfig;
use state::AppState;
use std::path::PathBuf;

/// Normal fault diagram: three rock layers cut by a dipping fault plane
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Start with the east block already displaced
    #[arg(short, long)]
    moved: bool,

    /// Render once to an SVG file instead of opening the viewer ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Slip distance of the east block, in scene units
    #[arg(long)]
    slip: Option<f64>,

    /// x-position of the fault at the first layer boundary
    #[arg(long)]
    fault_x: Option<f64>,

    /// Fault dip in degrees, strictly between 90 and 180
    #[arg(long, value_name = "DEG")]
    fault_angle: Option<f64>,

    /// Pixels per scene unit in SVG output
    #[arg(long, default_value_t = 100.0)]
    scale: f64,
}

impl Cli {
    /// Default scene with command line overrides applied and checked
    fn scene(&self) -> Result<SceneConfig> {
        let mut scene = SceneConfig::default();
        if let Some(slip) = self.slip {
            scene.slip = slip;
        }
        if let Some(fault_x) = self.fault_x {
            scene.fault_x = fault_x;
        }
        if let Some(angle) = self.fault_angle {
            scene.fault_angle_deg = angle;
        }
        scene.validate().context("invalid scene")?;
        Ok(scene)
    }
}

/// Main function
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let scene = cli.scene()?;
    let initial_state = AppState::new(cli.moved);

    match &cli.output {
        Some(path) => {
            anyhow::ensure!(
                cli.scale.is_finite() && cli.scale > 0.0,
                "scale must be positive (received {})",
                cli.scale
            );
            let figure = figure::render(&scene, initial_state.fault);
            let document = svg::render_svg(&figure, cli.scale);
            let target = (path.as_os_str() != "-").then_some(path.as_path());
            svg::write_output_svg(&document, target)
        }
        None => widget::run(scene, initial_state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;

    #[test]
    fn defaults_parse_to_the_flat_viewer() {
        let cli = Cli::try_parse_from(["normal-fault"]).unwrap();
        assert!(!cli.moved);
        assert!(cli.output.is_none());
        assert_eq!(cli.scale, 100.0);
        assert_eq!(cli.scene().unwrap(), SceneConfig::default());
    }

    #[test]
    fn overrides_reach_the_scene() {
        let cli = Cli::try_parse_from([
            "normal-fault",
            "--moved",
            "--slip",
            "0.5",
            "--fault-x",
            "4",
            "--fault-angle",
            "120",
            "-o",
            "-",
        ])
        .unwrap();
        assert!(cli.moved);
        let scene = cli.scene().unwrap();
        assert_eq!(scene.slip, 0.5);
        assert_eq!(scene.fault_x, 4.0);
        assert_eq!(scene.fault_angle_deg, 120.0);
    }

    #[test]
    fn vertical_fault_is_rejected() {
        let cli = Cli::try_parse_from(["normal-fault", "--fault-angle", "90"]).unwrap();
        let err = cli.scene().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SceneError>(),
            Some(&SceneError::FaultAngleOutOfRange(90.0))
        );
    }
}
