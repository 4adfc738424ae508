use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use solar_assets::AssetManifest;
use solar_common::{BodyKind, BodyModels, ModelHandle};
use solar_input::{Key, KeyboardState};
use solar_render::{DebugTextRenderer, Renderer};
use solar_scene::{SceneComposer, body, earth_position, moon_position};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solar-cli", about = "Headless tools for the solar scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scene constants and model paths
    Info {
        /// Directory the model paths are resolved against
        #[arg(long, default_value = ".")]
        asset_root: PathBuf,
    },
    /// Run the scene without a window and print each recorded frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Seconds between frames
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Frames on which Space is pressed
        #[arg(long, value_delimiter = ',')]
        toggle_at: Vec<u64>,
        /// Keys held for the whole run
        #[arg(long, value_delimiter = ',')]
        hold: Vec<HeldKey>,
        /// Emit one JSON snapshot per frame instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print earth and moon positions at an animation time
    Positions {
        /// Animation clock in seconds
        #[arg(short, long, default_value = "0")]
        t: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeldKey {
    W,
    A,
    S,
    D,
}

impl From<HeldKey> for Key {
    fn from(key: HeldKey) -> Self {
        match key {
            HeldKey::W => Key::W,
            HeldKey::A => Key::A,
            HeldKey::S => Key::S,
            HeldKey::D => Key::D,
        }
    }
}

/// Handles in the order the desktop app loads the models.
fn headless_models() -> BodyModels {
    BodyModels {
        sun: ModelHandle(0),
        earth: ModelHandle(1),
        moon: ModelHandle(2),
    }
}

/// Keys held on `frame` of a scripted run.
fn scripted_keys(frame: u64, toggle_at: &[u64], hold: &[HeldKey]) -> KeyboardState {
    let mut keys = KeyboardState::new();
    for key in hold {
        keys.press((*key).into());
    }
    if toggle_at.contains(&frame) {
        keys.press(Key::Space);
    }
    keys
}

fn simulate(frames: u64, dt: f32, toggle_at: &[u64], hold: &[HeldKey], json: bool) -> Result<()> {
    if !(dt.is_finite() && dt >= 0.0) {
        bail!("--dt must be a non-negative number, got {dt}");
    }

    let mut composer = SceneComposer::new(headless_models());
    let renderer = DebugTextRenderer::new();

    for frame in 0..frames {
        let keys = scripted_keys(frame, toggle_at, hold);
        let outcome = composer.frame(frame as f32 * dt, &keys);

        if json {
            let line = serde_json::to_string(&composer.snapshot())
                .context("failed to serialize snapshot")?;
            println!("{line}");
        } else {
            let state = composer.state();
            println!(
                "t={:.3} clock={:.3} active={} toggled={}",
                state.clock.current_time(),
                state.clock.animation_clock(),
                state.animation.active,
                outcome.input.toggled
            );
            print!("{}", renderer.render(&outcome.frame));
        }
    }

    tracing::debug!(frames, dt, "simulation finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { asset_root } => {
            println!("solar-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "sun: {:?}  earth orbit: {}  moon orbit: {}",
                body::SUN_POSITION,
                body::EARTH_ORBIT_RADIUS,
                body::MOON_ORBIT_RADIUS
            );
            let manifest = AssetManifest::default().resolve(&asset_root);
            for kind in BodyKind::ALL {
                let path = manifest.path(kind);
                let status = if path.is_file() { "ok" } else { "missing" };
                println!("model {:<6} {} [{status}]", kind, path.display());
            }
        }
        Commands::Simulate {
            frames,
            dt,
            toggle_at,
            hold,
            json,
        } => simulate(frames, dt, &toggle_at, &hold, json)?,
        Commands::Positions { t } => {
            let earth = earth_position(t);
            let moon = moon_position(t);
            println!("t={t}");
            println!("earth: ({:.4}, {:.4}, {:.4})", earth.x, earth.y, earth.z);
            println!("moon:  ({:.4}, {:.4}, {:.4})", moon.x, moon.y, moon.z);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_input::KeySource;

    #[test]
    fn scripted_keys_press_space_only_on_listed_frames() {
        let toggle_at = [2, 5];
        assert!(!scripted_keys(0, &toggle_at, &[]).is_pressed(Key::Space));
        assert!(scripted_keys(2, &toggle_at, &[]).is_pressed(Key::Space));
        assert!(scripted_keys(5, &toggle_at, &[]).is_pressed(Key::Space));
    }

    #[test]
    fn held_keys_stay_down_every_frame() {
        let keys = scripted_keys(7, &[], &[HeldKey::W, HeldKey::D]);
        assert!(keys.is_pressed(Key::W));
        assert!(keys.is_pressed(Key::D));
        assert!(!keys.is_pressed(Key::A));
    }

    #[test]
    fn simulate_subcommand_parses_lists() {
        let cli = Cli::parse_from([
            "solar-cli",
            "simulate",
            "--frames",
            "3",
            "--toggle-at",
            "1,2",
            "--hold",
            "w,a",
        ]);
        match cli.command {
            Commands::Simulate {
                frames,
                toggle_at,
                hold,
                json,
                ..
            } => {
                assert_eq!(frames, 3);
                assert_eq!(toggle_at, vec![1, 2]);
                assert_eq!(hold, vec![HeldKey::W, HeldKey::A]);
                assert!(!json);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn negative_dt_is_rejected() {
        assert!(simulate(1, -1.0, &[], &[], false).is_err());
    }
}
