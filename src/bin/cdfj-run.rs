use anyhow::{Context, Result};
use cdfj_link::consts::CONTROL_BLOCK_LEN;
#[cfg(feature = "image_shared_memory")]
use cdfj_link::image_export::{ImageExport, DEFAULT_FLINK};
use cdfj_link::input::{ConsoleSwitches, Player};
use cdfj_link::{Config, InputState, Link, TvStandard};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs;

#[derive(Clone, Copy, ValueEnum)]
enum Tv {
    Ntsc,
    Pal,
    Secam,
}

impl From<Tv> for TvStandard {
    fn from(tv: Tv) -> Self {
        match tv {
            Tv::Ntsc => TvStandard::Ntsc,
            Tv::Pal => TvStandard::Pal,
            Tv::Secam => TvStandard::Secam,
        }
    }
}

#[derive(Parser)]
struct Args {
    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Read the configuration from this JSON file, other options override it
    #[arg(long)]
    config: Option<String>,

    /// Television standard
    #[arg(long, value_enum)]
    tv: Option<Tv>,

    /// Stretch the phase budget by this factor
    #[arg(long)]
    scale: Option<u32>,

    /// Interleave both sides on one thread instead of running the
    /// coprocessor on its own thread in real time
    #[arg(long, default_value_t = false)]
    lockstep: bool,

    /// Press fire on this frame to leave the splash screen
    #[arg(long, default_value_t = 30)]
    fire_at: u32,

    /// Press game reset on this frame to start a game from the menu
    #[arg(long, default_value_t = 90)]
    reset_at: u32,

    /// Print statistics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn scripted_input(args: &Args, frame: u32) -> InputState {
    let idle = InputState::idle();
    if frame == args.fire_at {
        idle.with_fire(Player::P0)
    } else if frame == args.reset_at {
        idle.with_switch_pressed(ConsoleSwitches::reset)
    } else {
        idle
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => Config::default(),
    };
    if let Some(tv) = args.tv {
        config.set_tv_standard(tv.into());
    }
    if let Some(scale) = args.scale {
        config.set_budget_scale(scale);
    }
    info!("{config:?}");

    let link = Link::new(config);
    let (stats, image, routine) = if args.lockstep {
        let mut link = link;
        for frame in 0..args.frames {
            link.set_input(scripted_input(&args, frame));
            link.step_frame();
        }
        info!("final mode {:?}", link.mode());
        (*link.stats(), link.image(), link.host().routine())
    } else {
        let (mut host, handle) = link.spawn().map_err(anyhow::Error::msg)?;
        #[cfg(feature = "image_shared_memory")]
        host.set_image_export(ImageExport::new(DEFAULT_FLINK).map_err(anyhow::Error::msg)?);
        for frame in 0..args.frames {
            host.set_input(scripted_input(&args, frame));
            host.run_frame(|_| ());
        }
        let coproc = handle.stop().map_err(anyhow::Error::msg)?;
        info!(
            "final mode {:?} after {} passes",
            coproc.active_mode(),
            coproc.passes()
        );
        (*host.stats(), host.image(), host.routine())
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "frames {} phases {} swaps {} unchanged {} timeouts {}",
            stats.frames, stats.phases, stats.swaps, stats.unchanged, stats.timeouts
        );
        println!("last routine {routine:?}");
        println!("control {:02x?}", image.slice(0, CONTROL_BLOCK_LEN));
    }
    Ok(())
}
