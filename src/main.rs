/*
 *  main.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Track title and progress on a character LCD, with transport buttons
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::sync::Arc;
use anyhow::Context;
use log::{error, info, warn};
use env_logger::Env;
use tokio::sync::Mutex as TokMutex;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

mod config;
mod display;
mod glyphs;
mod input;
mod player;
mod scheduler;

use display::{BoxedDisplay, ConsoleDisplay, DisplayDevice, Hd44780, Renderer};
use input::{BoxedPins, Debouncer, Dispatcher, Polarity};
use player::SpotifyCli;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

fn open_display(cfg: &config::Config) -> anyhow::Result<BoxedDisplay> {
    let caps = cfg.capabilities();
    let mut display: BoxedDisplay = if cfg.emulated() {
        info!("Emulation mode enabled - display rows go to the log");
        Box::new(ConsoleDisplay::new(caps))
    } else {
        Box::new(Hd44780::new_i2c(cfg.i2c_bus(), cfg.i2c_address(), caps)?)
    };

    display.init().context("display init")?;
    glyphs::load_glyphs(&mut display).context("loading custom glyphs")?;
    display.clear().context("clearing display")?;
    Ok(display)
}

#[cfg(feature = "hardware")]
fn open_pins(cfg: &config::Config, polarity: Polarity) -> anyhow::Result<BoxedPins> {
    if cfg.emulated() {
        return Ok(Box::new(input::gpio::IdlePins::new(!polarity.is_pressed(true))));
    }
    Ok(Box::new(input::gpio::RppalPins::new()?))
}

#[cfg(not(feature = "hardware"))]
fn open_pins(_cfg: &config::Config, polarity: Polarity) -> anyhow::Result<BoxedPins> {
    warn!("built without GPIO support, buttons are disabled");
    Ok(Box::new(input::gpio::IdlePins::new(!polarity.is_pressed(true))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - now playing, one line at a time", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display = Arc::new(TokMutex::new(open_display(&cfg)?));

    let polarity = cfg.polarity();
    let pin_map = cfg.button_pins();
    let mut pins = open_pins(&cfg, polarity)?;
    pin_map.configure(&mut pins).context("configuring button pins")?;
    info!(
        "Buttons on GPIO {}/{}/{}/{} ({:?})",
        pin_map.play_pause, pin_map.forward, pin_map.backward, pin_map.heart, polarity
    );

    let media = Arc::new(TokMutex::new(SpotifyCli::new(cfg.media_program())));
    info!("Player control via '{}'", cfg.media_program());

    let render = scheduler::spawn_render_loop(
        Arc::clone(&media),
        Arc::clone(&display),
        Renderer::new(cfg.render_timing()),
        cfg.poll_period(),
    );
    let sampling = scheduler::spawn_sampling_loop(
        pins,
        pin_map,
        Debouncer::new(polarity),
        Dispatcher::new(Arc::clone(&media)),
        cfg.sample_period(),
    );

    if let Err(e) = signal_handler().await {
        error!("signal handling failed: {}", e);
    }

    sampling.stop().await;
    render.stop().await;

    if let Err(e) = display.lock().await.clear() {
        warn!("could not clear display on exit: {}", e);
    }
    info!("Bye");
    Ok(())
}
