/*
 *  config.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered YAML and command line configuration
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

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::display::{DisplayCapabilities, RenderTiming};
use crate::display::drivers::hd44780::DEFAULT_ADDRESS;
use crate::input::{ButtonId, ButtonPins, Polarity};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every field is optional and falls back to
/// the wiring of the original build: 16x2 panel at 0x27, buttons on
/// BCM 23/24/25/16, one second status poll, 3 ms pin sampling.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub buttons: Option<ButtonConfig>,
    pub timing: Option<TimingConfig>,
    pub media: Option<MediaConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub bus: Option<String>,        // e.g. "/dev/i2c-1"
    pub address: Option<u8>,        // PCF8574 backpack, 7-bit
    pub columns: Option<u8>,
    pub rows: Option<u8>,
    pub emulated: Option<bool>,     // log frames instead of driving the panel
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ButtonConfig {
    pub play_pause: Option<u8>,     // BCM numbering
    pub forward: Option<u8>,
    pub backward: Option<u8>,
    pub heart: Option<u8>,
    pub normally_closed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimingConfig {
    pub poll_ms: Option<u64>,
    pub sample_ms: Option<u64>,
    pub wipe_ms: Option<u64>,
    pub settle_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MediaConfig {
    pub program: Option<String>,    // spotify CLI or a compatible wrapper
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "spotlcd", version, about = "Now playing on a character LCD", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    /// I2C bus device path for the LCD (e.g., /dev/i2c-1)
    #[arg(long)]
    pub i2c_bus: Option<String>,
    /// I2C address of the LCD backpack, decimal or 0x hex
    #[arg(long, value_parser = parse_address)]
    pub i2c_address: Option<u8>,
    /// Buttons read low when pressed
    #[arg(long, action = ArgAction::SetTrue)]
    pub normally_closed: bool,
    /// Player status poll period in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,
    /// Button sampling period in milliseconds
    #[arg(long)]
    pub sample_ms: Option<u64>,
    /// Player control program
    #[arg(long)]
    pub spotify: Option<String>,
    /// Log the display instead of driving hardware, buttons held idle
    #[arg(long, action = ArgAction::SetTrue)]
    pub emulated: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = resolve(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and CLI, then validate.
pub fn resolve(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/spotlcd/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/spotlcd/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/spotlcd.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["spotlcd.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    // an empty file is a valid, empty config
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    match (&mut dst.buttons, src.buttons) {
        (None, Some(c)) => dst.buttons = Some(c),
        (Some(d), Some(s)) => merge_buttons(d, s),
        _ => {}
    }
    match (&mut dst.timing, src.timing) {
        (None, Some(c)) => dst.timing = Some(c),
        (Some(d), Some(s)) => merge_timing(d, s),
        _ => {}
    }
    match (&mut dst.media, src.media) {
        (None, Some(c)) => dst.media = Some(c),
        (Some(d), Some(s)) => {
            if s.program.is_some() { d.program = s.program; }
        }
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.bus.is_some()         { dst.bus = src.bus; }
    if src.address.is_some()     { dst.address = src.address; }
    if src.columns.is_some()     { dst.columns = src.columns; }
    if src.rows.is_some()        { dst.rows = src.rows; }
    if src.emulated.is_some()    { dst.emulated = src.emulated; }
}

fn merge_buttons(dst: &mut ButtonConfig, src: ButtonConfig) {
    if src.play_pause.is_some()      { dst.play_pause = src.play_pause; }
    if src.forward.is_some()         { dst.forward = src.forward; }
    if src.backward.is_some()        { dst.backward = src.backward; }
    if src.heart.is_some()           { dst.heart = src.heart; }
    if src.normally_closed.is_some() { dst.normally_closed = src.normally_closed; }
}

fn merge_timing(dst: &mut TimingConfig, src: TimingConfig) {
    if src.poll_ms.is_some()     { dst.poll_ms = src.poll_ms; }
    if src.sample_ms.is_some()   { dst.sample_ms = src.sample_ms; }
    if src.wipe_ms.is_some()     { dst.wipe_ms = src.wipe_ms; }
    if src.settle_ms.is_some()   { dst.settle_ms = src.settle_ms; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".to_string()); }

    if cli.i2c_bus.is_some() || cli.i2c_address.is_some() || cli.emulated {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.i2c_bus.is_some()     { display.bus = cli.i2c_bus.clone(); }
        if cli.i2c_address.is_some() { display.address = cli.i2c_address; }
        if cli.emulated              { display.emulated = Some(true); }
    }
    if cli.normally_closed {
        cfg.buttons.get_or_insert_with(ButtonConfig::default).normally_closed = Some(true);
    }
    if cli.poll_ms.is_some() || cli.sample_ms.is_some() {
        let timing = cfg.timing.get_or_insert_with(TimingConfig::default);
        if cli.poll_ms.is_some()     { timing.poll_ms = cli.poll_ms; }
        if cli.sample_ms.is_some()   { timing.sample_ms = cli.sample_ms; }
    }
    if cli.spotify.is_some() {
        cfg.media.get_or_insert_with(MediaConfig::default).program = cli.spotify.clone();
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let caps = cfg.capabilities();
    if caps.rows < 2 || caps.rows > 4 {
        return Err(ConfigError::Validation("display rows must be 2..=4".into()));
    }
    if caps.columns < 16 {
        return Err(ConfigError::Validation("display needs at least 16 columns".into()));
    }
    if cfg.i2c_address() > 0x7f {
        return Err(ConfigError::Validation("display address must be a 7-bit I2C address".into()));
    }

    let timing = cfg.timing.clone().unwrap_or_default();
    if timing.poll_ms == Some(0) || timing.sample_ms == Some(0) {
        return Err(ConfigError::Validation("timing poll_ms/sample_ms must be > 0".into()));
    }

    let pins = cfg.button_pins();
    for (i, a) in ButtonId::ALL.iter().enumerate() {
        for b in ButtonId::ALL.iter().skip(i + 1) {
            if pins.pin(*a) == pins.pin(*b) {
                return Err(ConfigError::Validation(format!(
                    "buttons {} and {} share GPIO {}", a, b, pins.pin(*a)
                )));
            }
        }
    }
    Ok(())
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn i2c_bus(&self) -> &str {
        self.display.as_ref().and_then(|d| d.bus.as_deref()).unwrap_or("/dev/i2c-1")
    }

    pub fn i2c_address(&self) -> u8 {
        self.display.as_ref().and_then(|d| d.address).unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn emulated(&self) -> bool {
        self.display.as_ref().and_then(|d| d.emulated).unwrap_or(false)
    }

    pub fn capabilities(&self) -> DisplayCapabilities {
        let base = DisplayCapabilities::default();
        let display = self.display.clone().unwrap_or_default();
        DisplayCapabilities {
            rows: display.rows.unwrap_or(base.rows),
            columns: display.columns.unwrap_or(base.columns),
            ..base
        }
    }

    pub fn button_pins(&self) -> ButtonPins {
        let base = ButtonPins::default();
        let buttons = self.buttons.clone().unwrap_or_default();
        ButtonPins {
            play_pause: buttons.play_pause.unwrap_or(base.play_pause),
            forward: buttons.forward.unwrap_or(base.forward),
            backward: buttons.backward.unwrap_or(base.backward),
            heart: buttons.heart.unwrap_or(base.heart),
        }
    }

    pub fn polarity(&self) -> Polarity {
        let closed = self.buttons.as_ref().and_then(|b| b.normally_closed).unwrap_or(false);
        Polarity::from_normally_closed(closed)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.timing.as_ref().and_then(|t| t.poll_ms).unwrap_or(1000))
    }

    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.timing.as_ref().and_then(|t| t.sample_ms).unwrap_or(3))
    }

    pub fn render_timing(&self) -> RenderTiming {
        let base = RenderTiming::default();
        let timing = self.timing.clone().unwrap_or_default();
        RenderTiming {
            wipe: timing.wipe_ms.map(Duration::from_millis).unwrap_or(base.wipe),
            settle: timing.settle_ms.map(Duration::from_millis).unwrap_or(base.settle),
        }
    }

    pub fn media_program(&self) -> &str {
        self.media.as_ref().and_then(|m| m.program.as_deref()).unwrap_or("spotify")
    }
}
