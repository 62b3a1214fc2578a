/*
 *  player/spotify.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Media source backed by the spotify command line client
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

use chrono::DateTime;
use log::{debug, trace};
use serde::Deserialize;
use tokio::process::Command;

use super::{MediaCommand, MediaError, MediaSource, PlaybackSnapshot};

// Envelope printed by `spotify status --raw`. Only a handful of fields feed
// the display, the rest are decoded so a malformed document is caught early.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct StatusEnvelope {
    device: Option<Device>,
    shuffle_state: bool,
    repeat_state: String,
    timestamp: i64,
    context: Option<Context>,
    progress_ms: f64,
    item: Option<Item>,
    currently_playing_type: String,
    actions: Option<Actions>,
    is_playing: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Device {
    id: Option<String>,
    is_active: bool,
    is_private_session: bool,
    is_restricted: bool,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    volume_percent: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct ExternalUrls {
    spotify: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Context {
    external_urls: ExternalUrls,
    href: String,
    #[serde(rename = "type")]
    kind: String,
    uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Artist {
    external_urls: ExternalUrls,
    href: String,
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Album {
    album_type: String,
    artists: Vec<Artist>,
    href: String,
    id: String,
    name: String,
    release_date: String,
    total_tracks: u32,
    uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Item {
    album: Album,
    artists: Vec<Artist>,
    disc_number: u32,
    duration_ms: f64,
    explicit: bool,
    href: String,
    id: String,
    is_local: bool,
    name: String,
    popularity: u32,
    track_number: u32,
    #[serde(rename = "type")]
    kind: String,
    uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Disallows {
    resuming: bool,
    skipping_prev: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Actions {
    disallows: Disallows,
}

/// Decode the first JSON document in `raw` into a snapshot.
///
/// Anything after the first document is ignored. A missing item, an empty
/// track name or a non-positive duration all mean no track is active.
pub fn parse_status(raw: &[u8]) -> Result<PlaybackSnapshot, MediaError> {
    let envelope = serde_json::Deserializer::from_slice(raw)
        .into_iter::<StatusEnvelope>()
        .next()
        .ok_or(MediaError::EmptyStatus)??;

    if let Some(ts) = DateTime::from_timestamp_millis(envelope.timestamp) {
        trace!("status stamped {}", ts.format("%H:%M:%S"));
    }

    let item = envelope.item.ok_or(MediaError::NoTrack)?;
    if item.name.is_empty() || !(item.duration_ms > 0.0) {
        return Err(MediaError::NoTrack);
    }

    Ok(PlaybackSnapshot::new(
        envelope.is_playing,
        envelope.progress_ms,
        item.duration_ms,
        item.name,
    ))
}

/// Arguments passed to the client for each transport command.
pub fn command_args(command: MediaCommand) -> &'static [&'static str] {
    match command {
        MediaCommand::Toggle => &["toggle"],
        MediaCommand::Next => &["next"],
        MediaCommand::Previous => &["previous"],
        MediaCommand::Save => &["save", "--track", ".", "-y"],
    }
}

/// Runs the `spotify` client (or a compatible program) once per call.
#[derive(Debug, Clone)]
pub struct SpotifyCli {
    program: String,
}

impl SpotifyCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, MediaError> {
        debug!("exec {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| MediaError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MediaError::ExitStatus {
                program: self.program.clone(),
                args: args.join(" "),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }
}

impl Default for SpotifyCli {
    fn default() -> Self {
        Self::new("spotify")
    }
}

impl MediaSource for SpotifyCli {
    async fn query(&mut self) -> Result<PlaybackSnapshot, MediaError> {
        let raw = self.run(&["status", "--raw"]).await?;
        parse_status(&raw)
    }

    async fn command(&mut self, command: MediaCommand) -> Result<(), MediaError> {
        // stdout carries nothing we act on
        self.run(command_args(command)).await.map(|_| ())
    }
}
