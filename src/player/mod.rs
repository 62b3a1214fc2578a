/*
 *  player/mod.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Playback snapshot model and the media source abstraction
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

use std::fmt;
use std::future::Future;
use thiserror::Error;

pub mod spotify;

#[cfg(test)]
pub mod mock;

pub use spotify::SpotifyCli;

/// One poll of the player, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub progress_ms: f64,
    pub duration_ms: f64,
    pub track_name: String,
}

impl PlaybackSnapshot {
    pub fn new(is_playing: bool, progress_ms: f64, duration_ms: f64, track_name: impl Into<String>) -> Self {
        Self {
            is_playing,
            progress_ms,
            duration_ms,
            track_name: track_name.into(),
        }
    }

    /// Fraction of the track played, `None` when the duration cannot divide.
    pub fn progress_ratio(&self) -> Option<f64> {
        if self.duration_ms > 0.0 && self.duration_ms.is_finite() && self.progress_ms.is_finite() {
            Some(self.progress_ms / self.duration_ms)
        } else {
            None
        }
    }
}

/// What the render loop sees each tick.
///
/// A player with nothing loaded is `Disconnected`, never a zero length
/// snapshot, so the progress ratio is only ever computed for real tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStatus {
    Disconnected,
    Active(PlaybackSnapshot),
}

impl PlayerStatus {
    pub fn snapshot(&self) -> Option<&PlaybackSnapshot> {
        match self {
            PlayerStatus::Active(snapshot) => Some(snapshot),
            PlayerStatus::Disconnected => None,
        }
    }
}

impl From<Result<PlaybackSnapshot, MediaError>> for PlayerStatus {
    fn from(result: Result<PlaybackSnapshot, MediaError>) -> Self {
        match result {
            Ok(snapshot) => PlayerStatus::Active(snapshot),
            Err(_) => PlayerStatus::Disconnected,
        }
    }
}

/// Transport commands issued by the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    Toggle,
    Next,
    Previous,
    Save,
}

impl MediaCommand {
    /// Operator log line for a command that did not go through.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MediaCommand::Toggle => "Could not play / pause song.",
            MediaCommand::Next => "Could not play next song.",
            MediaCommand::Previous => "Could not play previous song.",
            MediaCommand::Save => "Could not heart / unheart song.",
        }
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaCommand::Toggle => "toggle",
            MediaCommand::Next => "next",
            MediaCommand::Previous => "previous",
            MediaCommand::Save => "save",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program} {args}' exited with {status}")]
    ExitStatus {
        program: String,
        args: String,
        status: std::process::ExitStatus,
    },
    #[error("status JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("player returned an empty status")]
    EmptyStatus,
    #[error("no active track")]
    NoTrack,
}

/// Query and control a media player.
///
/// Neither call carries a timeout; a hung player stalls whichever loop
/// made the call until it returns.
pub trait MediaSource: Send {
    fn query(&mut self) -> impl Future<Output = Result<PlaybackSnapshot, MediaError>> + Send;

    fn command(&mut self, command: MediaCommand) -> impl Future<Output = Result<(), MediaError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio_guards_zero_duration() {
        let snapshot = PlaybackSnapshot::new(true, 1000.0, 0.0, "x");
        assert_eq!(snapshot.progress_ratio(), None);

        let snapshot = PlaybackSnapshot::new(true, 50.0, 200.0, "x");
        assert_eq!(snapshot.progress_ratio(), Some(0.25));
    }

    #[test]
    fn test_status_from_query_result() {
        let ok: Result<PlaybackSnapshot, MediaError> = Ok(PlaybackSnapshot::new(false, 0.0, 1.0, "a"));
        assert!(matches!(PlayerStatus::from(ok), PlayerStatus::Active(_)));

        let err: Result<PlaybackSnapshot, MediaError> = Err(MediaError::NoTrack);
        assert_eq!(PlayerStatus::from(err), PlayerStatus::Disconnected);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(MediaCommand::Toggle.to_string(), "toggle");
        assert_eq!(MediaCommand::Save.to_string(), "save");
        assert_eq!(MediaCommand::Next.failure_message(), "Could not play next song.");
    }
}
