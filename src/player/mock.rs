/*
 *  player/mock.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scripted media source for tests
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

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{MediaCommand, MediaError, MediaSource, PlaybackSnapshot};

/// Shared record of what a `ScriptedMedia` was asked to do.
#[derive(Debug, Default)]
pub struct ScriptedMediaState {
    pub queries: usize,
    pub commands: Vec<MediaCommand>,
    /// Commands that should fail instead of succeeding
    pub failing: Vec<MediaCommand>,
}

/// Hands out queued query results, then `NoTrack` once the queue runs dry.
pub struct ScriptedMedia {
    responses: VecDeque<Result<PlaybackSnapshot, MediaError>>,
    state: Arc<Mutex<ScriptedMediaState>>,
}

impl ScriptedMedia {
    pub fn new() -> Self {
        Self {
            responses: VecDeque::new(),
            state: Arc::new(Mutex::new(ScriptedMediaState::default())),
        }
    }

    pub fn push(&mut self, response: Result<PlaybackSnapshot, MediaError>) -> &mut Self {
        self.responses.push_back(response);
        self
    }

    pub fn fail_command(&mut self, command: MediaCommand) -> &mut Self {
        self.state.lock().unwrap().failing.push(command);
        self
    }

    pub fn state(&self) -> Arc<Mutex<ScriptedMediaState>> {
        Arc::clone(&self.state)
    }
}

impl MediaSource for ScriptedMedia {
    async fn query(&mut self) -> Result<PlaybackSnapshot, MediaError> {
        self.state.lock().unwrap().queries += 1;
        self.responses.pop_front().unwrap_or(Err(MediaError::NoTrack))
    }

    async fn command(&mut self, command: MediaCommand) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command);
        if state.failing.contains(&command) {
            return Err(MediaError::Spawn {
                program: "scripted".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
            });
        }
        Ok(())
    }
}
