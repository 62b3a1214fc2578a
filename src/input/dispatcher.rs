/*
 *  input/dispatcher.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Routes button clicks to media player commands
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
use log::{error, info};
use tokio::sync::Mutex as TokMutex;

use super::ButtonId;
use crate::player::{MediaCommand, MediaSource};

/// Command issued for each button.
pub fn command_for(button: ButtonId) -> MediaCommand {
    match button {
        ButtonId::PlayPause => MediaCommand::Toggle,
        ButtonId::Forward => MediaCommand::Next,
        ButtonId::Backward => MediaCommand::Previous,
        ButtonId::Heart => MediaCommand::Save,
    }
}

pub struct Dispatcher<M: MediaSource> {
    media: Arc<TokMutex<M>>,
}

impl<M: MediaSource> Dispatcher<M> {
    pub fn new(media: Arc<TokMutex<M>>) -> Self {
        Self { media }
    }

    /// Run the command for `button` to completion.
    ///
    /// Failures are logged and dropped, there is no retry. The caller waits
    /// for the player process to exit, so a slow command holds up whatever
    /// loop called this.
    pub async fn fire(&self, button: ButtonId) -> bool {
        info!("Clicked {}.", button);
        let command = command_for(button);
        let mut media = self.media.lock().await;
        match media.command(command).await {
            Ok(()) => true,
            Err(e) => {
                error!("{} ({})", command.failure_message(), e);
                false
            }
        }
    }
}
