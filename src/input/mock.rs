/*
 *  input/mock.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scripted pin reader for tests
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

use std::collections::{HashMap, VecDeque};

use super::{GpioError, PinReader};

/// Plays back a queued level per pin, then holds the last one.
#[derive(Debug, Default)]
pub struct ScriptedPins {
    scripts: HashMap<u8, VecDeque<bool>>,
    last: HashMap<u8, bool>,
    configured: Vec<u8>,
}

impl ScriptedPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&mut self, pin: u8, levels: &[bool]) -> &mut Self {
        self.scripts.entry(pin).or_default().extend(levels.iter().copied());
        self
    }

    pub fn configured(&self) -> &[u8] {
        &self.configured
    }
}

impl PinReader for ScriptedPins {
    fn configure_as_input(&mut self, pin: u8) -> Result<(), GpioError> {
        self.configured.push(pin);
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> Result<bool, GpioError> {
        if !self.configured.contains(&pin) {
            return Err(GpioError::NotConfigured(pin));
        }
        let level = match self.scripts.get_mut(&pin).and_then(|q| q.pop_front()) {
            Some(level) => level,
            None => self.last.get(&pin).copied().unwrap_or(false),
        };
        self.last.insert(pin, level);
        Ok(level)
    }
}
