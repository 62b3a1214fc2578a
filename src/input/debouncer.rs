/*
 *  input/debouncer.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Edge triggered button debouncer
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

//! Turns per-sample pin levels into click events.
//!
//! Debouncing here is cadence based: the only filter is the sampling period
//! of the caller. A level change is taken at face value on the sample that
//! sees it, and only a released to pressed change reports a click. Contact
//! bounce faster than the sampling period is therefore not filtered; a bounce
//! that straddles two samples can produce a second click. That matches the
//! wiring this was built for (3 ms sampling, clean tactile switches).

use super::{ButtonId, Polarity};

/// Per-button state, owned by the sampling loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceState {
    pub stable_pressed: bool,
    pub last_raw_level: bool,
}

impl DebounceState {
    /// Feed one sample, returns `true` on a released to pressed edge.
    fn feed(&mut self, pressed: bool, raw_level: bool) -> bool {
        self.last_raw_level = raw_level;
        if pressed == self.stable_pressed {
            return false;
        }
        self.stable_pressed = pressed;
        pressed
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    polarity: Polarity,
    states: [DebounceState; 4],
}

impl Debouncer {
    pub fn new(polarity: Polarity) -> Self {
        // released is the resting level for the chosen wiring
        let idle = DebounceState {
            stable_pressed: false,
            last_raw_level: !polarity.is_pressed(true),
        };
        Self {
            polarity,
            states: [idle; 4],
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn state(&self, button: ButtonId) -> &DebounceState {
        &self.states[button.index()]
    }

    /// Record one raw sample for `button`.
    ///
    /// Returns `true` exactly when this sample moves the button from
    /// released to pressed. Releases and repeated levels are silent.
    pub fn update(&mut self, button: ButtonId, raw_level: bool) -> bool {
        let pressed = self.polarity.is_pressed(raw_level);
        self.states[button.index()].feed(pressed, raw_level)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Polarity::default())
    }
}
