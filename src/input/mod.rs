/*
 *  input/mod.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Button identities, pin sampling abstraction and input errors
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
use thiserror::Error;

pub mod debouncer;
pub mod dispatcher;
pub mod gpio;

#[cfg(test)]
pub mod mock;

pub use debouncer::Debouncer;
pub use dispatcher::Dispatcher;

/// The four transport buttons. Fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    PlayPause,
    Forward,
    Backward,
    Heart,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [
        ButtonId::PlayPause,
        ButtonId::Forward,
        ButtonId::Backward,
        ButtonId::Heart,
    ];

    /// Dense index for per-button tables.
    pub const fn index(self) -> usize {
        match self {
            ButtonId::PlayPause => 0,
            ButtonId::Forward => 1,
            ButtonId::Backward => 2,
            ButtonId::Heart => 3,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonId::PlayPause => "Play/Pause",
            ButtonId::Forward => "Forward",
            ButtonId::Backward => "Backward",
            ButtonId::Heart => "Heart",
        };
        write!(f, "{}", name)
    }
}

/// Switch wiring, decides which pin level counts as pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Pressed reads high
    #[default]
    NormallyOpen,
    /// Pressed reads low
    NormallyClosed,
}

impl Polarity {
    pub fn from_normally_closed(normally_closed: bool) -> Self {
        if normally_closed {
            Polarity::NormallyClosed
        } else {
            Polarity::NormallyOpen
        }
    }

    #[inline]
    pub fn is_pressed(self, level: bool) -> bool {
        match self {
            Polarity::NormallyOpen => level,
            Polarity::NormallyClosed => !level,
        }
    }
}

#[derive(Debug, Error)]
pub enum GpioError {
    #[error("GPIO unavailable: {0}")]
    Unavailable(String),
    #[error("pin {0} has not been configured as an input")]
    NotConfigured(u8),
    #[error("pin {pin}: {message}")]
    Pin { pin: u8, message: String },
}

/// Raw digital input sampling.
pub trait PinReader: Send {
    /// One-time setup before the first read.
    fn configure_as_input(&mut self, pin: u8) -> Result<(), GpioError>;

    /// `true` for a high level.
    fn read_level(&mut self, pin: u8) -> Result<bool, GpioError>;
}

pub type BoxedPins = Box<dyn PinReader>;

impl<T: PinReader + ?Sized> PinReader for Box<T> {
    fn configure_as_input(&mut self, pin: u8) -> Result<(), GpioError> {
        (**self).configure_as_input(pin)
    }

    fn read_level(&mut self, pin: u8) -> Result<bool, GpioError> {
        (**self).read_level(pin)
    }
}

/// BCM pin assignment for each button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPins {
    pub play_pause: u8,
    pub forward: u8,
    pub backward: u8,
    pub heart: u8,
}

impl ButtonPins {
    pub fn pin(&self, button: ButtonId) -> u8 {
        match button {
            ButtonId::PlayPause => self.play_pause,
            ButtonId::Forward => self.forward,
            ButtonId::Backward => self.backward,
            ButtonId::Heart => self.heart,
        }
    }

    /// Configure every button pin as an input.
    pub fn configure<P: PinReader + ?Sized>(&self, reader: &mut P) -> Result<(), GpioError> {
        for button in ButtonId::ALL {
            reader.configure_as_input(self.pin(button))?;
        }
        Ok(())
    }
}

impl Default for ButtonPins {
    fn default() -> Self {
        Self {
            play_pause: 23,
            forward: 24,
            backward: 25,
            heart: 16,
        }
    }
}
