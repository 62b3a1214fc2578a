/*
 *  input/gpio.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Pin readers: Raspberry Pi GPIO and an idle stand-in
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

use std::collections::HashMap;
use log::debug;

use super::{GpioError, PinReader};

#[cfg(feature = "hardware")]
pub use self::rpi::RppalPins;

#[cfg(feature = "hardware")]
mod rpi {
    use super::*;
    use rppal::gpio::{Gpio, InputPin};

    /// Buttons wired straight to the header, read through `/dev/gpiomem`.
    pub struct RppalPins {
        gpio: Gpio,
        inputs: HashMap<u8, InputPin>,
    }

    impl RppalPins {
        pub fn new() -> Result<Self, GpioError> {
            let gpio = Gpio::new().map_err(|e| GpioError::Unavailable(e.to_string()))?;
            Ok(Self {
                gpio,
                inputs: HashMap::new(),
            })
        }
    }

    impl PinReader for RppalPins {
        fn configure_as_input(&mut self, pin: u8) -> Result<(), GpioError> {
            let input = self
                .gpio
                .get(pin)
                .map_err(|e| GpioError::Pin { pin, message: e.to_string() })?
                .into_input();
            debug!("GPIO {} configured as input", pin);
            self.inputs.insert(pin, input);
            Ok(())
        }

        fn read_level(&mut self, pin: u8) -> Result<bool, GpioError> {
            self.inputs
                .get(&pin)
                .map(|input| input.is_high())
                .ok_or(GpioError::NotConfigured(pin))
        }
    }
}

/// Reads every configured pin at a fixed level, used when running emulated.
#[derive(Debug, Default)]
pub struct IdlePins {
    levels: HashMap<u8, bool>,
    idle_level: bool,
}

impl IdlePins {
    /// `idle_level` should be the released level for the wiring in use.
    pub fn new(idle_level: bool) -> Self {
        Self {
            levels: HashMap::new(),
            idle_level,
        }
    }
}

impl PinReader for IdlePins {
    fn configure_as_input(&mut self, pin: u8) -> Result<(), GpioError> {
        debug!("idle pin {} held at {}", pin, self.idle_level);
        self.levels.insert(pin, self.idle_level);
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> Result<bool, GpioError> {
        self.levels.get(&pin).copied().ok_or(GpioError::NotConfigured(pin))
    }
}
