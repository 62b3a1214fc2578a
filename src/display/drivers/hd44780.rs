/*
 *  display/drivers/hd44780.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  HD44780 character LCD behind a PCF8574 I2C backpack
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

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use linux_embedded_hal::{Delay, I2cdev};
use log::info;

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDevice};
use crate::glyphs::GlyphBitmap;

// PCF8574 port bits
const RS: u8 = 0b0000_0001;
const EN: u8 = 0b0000_0100;
const BACKLIGHT: u8 = 0b0000_1000;

// Controller instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_HOME: u8 = 0x02;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;

const ENTRY_INCREMENT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_2_LINE: u8 = 0x08;

/// DDRAM start address of each row
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

pub const DEFAULT_ADDRESS: u8 = 0x27;

/// HD44780 display driver wrapper
///
/// Drives the controller in 4-bit mode. Each nibble goes out as the high
/// half of an expander write, latched by pulsing EN.
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: u8,
    capabilities: DisplayCapabilities,
}

impl Hd44780<I2cdev, Delay> {
    /// Create a new driver using a Linux I2C bus
    ///
    /// # Arguments
    ///
    /// * `i2c_bus_path` - Path to I2C device (e.g., "/dev/i2c-1")
    /// * `address` - I2C address of the backpack (typically 0x27 or 0x3F)
    /// * `capabilities` - Panel geometry
    pub fn new_i2c(
        i2c_bus_path: &str,
        address: u8,
        capabilities: DisplayCapabilities,
    ) -> Result<Self, DisplayError> {
        info!("Initializing HD44780 on {} at address 0x{:02X}", i2c_bus_path, address);
        if address > 0x7f {
            return Err(DisplayError::InvalidConfiguration(format!(
                "address 0x{:02X} is not a 7-bit I2C address", address
            )));
        }

        let i2c = I2cdev::new(i2c_bus_path)
            .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", i2c_bus_path, e)))?;

        Ok(Self::new(i2c, Delay, address, capabilities))
    }
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8, capabilities: DisplayCapabilities) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: BACKLIGHT,
            capabilities,
        }
    }

    #[cfg(test)]
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn expander_write(&mut self, data: u8) -> Result<(), DisplayError> {
        let byte = data | self.backlight;
        self.i2c
            .write(self.address, &[byte])
            .map_err(|e| DisplayError::I2cError(format!("{:?}", e)))
    }

    fn pulse_enable(&mut self, data: u8) -> Result<(), DisplayError> {
        self.expander_write(data | EN)?;
        self.delay.delay_us(1);
        self.expander_write(data & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        self.expander_write(nibble)?;
        self.pulse_enable(nibble)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble((value & 0xf0) | mode)?;
        self.write_nibble(((value << 4) & 0xf0) | mode)
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, 0)
    }

    fn data(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, RS)
    }
}

impl<I2C, D> DisplayDevice for Hd44780<I2C, D>
where
    I2C: I2c + Send,
    D: DelayNs + Send,
{
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let fail = |e: DisplayError| DisplayError::InitializationFailed(e.to_string());

        // power-on wait, then the 8-bit reset dance before dropping to 4-bit
        self.delay.delay_ms(50);
        self.expander_write(0).map_err(fail)?;
        self.delay.delay_ms(1);
        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x30).map_err(fail)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20).map_err(fail)?;

        let lines = if self.capabilities.rows > 1 { FUNCTION_2_LINE } else { 0 };
        self.command(CMD_FUNCTION_SET | lines).map_err(fail)?;
        self.command(CMD_DISPLAY_CONTROL | DISPLAY_ON).map_err(fail)?;
        self.clear().map_err(fail)?;
        self.command(CMD_ENTRY_MODE | ENTRY_INCREMENT).map_err(fail)?;
        self.command(CMD_HOME).map_err(fail)?;
        self.delay.delay_ms(2);

        info!(
            "HD44780 ready: {}x{}",
            self.capabilities.columns, self.capabilities.rows
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn goto(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        if !self.capabilities.contains(row, col) || row as usize >= ROW_OFFSETS.len() {
            return Err(DisplayError::InvalidPosition { row, col });
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        for byte in text.bytes() {
            self.data(byte)?;
        }
        Ok(())
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.data(byte)
    }

    fn load_custom_glyphs(&mut self, glyphs: &[GlyphBitmap; 8]) -> Result<(), DisplayError> {
        // CGRAM auto-increments across all eight slots
        self.command(CMD_SET_CGRAM)?;
        for row in glyphs.iter().flatten() {
            self.data(row & 0x1f)?;
        }
        self.goto(0, 0)
    }
}
