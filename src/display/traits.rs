/*
 *  display/traits.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for character display abstraction
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

use crate::display::error::DisplayError;
use crate::glyphs::GlyphBitmap;

/// Display capabilities and metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCapabilities {
    /// Character rows
    pub rows: u8,

    /// Characters per row
    pub columns: u8,

    /// Number of user definable glyph slots (CGRAM)
    pub custom_glyphs: u8,
}

impl DisplayCapabilities {
    pub fn contains(&self, row: u8, col: u8) -> bool {
        row < self.rows && col < self.columns
    }
}

impl Default for DisplayCapabilities {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 16,
            custom_glyphs: 8,
        }
    }
}

/// Character display hardware abstraction
///
/// Everything the renderer needs from an HD44780 class panel: cursor
/// addressing, text, raw character codes and the custom glyph upload.
/// Writes are blocking; callers serialise access through a single owner.
pub trait DisplayDevice: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Initialize the display hardware
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank the panel and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor, zero based
    fn goto(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write text at the cursor
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Write one character code at the cursor
    ///
    /// Codes 0-7 select the custom glyphs, the rest index the character ROM.
    fn write_raw_byte(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Upload the custom glyph set into CGRAM
    fn load_custom_glyphs(&mut self, glyphs: &[GlyphBitmap; 8]) -> Result<(), DisplayError>;

    /// Called once a frame has been written
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

impl<T: DisplayDevice + ?Sized> DisplayDevice for Box<T> {
    fn capabilities(&self) -> &DisplayCapabilities {
        (**self).capabilities()
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        (**self).init()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn goto(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        (**self).goto(row, col)
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        (**self).print(text)
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        (**self).write_raw_byte(byte)
    }

    fn load_custom_glyphs(&mut self, glyphs: &[GlyphBitmap; 8]) -> Result<(), DisplayError> {
        (**self).load_custom_glyphs(glyphs)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush()
    }
}
