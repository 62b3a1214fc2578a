/*
 *  display/drivers/console.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Emulated character display that logs its contents
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

use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDevice};
use crate::glyphs::{GlyphBitmap, FULL_BLOCK, GLYPH_PAUSE, GLYPH_PLAY, STATUS_BACKGROUND};

/// Stand-in for the panel when running without hardware.
///
/// Keeps a character grid and logs each row on flush, with the custom and
/// block glyphs drawn as close ASCII.
pub struct ConsoleDisplay {
    capabilities: DisplayCapabilities,
    grid: Vec<Vec<u8>>,
    cursor: (usize, usize),
    last_logged: Vec<String>,
}

impl ConsoleDisplay {
    pub fn new(capabilities: DisplayCapabilities) -> Self {
        Self {
            grid: vec![vec![b' '; capabilities.columns as usize]; capabilities.rows as usize],
            capabilities,
            cursor: (0, 0),
            last_logged: Vec::new(),
        }
    }

    /// Current panel rows as printable text
    pub fn rows(&self) -> Vec<String> {
        self.grid.iter().map(|row| row.iter().map(|&b| as_ascii(b)).collect()).collect()
    }

    fn put(&mut self, byte: u8) {
        let (row, col) = self.cursor;
        if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = byte;
        }
        self.cursor.1 += 1;
    }
}

fn as_ascii(code: u8) -> char {
    match code {
        GLYPH_PLAY => '>',
        GLYPH_PAUSE => '=',
        FULL_BLOCK => '#',
        STATUS_BACKGROUND => '|',
        0x20..=0x7e => code as char,
        _ => '?',
    }
}

impl DisplayDevice for ConsoleDisplay {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        info!(
            "Emulated {}x{} character display",
            self.capabilities.columns, self.capabilities.rows
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in self.grid.iter_mut() {
            row.fill(b' ');
        }
        self.cursor = (0, 0);
        Ok(())
    }

    fn goto(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        if !self.capabilities.contains(row, col) {
            return Err(DisplayError::InvalidPosition { row, col });
        }
        self.cursor = (row as usize, col as usize);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        text.bytes().for_each(|b| self.put(b));
        Ok(())
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.put(byte);
        Ok(())
    }

    fn load_custom_glyphs(&mut self, glyphs: &[GlyphBitmap; 8]) -> Result<(), DisplayError> {
        debug!("emulated CGRAM loaded with {} glyphs", glyphs.len());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let rows = self.rows();
        if rows != self.last_logged {
            for row in rows.iter() {
                info!("[{}]", row);
            }
            self.last_logged = rows;
        }
        Ok(())
    }
}
