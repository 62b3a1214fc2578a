/*
 *  display/drivers/mock.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing without hardware
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
use crate::display::traits::{DisplayCapabilities, DisplayDevice};
use crate::glyphs::GlyphBitmap;

/// One recorded device call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Init,
    Clear,
    Goto(u8, u8),
    Print(String),
    WriteByte(u8),
    LoadGlyphs,
    Flush,
}

/// Mock display driver for testing
///
/// Records every successful call and keeps a character grid so tests can
/// check what would be on the glass. Out of range cursor moves fail the same
/// way the hardware driver does.
#[derive(Debug, Clone)]
pub struct MockDisplay {
    capabilities: DisplayCapabilities,
    calls: Vec<MockCall>,
    grid: Vec<Vec<u8>>,
    cursor: (usize, usize),
    glyphs: Option<[GlyphBitmap; 8]>,

    /// Simulate a bus failure on the next write
    pub fail_writes: bool,
}

impl MockDisplay {
    pub fn new(rows: u8, columns: u8) -> Self {
        Self {
            capabilities: DisplayCapabilities {
                rows,
                columns,
                custom_glyphs: 8,
            },
            calls: Vec::new(),
            grid: vec![vec![b' '; columns as usize]; rows as usize],
            cursor: (0, 0),
            glyphs: None,
            fail_writes: false,
        }
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn glyphs(&self) -> Option<&[GlyphBitmap; 8]> {
        self.glyphs.as_ref()
    }

    /// Raw character codes on `row`
    pub fn row_bytes(&self, row: usize) -> &[u8] {
        &self.grid[row]
    }

    /// `row` as text, character codes outside printable ASCII shown as `#`
    pub fn row_text(&self, row: usize) -> String {
        self.grid[row]
            .iter()
            .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { '#' })
            .collect()
    }

    fn check(&self) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::I2cError("simulated failure".to_string()));
        }
        Ok(())
    }

    fn put(&mut self, byte: u8) {
        let (row, col) = self.cursor;
        if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = byte;
        }
        self.cursor.1 += 1;
    }
}

impl DisplayDevice for MockDisplay {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.calls.push(MockCall::Init);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        for row in self.grid.iter_mut() {
            row.fill(b' ');
        }
        self.cursor = (0, 0);
        self.calls.push(MockCall::Clear);
        Ok(())
    }

    fn goto(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.check()?;
        if !self.capabilities.contains(row, col) {
            return Err(DisplayError::InvalidPosition { row, col });
        }
        self.cursor = (row as usize, col as usize);
        self.calls.push(MockCall::Goto(row, col));
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.check()?;
        for byte in text.bytes() {
            self.put(byte);
        }
        self.calls.push(MockCall::Print(text.to_string()));
        Ok(())
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.check()?;
        self.put(byte);
        self.calls.push(MockCall::WriteByte(byte));
        Ok(())
    }

    fn load_custom_glyphs(&mut self, glyphs: &[GlyphBitmap; 8]) -> Result<(), DisplayError> {
        self.check()?;
        self.glyphs = Some(*glyphs);
        self.calls.push(MockCall::LoadGlyphs);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.calls.push(MockCall::Flush);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_tracks_writes() {
        let mut display = MockDisplay::new(2, 16);
        display.goto(1, 2).unwrap();
        display.print("ab").unwrap();
        display.write_raw_byte(0xff).unwrap();
        assert_eq!(display.row_text(1), "  ab#           ");
        assert_eq!(display.row_bytes(1)[4], 0xff);
    }

    #[test]
    fn test_out_of_range_goto() {
        let mut display = MockDisplay::new(2, 16);
        assert!(display.goto(2, 0).is_err());
        assert!(display.goto(0, 16).is_err());
        assert!(display.calls().is_empty());
    }

    #[test]
    fn test_simulated_failure() {
        let mut display = MockDisplay::new(2, 16);
        display.fail_writes = true;
        assert!(matches!(display.print("x"), Err(DisplayError::I2cError(_))));
    }
}
