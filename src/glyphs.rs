/*
 *  glyphs.rs
 *
 *  spotlcd - now playing, one line at a time
 *	(c) 2020-25 Stuart Hunter
 *
 *	Custom 5x8 character glyphs and character codes
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use log::debug;

use crate::display::{DisplayDevice, DisplayError};

/// Eight rows, low five bits of each row are pixels.
pub type GlyphBitmap = [u8; 8];

// CGRAM slots, written as character codes 0-7
pub const GLYPH_PLAY: u8 = 0;
pub const GLYPH_PAUSE: u8 = 1;

/// ROM code for a solid 5x8 block
pub const FULL_BLOCK: u8 = 0b1111_1111;
/// ROM code drawn ahead of the play/pause glyph
pub const STATUS_BACKGROUND: u8 = 0b0111_1100;

// https://www.quinapalus.com/hd44780udg.html
pub const GLYPHS: [GlyphBitmap; 8] = [
    [0x08, 0x0c, 0x0e, 0x0f, 0x0e, 0x0c, 0x08, 0x00], // play
    [0x00, 0x0a, 0x0a, 0x0a, 0x0a, 0x0a, 0x00, 0x00], // pause
    [0x00, 0x00, 0x0a, 0x0a, 0x0a, 0x0a, 0x00, 0x00], // pause, short
    [0x0e, 0x1b, 0x11, 0x11, 0x11, 0x1f, 0x1f, 0x00], // fill 1/5
    [0x0e, 0x1b, 0x11, 0x11, 0x1f, 0x1f, 0x1f, 0x00],
    [0x0e, 0x1b, 0x11, 0x1f, 0x1f, 0x1f, 0x1f, 0x00],
    [0x0e, 0x1b, 0x1f, 0x1f, 0x1f, 0x1f, 0x1f, 0x00],
    [0x0e, 0x1f, 0x1f, 0x1f, 0x1f, 0x1f, 0x1f, 0x00], // fill 5/5
];

/// Status glyph for the play state.
pub fn status_glyph(is_playing: bool) -> u8 {
    if is_playing { GLYPH_PLAY } else { GLYPH_PAUSE }
}

/// Upload the glyph table, done once before any frame is drawn.
pub fn load_glyphs<D: DisplayDevice + ?Sized>(display: &mut D) -> Result<(), DisplayError> {
    let slots = display.capabilities().custom_glyphs as usize;
    if slots < GLYPHS.len() {
        return Err(DisplayError::InvalidConfiguration(format!(
            "display has {} glyph slots, {} needed", slots, GLYPHS.len()
        )));
    }
    debug!("loading {} custom glyphs", GLYPHS.len());
    display.load_custom_glyphs(&GLYPHS)
}
