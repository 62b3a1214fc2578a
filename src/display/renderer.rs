/*
 *  display/renderer.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Now playing renderer: title marquee, progress bar and play state glyph
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

//! Screen layout on a 2x16 panel:
//!
//! ```text
//!  col 0            13 14 15
//!  row 0 [title window  ][| >]
//!  row 1 [progress bar  ]
//! ```
//!
//! Title and bar share a 14 column window. Columns 14 and 15 of the top row
//! carry the status background and the play/pause glyph.

use std::time::Duration;

use crate::display::frame::Frame;
use crate::glyphs::{status_glyph, FULL_BLOCK, STATUS_BACKGROUND};
use crate::player::{PlaybackSnapshot, PlayerStatus};

pub const TITLE_WIDTH: usize = 14;
pub const STATUS_COLUMN: u8 = 14;
/// One block per six percent, so a finished track draws 16.
pub const PERCENT_PER_BLOCK: u32 = 6;
/// Columns a full bar reaches, wider than the timed wipe.
pub const BAR_WIDTH: usize = (100 / PERCENT_PER_BLOCK) as usize;

pub const FALLBACK_TOP: &str = "Cannot connect, ";
pub const FALLBACK_BOTTOM: &str = "Try play a song.";

/// Animation delays inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTiming {
    /// Between each character of the playing wipe
    pub wipe: Duration,
    /// Hold after clearing and after drawing the paused bar
    pub settle: Duration,
}

impl Default for RenderTiming {
    fn default() -> Self {
        Self {
            wipe: Duration::from_millis(30),
            settle: Duration::from_millis(480),
        }
    }
}

/// Marquee offset into the title, lives as long as the display session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollCursor {
    offset: usize,
}

impl ScrollCursor {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Window of `text` at the cursor, right padded to `width`, then step.
    ///
    /// The cursor returns to zero once `offset >= len - (width - 1)`. That
    /// bound goes negative for text shorter than the window, so short text
    /// wraps on every call and always shows from column zero. Long text
    /// cycles through `len - width + 1` windows.
    pub fn next_window(&mut self, text: &str, width: usize) -> String {
        // a shorter title may arrive with the cursor still deep in the last one
        self.wrap(text.len(), width);
        let window = format!("{:<width$}", substring(text, self.offset, width), width = width);
        self.offset += 1;
        self.wrap(text.len(), width);
        window
    }

    fn wrap(&mut self, len: usize, width: usize) {
        let limit = len as i64 - (width as i64 - 1);
        if self.offset as i64 >= limit {
            self.offset = 0;
        }
    }
}

fn substring(text: &str, from: usize, length: usize) -> &str {
    if from > text.len() {
        return "";
    }
    let to = (from + length).min(text.len());
    &text[from..to]
}

/// Printable ASCII only, anything else becomes `?`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Whole percent played, `None` when the ratio cannot be computed.
pub fn progress_percent(snapshot: &PlaybackSnapshot) -> Option<u32> {
    let ratio = snapshot.progress_ratio()?;
    Some((ratio * 100.0).floor().clamp(0.0, 100.0) as u32)
}

/// Blocks drawn for a percentage, 0..=16.
pub fn bar_length(percent: u32) -> usize {
    (percent.min(100) / PERCENT_PER_BLOCK) as usize
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    cursor: ScrollCursor,
    timing: RenderTiming,
}

impl Renderer {
    pub fn new(timing: RenderTiming) -> Self {
        Self {
            cursor: ScrollCursor::default(),
            timing,
        }
    }

    pub fn cursor(&self) -> ScrollCursor {
        self.cursor
    }

    /// Build one tick's worth of writes for `status`.
    ///
    /// Anything without a usable duration shows the fallback text and leaves
    /// the scroll cursor where it was.
    pub fn render(&mut self, status: &PlayerStatus) -> Frame {
        match status.snapshot() {
            Some(snapshot) => match progress_percent(snapshot) {
                Some(percent) => self.render_track(snapshot, percent),
                None => fallback_frame(),
            },
            None => fallback_frame(),
        }
    }

    fn render_track(&mut self, snapshot: &PlaybackSnapshot, percent: u32) -> Frame {
        let mut frame = Frame::new();
        let title = self.cursor.next_window(&sanitize_title(&snapshot.track_name), TITLE_WIDTH);
        frame.goto(0, 0).print(title);

        self.progress_bar(&mut frame, bar_length(percent), snapshot.is_playing);

        frame
            .goto(0, STATUS_COLUMN)
            .write_byte(STATUS_BACKGROUND)
            .write_byte(status_glyph(snapshot.is_playing));
        frame
    }

    // Same writes either way. Playing spaces every character out so the
    // row wipes and refills; paused draws at once and holds. The wipe covers
    // the title width only, the last blocks of a full bar are blanked at once.
    fn progress_bar(&self, frame: &mut Frame, blocks: usize, playing: bool) {
        let tail = " ".repeat(BAR_WIDTH - TITLE_WIDTH);
        frame.goto(1, 0);
        if playing {
            for _ in 0..TITLE_WIDTH {
                frame.print(" ").pause(self.timing.wipe);
            }
            frame.print(tail);
        } else {
            frame
                .print(" ".repeat(TITLE_WIDTH))
                .print(tail)
                .pause(self.timing.settle);
        }

        frame.goto(1, 0);
        for _ in 0..blocks {
            frame.write_byte(FULL_BLOCK);
            if playing {
                frame.pause(self.timing.wipe);
            }
        }
        if !playing {
            frame.pause(self.timing.settle);
        }
    }
}

/// Two line message for a player that could not be read.
pub fn fallback_frame() -> Frame {
    let mut frame = Frame::new();
    frame.goto(0, 0).print(FALLBACK_TOP).goto(1, 0).print(FALLBACK_BOTTOM);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::frame::DisplayOp;
    use crate::glyphs::{GLYPH_PAUSE, GLYPH_PLAY};

    fn track(is_playing: bool, progress_ms: f64, duration_ms: f64, name: &str) -> PlayerStatus {
        PlayerStatus::Active(PlaybackSnapshot::new(is_playing, progress_ms, duration_ms, name))
    }

    fn title_of(frame: &Frame) -> String {
        match &frame.ops()[1] {
            DisplayOp::Print(text) => text.clone(),
            other => panic!("expected title print, got {:?}", other),
        }
    }

    fn blocks_in(frame: &Frame) -> usize {
        frame.ops().iter().filter(|op| **op == DisplayOp::WriteByte(FULL_BLOCK)).count()
    }

    fn pauses_of(frame: &Frame, delay: Duration) -> usize {
        frame.ops().iter().filter(|op| **op == DisplayOp::Pause(delay)).count()
    }

    #[test]
    fn test_short_title_is_padded_and_never_scrolls() {
        let mut renderer = Renderer::default();
        let status = track(true, 0.0, 1000.0, "Fortunate Son");
        for _ in 0..5 {
            let frame = renderer.render(&status);
            assert_eq!(title_of(&frame), "Fortunate Son ");
            assert_eq!(renderer.cursor().offset(), 0);
        }
    }

    #[test]
    fn test_long_title_cycles() {
        let name = "Have You Ever Seen The Rain";
        let period = name.len() - 13;
        let mut renderer = Renderer::default();
        let status = track(true, 0.0, 1000.0, name);

        let windows: Vec<String> = (0..period * 2).map(|_| title_of(&renderer.render(&status))).collect();
        for (k, window) in windows.iter().enumerate() {
            let at = k % period;
            assert_eq!(window, &name[at..at + 14]);
            assert_eq!(window.len(), 14);
        }
        assert_eq!(windows[0], windows[period]);
    }

    #[test]
    fn test_fourteen_char_title_holds_still() {
        let name = "Green River 14";
        assert_eq!(name.len(), 14);
        let mut renderer = Renderer::default();
        let status = track(true, 0.0, 1000.0, name);
        for _ in 0..3 {
            assert_eq!(title_of(&renderer.render(&status)), name);
        }
    }

    #[test]
    fn test_stale_cursor_wraps_on_new_title() {
        let mut renderer = Renderer::default();
        let long = track(true, 0.0, 1000.0, "Run Through The Jungle Again");
        for _ in 0..10 {
            renderer.render(&long);
        }
        assert_eq!(renderer.cursor().offset(), 10);

        let short = track(true, 0.0, 1000.0, "Lodi");
        assert_eq!(title_of(&renderer.render(&short)), "Lodi          ");
    }

    #[test]
    fn test_non_ascii_title_is_masked() {
        assert_eq!(sanitize_title("Beyoncé\tX"), "Beyonc??X");
        let mut renderer = Renderer::default();
        let frame = renderer.render(&track(true, 0.0, 1.0, "Motörhead"));
        assert_eq!(title_of(&frame), "Mot?rhead     ");
    }

    #[test]
    fn test_bar_length_monotonic_and_bounded() {
        let duration = 237_000.0;
        let mut last = 0;
        let mut progress = 0.0;
        while progress <= duration {
            let snapshot = PlaybackSnapshot::new(true, progress, duration, "x");
            let blocks = bar_length(progress_percent(&snapshot).unwrap());
            assert!(blocks >= last);
            assert!(blocks <= 16);
            last = blocks;
            progress += 499.0;
        }
        let done = PlaybackSnapshot::new(true, duration, duration, "x");
        assert_eq!(bar_length(progress_percent(&done).unwrap()), 16);
    }

    #[test]
    fn test_overrun_progress_is_clamped() {
        let snapshot = PlaybackSnapshot::new(true, 2500.0, 2000.0, "x");
        assert_eq!(progress_percent(&snapshot), Some(100));
        let snapshot = PlaybackSnapshot::new(true, -5.0, 2000.0, "x");
        assert_eq!(progress_percent(&snapshot), Some(0));
    }

    #[test]
    fn test_playing_scenario() {
        let mut renderer = Renderer::default();
        let status = track(true, 30000.0, 200000.0, "Fortunate Son");
        let snapshot = status.snapshot().unwrap();
        assert_eq!(progress_percent(snapshot), Some(15));
        assert_eq!(bar_length(15), 2);

        let frame = renderer.render(&status);
        let timing = RenderTiming::default();
        assert_eq!(title_of(&frame), "Fortunate Son ");
        assert_eq!(blocks_in(&frame), 2);
        assert_eq!(pauses_of(&frame, timing.wipe), TITLE_WIDTH + 2);
        assert_eq!(pauses_of(&frame, timing.settle), 0);

        let tail = &frame.ops()[frame.ops().len() - 3..];
        assert_eq!(
            tail,
            &[
                DisplayOp::Goto { row: 0, col: STATUS_COLUMN },
                DisplayOp::WriteByte(STATUS_BACKGROUND),
                DisplayOp::WriteByte(GLYPH_PLAY),
            ]
        );
    }

    #[test]
    fn test_clear_reaches_full_bar() {
        assert_eq!(bar_length(100), BAR_WIDTH);
        for playing in [true, false] {
            let mut renderer = Renderer::default();
            let frame = renderer.render(&track(playing, 0.0, 200_000.0, "Fortunate Son"));
            let blanks: usize = frame
                .ops()
                .iter()
                .filter_map(|op| match op {
                    DisplayOp::Print(text) if text.trim().is_empty() => Some(text.len()),
                    _ => None,
                })
                .sum();
            assert_eq!(blanks, BAR_WIDTH);
        }
    }

    #[test]
    fn test_paused_bar_is_static() {
        let mut renderer = Renderer::default();
        let frame = renderer.render(&track(false, 100_000.0, 200_000.0, "Fortunate Son"));
        let timing = RenderTiming::default();

        assert_eq!(pauses_of(&frame, timing.settle), 2);
        assert_eq!(pauses_of(&frame, timing.wipe), 0);
        assert_eq!(blocks_in(&frame), 8);
        assert!(frame.ops().contains(&DisplayOp::Print(" ".repeat(TITLE_WIDTH))));
        assert_eq!(frame.ops().last(), Some(&DisplayOp::WriteByte(GLYPH_PAUSE)));
        assert_eq!(frame.duration(), timing.settle * 2);
    }

    #[test]
    fn test_disconnected_shows_fallback_and_keeps_cursor() {
        let mut renderer = Renderer::default();
        let long = track(true, 0.0, 1000.0, "Bad Moon Rising Again And Again");
        renderer.render(&long);
        renderer.render(&long);
        let before = renderer.cursor();

        for _ in 0..3 {
            let frame = renderer.render(&PlayerStatus::Disconnected);
            assert_eq!(frame, fallback_frame());
            assert_eq!(renderer.cursor(), before);
        }
        assert_eq!(
            fallback_frame().ops(),
            &[
                DisplayOp::Goto { row: 0, col: 0 },
                DisplayOp::Print("Cannot connect, ".to_string()),
                DisplayOp::Goto { row: 1, col: 0 },
                DisplayOp::Print("Try play a song.".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_duration_shows_fallback() {
        let mut renderer = Renderer::default();
        let frame = renderer.render(&track(true, 1234.0, 0.0, "Suzie Q"));
        assert_eq!(frame, fallback_frame());
        assert_eq!(renderer.cursor().offset(), 0);
    }
}
