/*
 *  display/frame.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  A frame is the ordered, timed list of writes for one render tick
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

use std::time::Duration;

use crate::display::{DisplayDevice, DisplayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Goto { row: u8, col: u8 },
    Print(String),
    WriteByte(u8),
    Pause(Duration),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    ops: Vec<DisplayOp>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goto(&mut self, row: u8, col: u8) -> &mut Self {
        self.ops.push(DisplayOp::Goto { row, col });
        self
    }

    pub fn print(&mut self, text: impl Into<String>) -> &mut Self {
        self.ops.push(DisplayOp::Print(text.into()));
        self
    }

    pub fn write_byte(&mut self, byte: u8) -> &mut Self {
        self.ops.push(DisplayOp::WriteByte(byte));
        self
    }

    /// Zero length pauses are dropped.
    pub fn pause(&mut self, delay: Duration) -> &mut Self {
        if !delay.is_zero() {
            self.ops.push(DisplayOp::Pause(delay));
        }
        self
    }

    pub fn ops(&self) -> &[DisplayOp] {
        &self.ops
    }

    /// Sum of every pause in the frame.
    pub fn duration(&self) -> Duration {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Pause(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}

/// Write `frame` to the device in order, sleeping through its pauses.
///
/// Stops at the first failed write; the rest of the frame is dropped and
/// the next tick starts clean. The caller holds the device for the whole
/// frame so nothing can interleave with it. Device writes are short blocking
/// I/O (I2C transfers and controller settle delays) run on the calling task.
pub async fn play_frame<D>(display: &mut D, frame: &Frame) -> Result<(), DisplayError>
where
    D: DisplayDevice + ?Sized,
{
    for op in frame.ops() {
        match op {
            DisplayOp::Goto { row, col } => display.goto(*row, *col)?,
            DisplayOp::Print(text) => display.print(text)?,
            DisplayOp::WriteByte(byte) => display.write_raw_byte(*byte)?,
            DisplayOp::Pause(delay) => tokio::time::sleep(*delay).await,
        }
    }
    display.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::{MockCall, MockDisplay};
    use tokio::time::Instant;

    #[test]
    fn test_builder_and_duration() {
        let mut frame = Frame::new();
        frame
            .goto(1, 0)
            .print("ab")
            .pause(Duration::from_millis(30))
            .pause(Duration::ZERO)
            .write_byte(0xff)
            .pause(Duration::from_millis(30));
        assert_eq!(frame.ops().len(), 5);
        assert_eq!(frame.duration(), Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_frame_in_order_with_pauses() {
        let mut display = MockDisplay::new(2, 16);
        let mut frame = Frame::new();
        frame
            .goto(0, 0)
            .print("hi")
            .pause(Duration::from_millis(480))
            .write_byte(0xff);

        let start = Instant::now();
        play_frame(&mut display, &frame).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(480));

        assert_eq!(
            display.calls(),
            &[
                MockCall::Goto(0, 0),
                MockCall::Print("hi".to_string()),
                MockCall::WriteByte(0xff),
                MockCall::Flush,
            ]
        );
    }

    #[tokio::test]
    async fn test_play_frame_stops_on_error() {
        let mut display = MockDisplay::new(2, 16);
        let mut frame = Frame::new();
        frame.goto(5, 0).print("never");

        assert!(matches!(
            play_frame(&mut display, &frame).await,
            Err(DisplayError::InvalidPosition { row: 5, col: 0 })
        ));
        assert!(display.calls().is_empty());
    }
}
