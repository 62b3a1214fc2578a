/*
 *  display/mod.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Character display: device abstraction, frames and the now playing renderer
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

// Core trait definitions
pub mod traits;
pub mod error;

// Display drivers
pub mod drivers;

// Timed write lists and the renderer that builds them
pub mod frame;
pub mod renderer;

// Re-exports for convenience
pub use traits::{DisplayCapabilities, DisplayDevice};
pub use error::DisplayError;
pub use frame::play_frame;
pub use renderer::{RenderTiming, Renderer};
pub use drivers::console::ConsoleDisplay;
pub use drivers::hd44780::Hd44780;

/// Boxed driver chosen at startup
pub type BoxedDisplay = Box<dyn DisplayDevice>;
