/*
 *  display/error.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the character display
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
use std::error::Error;

/// Unified error type for all display operations
#[derive(Debug)]
pub enum DisplayError {
    /// Hardware initialization failed
    InitializationFailed(String),

    /// I2C communication error
    I2cError(String),

    /// Cursor moved outside the panel
    InvalidPosition { row: u8, col: u8 },

    /// Invalid configuration
    InvalidConfiguration(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::I2cError(msg) =>
                write!(f, "I2C communication error: {}", msg),
            DisplayError::InvalidPosition { row, col } =>
                write!(f, "Cursor position out of range: row {}, column {}", row, col),
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for DisplayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DisplayError::InvalidPosition { row: 2, col: 17 };
        assert_eq!(err.to_string(), "Cursor position out of range: row 2, column 17");

        let err = DisplayError::I2cError("nack".to_string());
        assert!(err.to_string().starts_with("I2C communication error"));
    }
}
