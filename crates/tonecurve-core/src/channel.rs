//! The four independently edited tone curves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ToneCurveError;

/// Straight RGBA8 color as handed to the renderer.
pub type Rgba8 = [u8; 4];

/// Alpha used when a channel is drawn as a reference behind the active one.
pub const REFERENCE_ALPHA: u8 = 0x80;

/// Fill of the selection dot on the combined channel.
pub const SELECTED_POINT_COLOR: Rgba8 = [0xFF, 0x26, 0x45, 0xFF];

/// Channel selector. The numeric mapping is part of the host contract:
/// 0 = Combined, 1 = Red, 2 = Green, 3 = Blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Channel {
    /// Master curve applied to all three components.
    #[default]
    Combined,
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in index order.
    pub const ALL: [Channel; 4] = [Self::Combined, Self::Red, Self::Green, Self::Blue];

    /// Position in per-channel arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Combined => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 3,
        }
    }

    /// Human-readable label for tabs and log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Combined => "RGB",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }

    /// Stroke color of this channel's curve when it is the active one.
    pub const fn color(self) -> Rgba8 {
        match self {
            Self::Combined => [0xFF, 0xFF, 0xFF, 0xFF],
            Self::Red => [0xFF, 0x39, 0x38, 0xFF],
            Self::Green => [0x67, 0xE3, 0x32, 0xFF],
            Self::Blue => [0x37, 0x81, 0xFC, 0xFF],
        }
    }

    /// Translucent stroke used while another channel is being edited.
    pub const fn reference_color(self) -> Rgba8 {
        let [r, g, b, _] = self.color();
        [r, g, b, REFERENCE_ALPHA]
    }
}

impl TryFrom<u8> for Channel {
    type Error = ToneCurveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(ToneCurveError::InvalidChannel(value))
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel.index() as u8
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
