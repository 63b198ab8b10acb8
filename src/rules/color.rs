//! Tab group color palette.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// GroupColor
// ============================================================================

/// One of the fixed colors a host tab group can carry.
///
/// The wire and storage representation is the lowercase color name, the
/// same vocabulary the host browser's tab-group API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    /// Grey.
    Grey,
    /// Blue.
    Blue,
    /// Red.
    Red,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Pink.
    Pink,
    /// Purple.
    Purple,
    /// Cyan.
    Cyan,
}

impl GroupColor {
    /// The full palette, in host order.
    pub const PALETTE: [Self; 8] = [
        Self::Grey,
        Self::Blue,
        Self::Red,
        Self::Yellow,
        Self::Green,
        Self::Pink,
        Self::Purple,
        Self::Cyan,
    ];

    /// Draws a color uniformly at random from the palette.
    ///
    /// Each call is an independent draw; the result is never written
    /// back to the rule that requested it.
    #[must_use]
    pub fn random() -> Self {
        let index = rand::thread_rng().gen_range(0..Self::PALETTE.len());
        Self::PALETTE[index]
    }

    /// Returns the lowercase wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
        }
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grey" => Ok(Self::Grey),
            "blue" => Ok(Self::Blue),
            "red" => Ok(Self::Red),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "pink" => Ok(Self::Pink),
            "purple" => Ok(Self::Purple),
            "cyan" => Ok(Self::Cyan),
            other => Err(Error::validation(format!("unknown group color: {other}"))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
