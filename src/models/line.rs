//! Train line colors.

use std::fmt;

/// A CTA "L" line, identified by color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Blue,
    Green,
    Red,
}

impl Line {
    /// Stable uppercase name used in event payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Line::Blue => "BLUE",
            Line::Green => "GREEN",
            Line::Red => "RED",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
