//! Per-kind toast styling: accent colour, glyph and label.

use std::fmt::{self, Display};

use crate::types::NotificationKind;

/// 24-bit colour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

mod colors {
    use super::Rgb;

    pub const GREEN: Rgb = Rgb(34, 197, 94);
    pub const RED: Rgb = Rgb(239, 68, 68);
    pub const AMBER: Rgb = Rgb(245, 158, 11);
    pub const BLUE: Rgb = Rgb(59, 130, 246);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ToastStyle {
    pub accent: Rgb,
    pub glyph: char,
    pub label: &'static str,
}

impl ToastStyle {
    #[must_use]
    pub const fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Success => Self {
                accent: colors::GREEN,
                glyph: '✓',
                label: "SUCCESS",
            },
            NotificationKind::Error => Self {
                accent: colors::RED,
                glyph: '✕',
                label: "ERROR",
            },
            NotificationKind::Warning => Self {
                accent: colors::AMBER,
                glyph: '!',
                label: "WARNING",
            },
            NotificationKind::Info => Self {
                accent: colors::BLUE,
                glyph: 'i',
                label: "INFO",
            },
        }
    }

    /// ANSI truecolor foreground escape for the accent.
    #[must_use]
    pub fn ansi_fg(&self) -> String {
        let Rgb(r, g, b) = self.accent;
        format!("\x1b[38;2;{r};{g};{b}m")
    }
}
