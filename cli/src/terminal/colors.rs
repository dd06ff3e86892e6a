//! Palette shared by every terminal printer.

use colored::Color;

pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 192, g: 192, b: 192 };
pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const ACCENT: Color = Color::Yellow;

pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV6_ADDR: Color = Color::Blue;
pub const MAC_ADDR: Color = Color::Magenta;
pub const HOSTNAME: Color = Color::BrightCyan;
pub const CATEGORY: Color = Color::BrightYellow;
pub const MISSING: Color = Color::BrightBlack;
