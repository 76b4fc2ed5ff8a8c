//! Text primitives shared by the picker crates.
//!
//! Everything here works on plain `&str` slices and byte offsets; screen
//! columns are always derived through [`grapheme::screen_len`] so that wide
//! and combining characters line up with what the terminal actually draws.

pub mod grapheme;
