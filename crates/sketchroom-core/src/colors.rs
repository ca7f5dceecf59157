//! Color assignment for sessions.
//!
//! Colors come from the external color service, keyed by `(room, nickname)`;
//! a deterministic pastel fallback guarantees a session is never left
//! without one.

use serde::Deserialize;
use thiserror::Error;

/// The fixed pastel palette used when the color service is unreachable.
pub const PASTEL_PALETTE: [&str; 15] = [
    "#FFB6C1", "#87CEEB", "#98FB98", "#DDA0DD", "#F0E68C",
    "#E6E6FA", "#D3D3D3", "#FFDAB9", "#90EE90", "#FFA07A",
    "#20B2AA", "#87CEFA", "#DDA0DD", "#98FB98", "#F0E68C",
];

/// Color-service request failures.
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("color request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ColorResponse {
    color: String,
}

/// Ask the color service for this `(room, nickname)` pair's color. The
/// service is idempotent: repeated calls return the same color for the
/// lifetime of the room's color table.
///
/// Blocking; call it off the event loop.
pub fn fetch_user_color(base_url: &str, room: &str, nickname: &str) -> Result<String, ColorError> {
    let url = format!(
        "{}/color/{}/{}",
        base_url.trim_end_matches('/'),
        room,
        nickname
    );
    let response = reqwest::blocking::get(&url)?.error_for_status()?;
    Ok(response.json::<ColorResponse>()?.color)
}

/// Deterministic palette pick from a nickname's character codes.
pub fn fallback_color(nickname: &str) -> &'static str {
    let hash: u32 = nickname.chars().map(|c| c as u32).sum();
    PASTEL_PALETTE[hash as usize % PASTEL_PALETTE.len()]
}

/// Fetch from the service, falling back to the palette on any failure.
/// Never fails: a session always ends up with a color.
pub fn user_color(base_url: &str, room: &str, nickname: &str) -> String {
    match fetch_user_color(base_url, room, nickname) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("color service unavailable, using fallback: {}", e);
            fallback_color(nickname).to_string()
        }
    }
}
