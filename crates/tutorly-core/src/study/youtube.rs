//! YouTube URL handling.
//!
//! Accepts the common link shapes (`youtu.be/<id>`, `/v/<id>`, `/u/x/<id>`,
//! `/embed/<id>`, `watch?v=<id>`, `...&v=<id>`). The id is everything up to
//! the next `#`, `&` or `?` and must be exactly 11 characters.

use std::sync::LazyLock;

use regex::Regex;

const VIDEO_ID_LEN: usize = 11;

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("static YouTube regex is valid")
});

/// Extract the 11-character video id from a YouTube URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    let caps = VIDEO_ID_RE.captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
}

/// Medium-quality thumbnail for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}
