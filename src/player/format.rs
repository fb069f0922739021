use super::catalog::Credits;

/// `m:ss`; unknown, infinite or negative durations render as `0:00`.
pub fn fmt_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// "Music: X / Lyrics: Y / Text: Z", skipping roles that are not credited.
pub fn format_credits(credits: Option<&Credits>) -> String {
    let Some(c) = credits else {
        return String::new();
    };
    [("Music", &c.music), ("Lyrics", &c.lyrics), ("Text", &c.text)]
        .into_iter()
        .filter_map(|(label, name)| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| format!("{label}: {n}"))
        })
        .collect::<Vec<_>>()
        .join(" / ")
}
