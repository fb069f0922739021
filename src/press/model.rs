use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PressSettings;
use crate::fetch::{Fetch, FetchError, fetch_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Review {
    pub title: String,
    pub publication: String,
    #[serde(deserialize_with = "year_text")]
    pub year: String,
    pub text_1: String,
    pub text_2: Option<String>,
}

impl Review {
    /// "publication · year"
    pub fn meta_line(&self) -> String {
        format!("{} · {}", self.publication, self.year)
    }

    /// Both text blocks separated by a blank line.
    pub fn body(&self) -> String {
        format!("{}\n\n{}", self.text_1, self.text_2.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct PressData {
    reviews: Vec<Review>,
}

fn year_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Data URL for `lang` from a `{lang}` path pattern.
pub fn press_url(settings: &PressSettings, lang: &str) -> String {
    settings.data_path.replace("{lang}", lang)
}

/// Load reviews for `lang`, then for the fallback language.
pub async fn load_reviews<F: Fetch>(
    fetcher: &F,
    settings: &PressSettings,
    lang: &str,
) -> Result<Vec<Review>, FetchError> {
    let url = press_url(settings, lang);
    let first = match fetch_json::<F, PressData>(fetcher, &url).await {
        Ok(data) => {
            debug!(%url, reviews = data.reviews.len(), "loaded press reviews");
            return Ok(data.reviews);
        }
        Err(e) => e,
    };
    warn!(%url, "press reviews unavailable ({first}); trying {}", settings.fallback_language);

    let fallback = press_url(settings, &settings.fallback_language);
    if fallback == url {
        return Err(first);
    }
    fetch_json::<F, PressData>(fetcher, &fallback)
        .await
        .map(|data| data.reviews)
}

/// "Review"/"Rezension"/"Reseña" by language, English otherwise.
pub fn page_label_base(lang: &str) -> &'static str {
    match lang {
        "de" => "Rezension",
        "es" => "Reseña",
        _ => "Review",
    }
}

/// First card index of each navigation page. At most `max_pages` pages; with
/// more cards than that, cards are spread as evenly as possible, earlier
/// pages taking the remainder.
pub fn page_starts(total: usize, max_pages: usize) -> Vec<usize> {
    let groups = max_pages.max(1);
    if total <= groups {
        return (0..total).collect();
    }
    let (base, extra) = (total / groups, total % groups);
    let mut starts = Vec::with_capacity(groups);
    let mut next = 0;
    for g in 0..groups {
        starts.push(next);
        next += base + usize::from(g < extra);
    }
    starts
}

/// Index of the offset nearest to `scroll_left`; ties go to the earlier page.
pub fn nearest_page(offsets: &[f64], scroll_left: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, off) in offsets.iter().enumerate() {
        let dist = (off - scroll_left).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
