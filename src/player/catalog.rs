use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::{Fetch, fetch_json};

/// Who wrote what. Data files use the single-letter keys `M`, `L` and `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credits {
    #[serde(rename = "M", alias = "music")]
    pub music: Option<String>,
    #[serde(rename = "L", alias = "lyrics")]
    pub lyrics: Option<String>,
    #[serde(rename = "T", alias = "text")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Free-text line shown under the title ("mit ... • 2025").
    pub details: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub src: String,
    pub cover: Option<String>,
    pub credits: Option<Credits>,
    /// Seconds; learned from the media element the first time the track plays.
    #[serde(skip)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Album {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub title: String,
    pub cover: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub tracks: Vec<Track>,
}

/// The music data document: an `albums` list, or a flat `tracks` list in older files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MusicData {
    Albums { albums: Vec<Album> },
    Tracks { tracks: Vec<Track> },
}

fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Load albums from `url`. Always returns at least one album: a missing,
/// unreadable or empty document yields the built-in default album.
pub async fn load_catalog<F: Fetch>(fetcher: &F, url: &str) -> Vec<Album> {
    match fetch_json::<F, MusicData>(fetcher, url).await {
        Ok(MusicData::Albums { albums }) if !albums.is_empty() => {
            debug!(url, albums = albums.len(), "loaded music data");
            return albums;
        }
        Ok(MusicData::Tracks { tracks }) if !tracks.is_empty() => {
            debug!(url, tracks = tracks.len(), "loaded flat track list");
            return vec![Album {
                id: Some("tracks".to_string()),
                tracks,
                ..default_album()
            }];
        }
        Ok(_) => warn!(url, "music data is empty; using the default album"),
        Err(e) => warn!(url, "music data unavailable ({e}); using the default album"),
    }
    vec![default_album()]
}

const DEFAULT_COVER: &str = "assets/img/ana_shoes.jpg";

/// The album shipped with the site, used when no data file can be read.
pub fn default_album() -> Album {
    let tracks = [
        ("Los Mareados", "mit Quique Sinesi (Gitarre)", 2025, "los_mareados.mp3"),
        ("Caserón de Tejas", "mit Quique Sinesi (Gitarre)", 2025, "caseron_de_tejas.mp3"),
        (
            "Negra Maria",
            "mit Pablo Woizinski (Piano) und César Nigro (Gitarre)",
            2006,
            "negra_maria.mp3",
        ),
        ("Nostalgias", "mit Quique Sinesi (Gitarre)", 2004, "nostalgias_live.mp3"),
        (
            "Che Bandoneón",
            "mit Fernando Maguna (Piano) und Diego Trosman (Gitarre)",
            2002,
            "che_bandoneon_live.mp3",
        ),
        (
            "Vamos Nina",
            "mit Corinna Söller (Klavier) und Katja Kulesza (Violine)",
            2002,
            "vamos_nina.mp3",
        ),
        (
            "Chiquilín de Bachín",
            "mit Gustavo Battistessa (Bandoneon) und Marcelo Iglesias (Piano)",
            1998,
            "chiquilín_de_bachin.mp3",
        ),
        ("El Choclo", "mit Coco Nelegatti (Gitarre)", 1998, "el_choclo.mp3"),
    ]
    .into_iter()
    .map(|(title, with, year, file)| Track {
        title: title.to_string(),
        artist: "Ana Fonell".to_string(),
        details: format!("{with} • {year}"),
        year: Some(year.to_string()),
        src: format!("assets/audio/{file}"),
        cover: Some(DEFAULT_COVER.to_string()),
        credits: None,
        duration: None,
    })
    .collect();

    Album {
        id: Some("default".to_string()),
        title: "Ana Fonell".to_string(),
        cover: Some(DEFAULT_COVER.to_string()),
        year: None,
        tracks,
    }
}
