//! Parser module for extracting structured data from HTML
//!
//! This module provides parsing functionality to extract movie data
//! from the HTML content fetched from huale.tv. Every field extraction
//! is independently optional: a missing pattern yields an empty string
//! or empty list, never an error.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

/// Represents one episode/version link from the anthology list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct EpisodeLink {
    /// Link text, e.g. an episode number or source name
    pub title: String,
    /// Absolute URL of the playback page
    pub href: String,
}

/// Represents full movie metadata from a detail page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MovieRecord {
    /// From h3.slide-info-title
    pub title: String,
    /// First span.slide-info-remarks link
    pub year: String,
    /// Second span.slide-info-remarks link
    pub area: String,
    /// Remaining span.slide-info-remarks links, in document order
    pub genres: Vec<String>,
    /// From the div.slide-info block labeled 备注
    pub remark: String,
    /// From the div.slide-info block labeled 更新
    pub update_date: String,
    /// From img.lazy1 data-src
    pub cover_url: String,
    /// From the last div.anthology-list-box container
    pub episodes: Vec<EpisodeLink>,
}

/// Playback stream URL pair extracted from the player script block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PlaybackInfo {
    /// Current stream URL
    pub url: Option<String>,
    /// Next episode stream URL
    pub next_url: Option<String>,
}

/// Shape of the embedded player object literal, as the site serves it
#[derive(Debug, Deserialize)]
struct PlayerPayload {
    url: Option<String>,
    url_next: Option<String>,
}

/// Rewrite a relative href to an absolute URL against the site origin
///
/// Absolute hrefs are passed through unchanged.
pub fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}

/// Collect detail-page links from a listing page
///
/// Extracts the href of every `a.public-list-exp` anchor, deduplicated
/// by exact string value.
///
/// # Arguments
/// * `html` - The HTML content to parse
///
/// # Returns
/// A set of raw hrefs. Empty set if no matches found.
pub fn collect_detail_links(html: &str) -> HashSet<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a.public-list-exp").unwrap();

    document
        .select(&link_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}

/// Parse movie metadata from a detail page HTML
///
/// Extracts the title from `h3.slide-info-title`, year/area/genres from
/// the successive `span.slide-info-remarks` links, the labeled
/// `div.slide-info` blocks, the `img.lazy1` cover, and the episode list
/// from the **last** `div.anthology-list-box` container. Relative
/// episode hrefs are rewritten to absolute against `base_url`.
///
/// # Arguments
/// * `html` - The HTML content to parse
/// * `base_url` - Site origin used to absolutize episode hrefs
///
/// # Returns
/// A `MovieRecord` with best-effort fields; missing patterns yield
/// empty fields.
pub fn parse_movie_detail(html: &str, base_url: &str) -> MovieRecord {
    let document = Html::parse_document(html);

    // Selectors for metadata
    let title_selector = Selector::parse("h3.slide-info-title").unwrap();
    let remarks_selector = Selector::parse("span.slide-info-remarks a").unwrap();
    let info_selector = Selector::parse("div.slide-info").unwrap();
    let cover_selector = Selector::parse("img.lazy1").unwrap();

    // Episode list selectors
    let anthology_selector = Selector::parse("div.anthology-list-box").unwrap();
    let episode_selector = Selector::parse("ul li a").unwrap();

    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    // Successive remarks links: index 0 is the year, index 1 the area,
    // the rest are genres in document order
    let remarks: Vec<String> = document
        .select(&remarks_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    let year = remarks.first().cloned().unwrap_or_default();
    let area = remarks.get(1).cloned().unwrap_or_default();
    let genres: Vec<String> = remarks.iter().skip(2).cloned().collect();

    // Labeled info blocks: value is the text after the label's colon
    let mut remark = String::new();
    let mut update_date = String::new();

    for info in document.select(&info_selector) {
        let text = info.text().collect::<String>();
        let trimmed = text.trim();

        let extract_value = |text: &str| -> String {
            text.split(':')
                .skip(1)
                .collect::<Vec<_>>()
                .join(":")
                .trim()
                .to_string()
        };

        if trimmed.starts_with("备注") {
            remark = extract_value(trimmed);
        } else if trimmed.starts_with("更新") {
            update_date = extract_value(trimmed);
        }
    }

    let cover_url = document
        .select(&cover_selector)
        .next()
        .and_then(|el| el.value().attr("data-src").or_else(|| el.value().attr("src")))
        .map(|s| s.to_string())
        .unwrap_or_default();

    // The detail page can carry several anthology containers (one per
    // playback source); the last one holds the authoritative list
    let mut episodes: Vec<EpisodeLink> = Vec::new();

    if let Some(anthology) = document.select(&anthology_selector).last() {
        for a in anthology.select(&episode_selector) {
            let ep_title = a.text().collect::<String>().trim().to_string();
            let href = a
                .value()
                .attr("href")
                .map(|href| absolutize(base_url, href))
                .unwrap_or_default();

            episodes.push(EpisodeLink {
                title: ep_title,
                href,
            });
        }
    }

    MovieRecord {
        title,
        year,
        area,
        genres,
        remark,
        update_date,
        cover_url,
        episodes,
    }
}

/// Parse the playback URL pair from a player page HTML
///
/// Searches the inline scripts for the `var player_aaaa={...}` assignment,
/// re-wraps the captured object body in braces and parses it as JSON.
///
/// # Arguments
/// * `html` - The HTML content to parse
///
/// # Returns
/// `Some(PlaybackInfo)` when the script block is present and parses;
/// `None` when the pattern is absent or the payload is malformed.
pub fn parse_playback_info(html: &str) -> Option<PlaybackInfo> {
    let document = Html::parse_document(html);
    let script_selector = Selector::parse("script").unwrap();
    let player_re = Regex::new(r"var player_aaaa\s*=\s*\{(.*?)\}").ok()?;

    for script in document.select(&script_selector) {
        let text: String = script.text().collect();
        if let Some(caps) = player_re.captures(&text) {
            let payload = format!("{{{}}}", &caps[1]);
            let parsed: PlayerPayload = serde_json::from_str(&payload).ok()?;
            return Some(PlaybackInfo {
                url: parsed.url,
                next_url: parsed.url_next,
            });
        }
    }

    None
}
