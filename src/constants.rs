//! Constants module for the Movie Scraper API
//!
//! Contains the static channel/category lookup table and listing URL builders
//! that use the base URL from configuration.

/// Static channel/category table mapping to listing path fragments.
///
/// Each path fragment ends just before the page number, so a listing URL is
/// built as `{base_url}{path}{page}.html`.
pub const CHANNELS: &[(&str, &[(&str, &str)])] = &[
    (
        "movie",
        &[
            ("action", "/vodshow/6/by/hits/page/"),
            ("comedy", "/vodshow/7/by/hits/page/"),
            ("romance", "/vodshow/8/by/hits/page/"),
            ("scifi", "/vodshow/9/by/hits/page/"),
            ("horror", "/vodshow/10/by/hits/page/"),
            ("drama", "/vodshow/11/by/hits/page/"),
            ("war", "/vodshow/12/by/hits/page/"),
        ],
    ),
    (
        "tv",
        &[
            ("mainland", "/vodshow/13/by/hits/page/"),
            ("hongkong", "/vodshow/14/by/hits/page/"),
            ("korean", "/vodshow/15/by/hits/page/"),
            ("western", "/vodshow/16/by/hits/page/"),
        ],
    ),
    (
        "variety",
        &[
            ("mainland", "/vodshow/25/by/hits/page/"),
            ("overseas", "/vodshow/26/by/hits/page/"),
        ],
    ),
    (
        "anime",
        &[
            ("china", "/vodshow/29/by/hits/page/"),
            ("japan", "/vodshow/30/by/hits/page/"),
        ],
    ),
];

/// URL builder functions for all endpoints
pub mod endpoints {
    use super::CHANNELS;

    /// Default listing URL: all movies ordered by popularity
    pub fn default_listing(base_url: &str, page: u32) -> String {
        format!("{}/vodshow/1/by/hits/page/{}.html", base_url, page)
    }

    /// Listing URL for a channel/category pair
    ///
    /// Unknown channels or categories fall back to the default listing.
    pub fn listing(base_url: &str, channel: &str, category: &str, page: u32) -> String {
        let path = CHANNELS
            .iter()
            .find(|(name, _)| *name == channel)
            .and_then(|(_, categories)| {
                categories
                    .iter()
                    .find(|(name, _)| *name == category)
                    .map(|(_, path)| *path)
            });

        match path {
            Some(path) => format!("{}{}{}.html", base_url, path, page),
            None => default_listing(base_url, page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::endpoints;

    #[test]
    fn test_default_listing_url() {
        let url = endpoints::default_listing("https://www.huale.tv", 3);
        assert_eq!(url, "https://www.huale.tv/vodshow/1/by/hits/page/3.html");
    }

    #[test]
    fn test_listing_url_known_channel_category() {
        let url = endpoints::listing("https://www.huale.tv", "movie", "action", 2);
        assert_eq!(url, "https://www.huale.tv/vodshow/6/by/hits/page/2.html");
    }

    #[test]
    fn test_listing_url_unknown_channel_falls_back() {
        let url = endpoints::listing("https://www.huale.tv", "sports", "action", 1);
        assert_eq!(url, "https://www.huale.tv/vodshow/1/by/hits/page/1.html");
    }

    #[test]
    fn test_listing_url_unknown_category_falls_back() {
        let url = endpoints::listing("https://www.huale.tv", "movie", "musical", 5);
        assert_eq!(url, "https://www.huale.tv/vodshow/1/by/hits/page/5.html");
    }
}
