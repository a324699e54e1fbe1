//! API Routes module for the Movie Scraper API
//!
//! This module contains all HTTP route handlers for the public API endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::aggregator::collect_movie_records;
use crate::config::Config;
use crate::constants::endpoints;
use crate::error::{AppError, AppResult};
use crate::models::{ApiError, EpisodeLink, MovieRecord, PlaybackInfo};
use crate::parser::{absolutize, collect_detail_links, parse_playback_info};
use crate::scraper::Fetcher;

/// Timeout for fetching one listing page
const LISTING_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
}

/// Query parameters for the player endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PlayerQuery {
    /// URL of the playback page to resolve
    pub url: Option<String>,
}

/// GET /player - Resolve the stream URL pair from a playback page
///
/// Query parameter: url (required) - playback page URL
#[utoipa::path(
    get,
    path = "/player",
    tag = "movies",
    params(PlayerQuery),
    responses(
        (status = 200, description = "Playback info extracted successfully", body = PlaybackInfo),
        (status = 400, description = "Bad request - url parameter is required", body = ApiError),
        (status = 500, description = "Failed to extract playback information", body = ApiError)
    )
)]
pub async fn get_player(query: web::Query<PlayerQuery>) -> AppResult<HttpResponse> {
    let url = match &query.url {
        Some(u) if !u.trim().is_empty() => u.trim(),
        _ => return Err(AppError::validation("Missing URL parameter")),
    };

    info!("Resolving playback info for: {}", url);
    let fetcher = Fetcher::new();

    // Absent script block, malformed payload and network failure all
    // collapse to the same failure signal for the caller
    let html = fetcher
        .fetch_page(url)
        .await
        .map_err(|e| {
            error!("Failed to fetch playback page: {}", e);
            AppError::extraction("Failed to extract playback information.")
        })?;

    match parse_playback_info(&html) {
        Some(info) => Ok(HttpResponse::Ok().json(info)),
        None => Err(AppError::extraction(
            "Failed to extract playback information.",
        )),
    }
}

/// Query parameters for the movies listing endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MoviesQuery {
    /// Category within the channel (optional)
    pub category: Option<String>,
    /// Channel name, e.g. "movie" or "tv"
    pub channel: Option<String>,
    /// Listing page number
    pub page_num: Option<u32>,
}

/// GET /movies - List movies for a channel/category page
///
/// Fetches the listing page, collects the detail-page links and
/// aggregates the detail records concurrently, dropping failed fetches.
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    params(MoviesQuery),
    responses(
        (status = 200, description = "Movie records retrieved successfully", body = Vec<MovieRecord>),
        (status = 400, description = "Bad request - channel or page_num missing", body = ApiError),
        (status = 500, description = "Failed to fetch the listing page", body = ApiError)
    )
)]
pub async fn get_movies(
    data: web::Data<AppState>,
    query: web::Query<MoviesQuery>,
) -> AppResult<HttpResponse> {
    let (channel, page_num) = match (&query.channel, query.page_num) {
        (Some(channel), Some(page_num)) if !channel.trim().is_empty() => {
            (channel.trim(), page_num)
        }
        _ => {
            return Err(AppError::validation(
                "Missing page_num or channel parameter",
            ))
        }
    };
    let category = query.category.as_deref().unwrap_or("");

    let base_url = &data.config.base_url;
    let url = endpoints::listing(base_url, channel, category, page_num);
    info!("Fetching listing page: {}", url);

    let fetcher = Fetcher::new();
    let html = fetcher
        .fetch_page_timeout(&url, LISTING_FETCH_TIMEOUT)
        .await?;

    let links: std::collections::HashSet<String> = collect_detail_links(&html)
        .into_iter()
        .map(|href| absolutize(base_url, &href))
        .collect();
    info!("Collected {} detail links", links.len());

    let records = collect_movie_records(&fetcher, links, base_url).await;
    info!("Aggregated {} movie records", records.len());

    Ok(HttpResponse::Ok().json(records))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Scraper API",
        version = "0.1.0",
        description = "API for scraping and accessing movie data from huale.tv",
        license(
            name = "MIT"
        )
    ),
    paths(
        get_player,
        get_movies
    ),
    components(
        schemas(
            MovieRecord,
            EpisodeLink,
            PlaybackInfo,
            ApiError,
            PlayerQuery,
            MoviesQuery
        )
    ),
    tags(
        (name = "movies", description = "Movie catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/player", web::get().to(get_player))
        .route("/movies", web::get().to(get_movies));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(base_url: &str) -> web::Data<AppState> {
        web::Data::new(AppState {
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: base_url.to_string(),
            },
        })
    }

    #[actix_web::test]
    async fn test_player_missing_url_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(test_state("https://www.huale.tv"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/player").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_player_blank_url_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(test_state("https://www.huale.tv"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/player?url=%20%20")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_player_extracts_stream_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vod/1-1-1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                <script type="text/javascript">var player_aaaa={"url":"A","url_next":"B"}</script>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let app = test::init_service(
            App::new()
                .app_data(test_state(&server.uri()))
                .configure(configure_routes),
        )
        .await;

        let page_url = format!("{}/vod/1-1-1.html", server.uri());
        let req = test::TestRequest::get()
            .uri(&format!("/player?url={}", urlencoding::encode(&page_url)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let info: PlaybackInfo = test::read_body_json(resp).await;
        assert_eq!(info.url.as_deref(), Some("A"));
        assert_eq!(info.next_url.as_deref(), Some("B"));
    }

    #[actix_web::test]
    async fn test_player_without_script_block_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vod/2-1-1.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>no player</body></html>"),
            )
            .mount(&server)
            .await;

        let app = test::init_service(
            App::new()
                .app_data(test_state(&server.uri()))
                .configure(configure_routes),
        )
        .await;

        let page_url = format!("{}/vod/2-1-1.html", server.uri());
        let req = test::TestRequest::get()
            .uri(&format!("/player?url={}", urlencoding::encode(&page_url)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_movies_missing_channel_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(test_state("https://www.huale.tv"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/movies?page_num=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_movies_missing_page_num_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(test_state("https://www.huale.tv"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/movies?channel=movie")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_movies_aggregates_detail_pages() {
        let server = MockServer::start().await;

        // Unknown channel falls back to the default listing URL
        Mock::given(method("GET"))
            .and(path("/vodshow/1/by/hits/page/1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                <a class="public-list-exp" href="/voddetail/1.html">one</a>
                <a class="public-list-exp" href="/voddetail/2.html">two</a>
                <a class="public-list-exp" href="/voddetail/1.html">one again</a>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/voddetail/1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<h3 class="slide-info-title hide">First</h3>"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/voddetail/2.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<h3 class="slide-info-title hide">Second</h3>"#,
            ))
            .mount(&server)
            .await;

        let app = test::init_service(
            App::new()
                .app_data(test_state(&server.uri()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/movies?channel=unknown&page_num=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let records: Vec<MovieRecord> = test::read_body_json(resp).await;
        assert_eq!(records.len(), 2);
        let mut titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[actix_web::test]
    async fn test_movies_drops_failing_detail_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vodshow/1/by/hits/page/1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="public-list-exp" href="/voddetail/1.html">ok</a>
                <a class="public-list-exp" href="/voddetail/404.html">gone</a>"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/voddetail/1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<h3 class="slide-info-title hide">Survivor</h3>"#,
            ))
            .mount(&server)
            .await;

        // /voddetail/404.html is not mounted: wiremock answers 404,
        // which the aggregator drops silently

        let app = test::init_service(
            App::new()
                .app_data(test_state(&server.uri()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/movies?channel=unknown&page_num=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let records: Vec<MovieRecord> = test::read_body_json(resp).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Survivor");
    }

    #[actix_web::test]
    async fn test_movies_listing_fetch_failure_is_server_error() {
        let server = MockServer::start().await;
        // No mocks mounted: the listing fetch gets a 404

        let app = test::init_service(
            App::new()
                .app_data(test_state(&server.uri()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/movies?channel=unknown&page_num=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
