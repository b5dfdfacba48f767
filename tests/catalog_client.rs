use reelfetch::catalog::retry::RetryPolicy;
use reelfetch::catalog::{CatalogClient, CatalogError};
use reelfetch::export::{exporter_for, ExportConfig, ExportData, ExportFormat};
use reelfetch::models::{ContentKind, MediaType, SearchKind};
use reqwest::StatusCode;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";
const IMAGE_BASE: &str = "https://img.test/t/p";

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(API_KEY)
        .unwrap()
        .with_base_url(&server.uri())
        .with_image_base_url(IMAGE_BASE)
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        rate_limit_base_delay: Duration::from_millis(20),
        network_retry_delay: Duration::from_millis(20),
    }
}

fn movie_body() -> serde_json::Value {
    json!({
        "id": 27205,
        "title": "Inception",
        "original_title": "Inception",
        "original_language": "en",
        "overview": "A thief who steals corporate secrets.",
        "release_date": "2010-07-15",
        "runtime": 148,
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
        "vote_average": 8.4,
        "vote_count": 35000,
        "popularity": 83.5,
        "poster_path": "/poster.jpg",
        "backdrop_path": null,
        "tagline": "Your mind is the scene of the crime.",
        "budget": 160000000,
        "revenue": 0,
        "status": "Released",
        "imdb_id": "tt1375666",
        "production_companies": [
            {"id": 923, "name": "Legendary Pictures", "logo_path": "/legendary.png", "origin_country": "US"}
        ],
        "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
        "spoken_languages": [{"english_name": "English", "name": "English"}],
        "credits": {
            "cast": [
                {"id": 6193, "name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": "/leo.jpg", "order": 0},
                {"id": 24045, "name": "Joseph Gordon-Levitt", "character": null, "order": 1}
            ],
            "crew": [
                {"id": 525, "name": "Christopher Nolan", "job": "Director", "department": "Directing"},
                {"id": 1, "name": "Someone", "job": "Gaffer", "department": "Lighting"}
            ]
        },
        "videos": {"results": [
            {"id": "v1", "key": "YoHD9XEInc0", "name": "Trailer", "site": "YouTube", "type": "Trailer"}
        ]}
    })
}

fn episode_body(season: i64, number: i64) -> serde_json::Value {
    json!({
        "id": season * 100 + number,
        "episode_number": number,
        "name": format!("Episode {number}"),
        "overview": "Things happen.",
        "air_date": "2011-04-17",
        "runtime": 60,
        "vote_average": 8.0,
        "still_path": "/still.jpg"
    })
}

#[tokio::test]
async fn search_keeps_movies_and_shows_and_resolves_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("api_key", API_KEY))
        .and(query_param("query", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {"id": 27205, "media_type": "movie", "title": "Inception", "release_date": "2010-07-15", "poster_path": null},
                {"id": 525, "media_type": "person", "name": "Christopher Nolan"},
                {"id": 1399, "media_type": "tv", "name": "Inception: The Show", "first_air_date": "2020-01-01", "poster_path": "/show.jpg"}
            ],
            "total_results": 3,
            "total_pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = client.search("Inception", SearchKind::Multi).await.unwrap();

    assert_eq!(resp.results.len(), 2);
    let first = &resp.results[0];
    assert_eq!(first.id, 27205);
    assert_eq!(first.title, "Inception");
    assert_eq!(first.media_type, MediaType::Movie);
    assert_eq!(first.poster_path, None);
    let second = &resp.results[1];
    assert_eq!(second.media_type, MediaType::Tv);
    assert_eq!(second.release_date.as_deref(), Some("2020-01-01"));
    assert_eq!(
        second.poster_path.as_deref(),
        Some("https://img.test/t/p/w500/show.jpg")
    );
    client.close();
}

#[tokio::test]
async fn kind_specific_search_fills_in_media_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1399, "name": "Game of Thrones"}],
            "total_results": 1,
            "total_pages": 1
        })))
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .search("thrones", SearchKind::Tv)
        .await
        .unwrap();
    assert_eq!(resp.results[0].media_type, MediaType::Tv);
    assert_eq!(resp.results[0].title, "Game of Thrones");
}

#[tokio::test]
async fn movie_is_normalized_and_exports_budget_without_revenue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .and(query_param("append_to_response", "credits,videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_body()))
        .mount(&server)
        .await;

    let movie = client_for(&server).get_movie(27205).await.unwrap();
    assert_eq!(movie.title, "Inception");
    assert_eq!(
        movie.poster_path.as_deref(),
        Some("https://img.test/t/p/w500/poster.jpg")
    );
    assert_eq!(movie.backdrop_path, None);
    assert_eq!(movie.cast.len(), 2);
    assert_eq!(movie.cast[1].character, "Unknown");
    assert_eq!(
        movie.cast[0].profile_path.as_deref(),
        Some("https://img.test/t/p/w500/leo.jpg")
    );
    // only key crew jobs are kept
    assert_eq!(movie.crew.len(), 1);
    assert_eq!(movie.crew[0].job, "Director");
    assert_eq!(movie.production_countries, vec!["United States of America"]);
    assert_eq!(movie.spoken_languages, vec!["English"]);
    assert_eq!(
        movie.production_companies[0].logo_path.as_deref(),
        Some("https://img.test/t/p/w200/legendary.png")
    );
    assert_eq!(movie.videos[0].video_type, "Trailer");

    let text = exporter_for(ExportFormat::Txt)
        .export(
            ExportData::Single(&ContentKind::Movie(movie)),
            &ExportConfig::with_format(ExportFormat::Txt),
        )
        .unwrap();
    assert!(text.contains("Budget: $160,000,000"));
    assert!(!text.contains("Revenue:"));
}

#[tokio::test]
async fn show_with_episodes_skips_specials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "number_of_seasons": 2,
            "number_of_episodes": 3,
            "episode_run_time": [60],
            "genres": [{"id": 18, "name": "Drama"}],
            "in_production": false,
            "type": "Scripted",
            "seasons": [
                {"id": 10, "season_number": 0, "name": "Specials", "episode_count": 1},
                {"id": 12, "season_number": 2, "name": "Season 2", "episode_count": 1},
                {"id": 11, "season_number": 1, "name": "Season 1", "episode_count": 2}
            ],
            "created_by": [{"id": 9813, "name": "David Benioff"}],
            "credits": {"cast": [], "crew": []},
            "videos": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/season/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episodes": [episode_body(1, 2), episode_body(1, 1)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/season/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episodes": [episode_body(2, 1)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/season/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"episodes": []})))
        .expect(0)
        .mount(&server)
        .await;

    let show = client_for(&server).get_tv_show(1399, true).await.unwrap();
    assert_eq!(show.seasons.len(), 3);
    let order: Vec<(i64, i64)> = show
        .episodes
        .iter()
        .map(|e| (e.season_number, e.episode_number))
        .collect();
    assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
    assert_eq!(
        show.episodes[0].still_path.as_deref(),
        Some("https://img.test/t/p/w300/still.jpg")
    );
    assert_eq!(show.created_by, vec!["David Benioff"]);
    assert!(show.videos.is_empty());

    let csv = exporter_for(ExportFormat::Csv)
        .export(
            ExportData::Single(&ContentKind::Show(show)),
            &ExportConfig::with_format(ExportFormat::Csv),
        )
        .unwrap();
    let (_, episodes) = csv.split_once("--- EPISODES ---\n").unwrap();
    assert_eq!(episodes.lines().count(), 4);
    assert!(episodes.lines().nth(1).unwrap().starts_with("1399,Game of Thrones,1,1,"));
}

#[tokio::test]
async fn show_without_episodes_makes_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "seasons": [{"id": 11, "season_number": 1, "name": "Season 1", "episode_count": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let show = client_for(&server).get_tv_show(1399, false).await.unwrap();
    assert!(show.episodes.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limited_requests_back_off_then_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_body()))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let movie = client_for(&server).get_movie(27205).await.unwrap();
    assert_eq!(movie.id, 27205);
    // 1s then 2s of backoff
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn persistent_rate_limiting_exhausts_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .with_retry_policy(fast_retry())
        .get_movie(1)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::RetryExhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/999999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found.",
            "success": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .with_retry_policy(fast_retry())
        .get_movie(999999999)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        CatalogError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "The resource you requested could not be found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_movie(5).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_exhausts_network_retries() {
    // Bind then drop a listener so the port refuses connections.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let uri = format!("http://127.0.0.1:{port}");
    let client = CatalogClient::new(API_KEY)
        .unwrap()
        .with_base_url(&uri)
        .with_retry_policy(fast_retry());

    let started = Instant::now();
    let err = client.get_movie(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::RetryExhausted { attempts: 3, .. }));
    assert!(started.elapsed() >= Duration::from_millis(40));
}
