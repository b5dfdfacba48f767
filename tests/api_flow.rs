use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use reelfetch::app::{build_router, AppState};
use reelfetch::catalog::{CatalogApi, CatalogError};
use reelfetch::models::{
    CastMember, Episode, Genre, MediaType, Movie, SearchKind, SearchResponse, SearchResult, Season,
    TvShow,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

const API_KEY: &str = "batch-secret";

struct FakeCatalog {
    movie: Movie,
    show: TvShow,
    tv_calls: Mutex<Vec<(i64, bool)>>,
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResponse, CatalogError> {
        let mut results = Vec::new();
        if query.to_lowercase().contains("inception") && kind != SearchKind::Tv {
            results.push(hit(self.movie.id, &self.movie.title, MediaType::Movie));
        }
        if query.to_lowercase().contains("thrones") && kind != SearchKind::Movie {
            results.push(hit(self.show.id, &self.show.name, MediaType::Tv));
        }
        if query == "boom" {
            return Err(CatalogError::RetryExhausted {
                attempts: 3,
                last: "connection reset".to_string(),
            });
        }
        Ok(SearchResponse {
            total_results: results.len() as i64,
            total_pages: 1,
            results,
        })
    }

    async fn get_movie(&self, id: i64) -> Result<Movie, CatalogError> {
        if id == self.movie.id {
            Ok(self.movie.clone())
        } else {
            Err(not_found())
        }
    }

    async fn get_tv_show(&self, id: i64, include_episodes: bool) -> Result<TvShow, CatalogError> {
        self.tv_calls.lock().unwrap().push((id, include_episodes));
        if id != self.show.id {
            return Err(not_found());
        }
        let mut show = self.show.clone();
        if !include_episodes {
            show.episodes.clear();
        }
        Ok(show)
    }

    async fn get_season_episodes(
        &self,
        _id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError> {
        Ok(self
            .show
            .episodes
            .iter()
            .filter(|e| e.season_number == season_number)
            .cloned()
            .collect())
    }
}

fn not_found() -> CatalogError {
    CatalogError::Status {
        status: reqwest::StatusCode::NOT_FOUND,
        message: "The resource you requested could not be found.".to_string(),
    }
}

fn hit(id: i64, title: &str, media_type: MediaType) -> SearchResult {
    SearchResult {
        id,
        title: title.to_string(),
        media_type,
        release_date: None,
        poster_path: None,
        backdrop_path: None,
        overview: None,
        vote_average: None,
    }
}

fn movie() -> Movie {
    Movie {
        id: 27205,
        title: "Inception".to_string(),
        original_title: Some("Inception".to_string()),
        original_language: Some("en".to_string()),
        overview: Some("A thief who steals corporate secrets.".to_string()),
        release_date: Some("2010-07-15".to_string()),
        runtime: Some(148),
        genres: vec![Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        }],
        vote_average: Some(8.4),
        vote_count: Some(35000),
        popularity: Some(83.5),
        poster_path: Some("https://image.tmdb.org/t/p/w500/poster.jpg".to_string()),
        backdrop_path: None,
        cast: vec![CastMember {
            id: Some(6193),
            name: "Leonardo DiCaprio".to_string(),
            character: "Cobb".to_string(),
            profile_path: None,
            order: Some(0),
        }],
        crew: vec![],
        tagline: None,
        budget: Some(160_000_000),
        revenue: None,
        status: Some("Released".to_string()),
        imdb_id: Some("tt1375666".to_string()),
        homepage: None,
        production_companies: vec![],
        production_countries: vec![],
        spoken_languages: vec![],
        videos: vec![],
    }
}

fn episode(season_number: i64, episode_number: i64) -> Episode {
    Episode {
        id: season_number * 100 + episode_number,
        episode_number,
        season_number,
        name: format!("Episode {episode_number}"),
        overview: None,
        air_date: Some("2011-04-17".to_string()),
        runtime: Some(60),
        vote_average: Some(8.0),
        vote_count: None,
        still_path: None,
        guest_stars: vec![],
        crew: vec![],
        production_code: None,
    }
}

fn show() -> TvShow {
    TvShow {
        id: 1399,
        name: "Game of Thrones".to_string(),
        original_name: Some("Game of Thrones".to_string()),
        original_language: Some("en".to_string()),
        overview: None,
        first_air_date: Some("2011-04-17".to_string()),
        last_air_date: None,
        number_of_episodes: Some(2),
        number_of_seasons: Some(1),
        episode_run_time: vec![60],
        genres: vec![],
        vote_average: Some(8.0),
        vote_count: None,
        popularity: None,
        poster_path: None,
        backdrop_path: None,
        cast: vec![],
        crew: vec![],
        seasons: vec![Season {
            id: 11,
            season_number: 1,
            name: "Season 1".to_string(),
            episode_count: 2,
            air_date: None,
            overview: None,
            poster_path: None,
            vote_average: None,
        }],
        status: Some("Ended".to_string()),
        show_type: Some("Scripted".to_string()),
        tagline: None,
        homepage: None,
        in_production: Some(false),
        networks: vec![],
        production_companies: vec![],
        origin_country: vec!["US".to_string()],
        spoken_languages: vec![],
        episodes: vec![episode(1, 1), episode(1, 2)],
        videos: vec![],
        created_by: vec![],
    }
}

fn app() -> (Router, Arc<FakeCatalog>) {
    let catalog = Arc::new(FakeCatalog {
        movie: movie(),
        show: show(),
        tv_calls: Mutex::new(vec![]),
    });
    let state = AppState {
        catalog: catalog.clone(),
        api_key: API_KEY.to_string(),
    };
    (build_router(state), catalog)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(res).await).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let (app, _) = app();
    let res = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn search_requires_query() {
    let (app, _) = app();
    let res = app.oneshot(get("/api/search?q=%20")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("'q'"));
}

#[tokio::test]
async fn search_returns_hits() {
    let (app, _) = app();
    let res = app
        .oneshot(get("/api/search?q=inception&type=movie"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["results"][0]["id"], 27205);
    assert_eq!(body["results"][0]["media_type"], "movie");
}

#[tokio::test]
async fn search_rejects_unknown_type() {
    let (app, _) = app();
    let res = app
        .oneshot(get("/api/search?q=inception&type=person"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movie_detail_and_missing_movie() {
    let (app, _) = app();
    let res = app.clone().oneshot(get("/api/movie/27205")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["title"], "Inception");
    assert_eq!(body["budget"], 160_000_000);

    let res = app.oneshot(get("/api/movie/1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Movie 1 not found");
}

#[tokio::test]
async fn tv_detail_honours_include_episodes() {
    let (app, catalog) = app();
    let res = app
        .clone()
        .oneshot(get("/api/tv/1399?include_episodes=false"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["episodes"].as_array().unwrap().len(), 0);
    assert_eq!(body["type"], "Scripted");

    let res = app.oneshot(get("/api/tv/1399")).await.unwrap();
    assert_eq!(body_json(res).await["episodes"].as_array().unwrap().len(), 2);
    assert_eq!(
        *catalog.tv_calls.lock().unwrap(),
        vec![(1399, false), (1399, true)]
    );
}

#[tokio::test]
async fn export_movie_as_csv_download() {
    let (app, _) = app();
    let res = app
        .oneshot(get("/api/export/movie/27205?format=csv&include_images=false"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
    let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"Inception_"));
    assert!(disposition.ends_with(".csv\""));

    let body = body_text(res).await;
    let mut lines = body.lines();
    assert!(lines.next().unwrap().starts_with("id,title,original_title"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("27205,Inception,"));
    assert!(!row.contains("image.tmdb.org"));
}

#[tokio::test]
async fn export_show_as_sql_without_episodes() {
    let (app, catalog) = app();
    let res = app
        .oneshot(get("/api/export/tv/1399?format=sql&include_episodes=false"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/sql");
    let body = body_text(res).await;
    assert!(body.contains("INSERT INTO tv_shows"));
    assert!(!body.contains("INSERT INTO episodes"));
    assert_eq!(*catalog.tv_calls.lock().unwrap(), vec![(1399, false)]);
}

#[tokio::test]
async fn export_rejects_unknown_format_and_missing_title() {
    let (app, _) = app();
    let res = app
        .clone()
        .oneshot(get("/api/export/movie/27205?format=yaml"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.oneshot(get("/api/export/tv/7?format=json")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

fn batch_request(token: Option<&str>, query: &str, body: &str) -> Request<Body> {
    let mut builder = Request::post(format!("/api/export/batch?{query}"))
        .header(header::CONTENT_TYPE, "text/plain");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn batch_requires_bearer_token() {
    let (app, _) = app();
    let res = app
        .clone()
        .oneshot(batch_request(None, "format=json", "Inception"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(batch_request(Some("wrong"), "format=json", "Inception"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_rejects_empty_body() {
    let (app, _) = app();
    let res = app
        .oneshot(batch_request(Some(API_KEY), "format=json", "# only a comment\n\n"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_reports_exported_unmatched_and_failed() {
    let (app, catalog) = app();
    let body = "Inception\n# skipped\nGame of Thrones\nNothing Here\nboom\n";
    let res = app
        .oneshot(batch_request(
            Some(API_KEY),
            "format=txt&include_episodes=false&type=multi",
            body,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let report = body_json(res).await;
    assert_eq!(report["status"], "success");
    assert_eq!(report["format"], "txt");
    assert_eq!(report["content_type"], "text/plain");

    let exported = report["exported"].as_array().unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0]["id"], 27205);
    assert!(exported[0]["filename"]
        .as_str()
        .unwrap()
        .starts_with("Inception_"));
    assert!(exported[0]["content"]
        .as_str()
        .unwrap()
        .contains("MOVIE: Inception"));
    assert_eq!(exported[1]["media_type"], "tv");
    assert!(exported[1]["filename"].as_str().unwrap().ends_with(".txt"));

    assert_eq!(report["unmatched"], serde_json::json!(["Nothing Here"]));
    let failed = report["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["query"], "boom");

    assert_eq!(*catalog.tv_calls.lock().unwrap(), vec![(1399, false)]);
}

#[tokio::test]
async fn batch_without_type_searches_movies_only() {
    let (app, catalog) = app();
    let res = app
        .oneshot(batch_request(
            Some(API_KEY),
            "format=json",
            "Inception\nGame of Thrones\n",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let report = body_json(res).await;
    let exported = report["exported"].as_array().unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["media_type"], "movie");
    assert_eq!(report["unmatched"], serde_json::json!(["Game of Thrones"]));
    assert!(catalog.tv_calls.lock().unwrap().is_empty());
}
