//! Router-level tests that never touch the database.
//!
//! The connection pool is lazy, so every path exercised here (public
//! endpoints, env-admin auth, request validation, static registries) must
//! answer without a live Postgres. Anything needing real rows lives behind
//! the `db-tests` feature instead.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use reelscore_api::{create_api_router, ApiConfig, AppState, AuthConfig, DbClient, DbConfig};
use secrecy::SecretString;
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

fn test_router() -> axum::Router {
    let db = DbClient::from_config(&DbConfig::default()).expect("lazy pool never fails");
    let auth_config = AuthConfig {
        admin_api_key: Some(SecretString::from(ADMIN_KEY.to_string())),
        default_rate_limit: 500,
    };
    let state = AppState::new(db, ApiConfig::default(), auth_config).expect("state builds");
    create_api_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-API-Key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap()
}

fn authed_post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-API-Key", ADMIN_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let response = test_router().oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn root_serves_info_document() {
    let response = test_router().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Reelscore API");
    assert_eq!(json["health"], "/api/v1/health");
}

#[tokio::test]
async fn missing_api_key_is_401() {
    let response = test_router().oneshot(get("/api/v1/movie/tt0468569")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_imdb_id_is_400() {
    let response = test_router().oneshot(authed_get("/api/v1/movie/invalid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("Invalid IMDb id"));
}

#[tokio::test]
async fn imdb_id_without_tt_prefix_is_400() {
    let response = test_router().oneshot(authed_get("/api/v1/movie/0468569")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_with_malformed_id_is_400() {
    let response = test_router()
        .oneshot(authed_post_json("/api/v1/movies/batch", r#"{"imdbIds": ["bogus"]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_over_cap_is_400() {
    let ids: Vec<String> = (0..51).map(|i| format!("\"tt{:07}\"", i)).collect();
    let body = format!(r#"{{"imdbIds": [{}]}}"#, ids.join(","));

    let response =
        test_router().oneshot(authed_post_json("/api/v1/movies/batch", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("51"));
}

#[tokio::test]
async fn curated_registry_is_served() {
    let response = test_router().oneshot(authed_get("/api/v1/lists/curated")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let lists = json["lists"].as_array().unwrap();
    assert!(!lists.is_empty());
    for list in lists {
        assert!(list["slug"].is_string());
        assert!(list["title"].is_string());
        assert!(list["description"].is_string());
    }
}

#[tokio::test]
async fn unknown_curated_slug_is_404() {
    let response =
        test_router().oneshot(authed_get("/api/v1/lists/curated/not-a-real-list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn browse_options_are_served() {
    let response =
        test_router().oneshot(authed_get("/api/v1/lists/browse/options")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["certifications"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("certified_fresh")));
    assert!(json["genres"].as_array().unwrap().contains(&serde_json::json!("horror")));
    assert!(json["affiliates"].as_array().unwrap().contains(&serde_json::json!("netflix")));
}

#[tokio::test]
async fn browse_with_invalid_certification_is_400() {
    let response = test_router()
        .oneshot(authed_get("/api/v1/lists/browse?certification=invalid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn browse_with_invalid_genre_is_400() {
    let response = test_router()
        .oneshot(authed_get("/api/v1/lists/browse?genre=not_a_genre"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_list_url_is_400() {
    let response = test_router()
        .oneshot(authed_get("/api/v1/list?url=https://www.google.com/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// BATCH SSE (scripted pipeline, no network, no database)
// ============================================================================

mod sse {
    use super::*;
    use chrono::Utc;
    use reelscore_api::services::ListService;
    use reelscore_pipeline::{Pipeline, PipelineConfig, StageLimits};
    use reelscore_storage::{InMemoryListCache, InMemoryMovieCache};
    use reelscore_test_utils::{cached_movie, ScriptedFetcher, ScriptedResolver};
    use std::sync::Arc;
    use std::time::Instant;

    /// A router whose pipeline runs against scripted providers and an
    /// in-memory cache; only auth (env admin key) and routing are real.
    fn scripted_router() -> axum::Router {
        let db = DbClient::from_config(&DbConfig::default()).expect("lazy pool never fails");
        let auth_config = AuthConfig {
            admin_api_key: Some(SecretString::from(ADMIN_KEY.to_string())),
            default_rate_limit: 500,
        };
        let config = ApiConfig::default();

        let cache = Arc::new(InMemoryMovieCache::new());
        cache.insert_entry(cached_movie("tt0000001", "m/a", "Movie A", Utc::now()));

        let limits = Arc::new(StageLimits::default());
        let pipeline = Pipeline::new(
            cache,
            Arc::new(ScriptedResolver::new()),
            Arc::new(ScriptedFetcher::new()),
            Arc::clone(&limits),
            PipelineConfig::default(),
        );

        let lists = Arc::new(ListService::new(
            Arc::new(InMemoryListCache::new()),
            Arc::new(ScriptedListMisses),
            limits,
            config.cache_ttl_days,
        ));

        let state = AppState {
            db: db.clone(),
            pipeline,
            lists,
            auth: reelscore_api::AuthState::new(db, auth_config),
            config,
            start_time: Instant::now(),
        };
        create_api_router(state)
    }

    /// List fetcher double that never finds anything.
    struct ScriptedListMisses;

    #[async_trait::async_trait]
    impl reelscore_providers::ListFetcher for ScriptedListMisses {
        async fn fetch_list(
            &self,
            _url: &str,
        ) -> Result<Option<reelscore_core::ListResult>, reelscore_core::ProviderError> {
            Ok(None)
        }
    }

    fn parse_sse_events(body: &str) -> Vec<(String, serde_json::Value)> {
        let mut events = Vec::new();
        let mut current_name = None;
        for line in body.lines() {
            if let Some(name) = line.strip_prefix("event: ") {
                current_name = Some(name.to_string());
            } else if let Some(data) = line.strip_prefix("data: ") {
                if let (Some(name), Ok(json)) = (current_name.take(), serde_json::from_str(data)) {
                    events.push((name, json));
                }
            }
        }
        events
    }

    #[tokio::test]
    async fn batch_streams_events_and_terminal_done() {
        // tt0000001 is a fresh cache hit; tt9999999 resolves to not_found.
        let response = scripted_router()
            .oneshot(authed_post_json(
                "/api/v1/movies/batch",
                r#"{"imdbIds": ["tt0000001", "tt9999999"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/event-stream"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let events = parse_sse_events(std::str::from_utf8(&bytes).unwrap());

        let movies: Vec<_> = events.iter().filter(|(name, _)| name == "movie").collect();
        let errors: Vec<_> = events.iter().filter(|(name, _)| name == "error").collect();
        let done: Vec<_> = events.iter().filter(|(name, _)| name == "done").collect();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].1["status"], "cached");
        assert_eq!(movies[0].1["imdbId"], "tt0000001");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].1["error"], "not_found");
        assert_eq!(errors[0].1["imdbId"], "tt9999999");

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].1["total"], 2);
        assert_eq!(done[0].1["cached"], 1);
        assert_eq!(done[0].1["fetched"], 0);
        assert_eq!(done[0].1["errors"], 1);

        // The summary is the final event on the stream.
        assert_eq!(events.last().unwrap().0, "done");
    }

    #[tokio::test]
    async fn empty_batch_gets_immediate_done() {
        let response = scripted_router()
            .oneshot(authed_post_json("/api/v1/movies/batch", r#"{"imdbIds": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let events = parse_sse_events(std::str::from_utf8(&bytes).unwrap());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "done");
        assert_eq!(events[0].1["total"], 0);
    }
}
