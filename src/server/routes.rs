//! Route handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::AppState;
use crate::leaderboard::{LEADERBOARD_LIMIT, LeaderboardEntry, ScoreSubmission, SubmitOutcome};
use crate::share::{self, CardScore};
use crate::{Error, Result};

/// Cache lifetime for the `?` placeholder card
const PLACEHOLDER_MAX_AGE: u32 = 300;

pub(super) async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let top = state.store.top(LEADERBOARD_LIMIT)?;
    Ok(Json(top))
}

pub(super) async fn post_leaderboard(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitOutcome>> {
    let submission: ScoreSubmission =
        serde_json::from_slice(&body).map_err(|e| Error::MalformedBody(e.to_string()))?;
    let entry = submission.into_entry()?;
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.submit(entry)).await??;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub(super) struct CardQuery {
    score: Option<String>,
}

pub(super) async fn share_card(
    State(state): State<AppState>,
    Query(query): Query<CardQuery>,
) -> Response {
    let score = CardScore::from_param(query.score.as_deref());
    let cache_control = match score {
        CardScore::Score(_) => format!("public, max-age={}, immutable", state.share_card_max_age),
        CardScore::Unknown => format!("public, max-age={PLACEHOLDER_MAX_AGE}"),
    };

    match share::render_card(score) {
        Ok(svg) => (
            [
                (header::CONTENT_TYPE, "image/svg+xml".to_string()),
                (header::CACHE_CONTROL, cache_control),
            ],
            svg,
        )
            .into_response(),
        Err(e) => {
            log::error!("Share card render failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate image").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use super::super::router;
    use super::*;
    use crate::leaderboard::{LeaderboardStore, MemoryStore};

    struct BrokenStore;

    impl LeaderboardStore for BrokenStore {
        fn top(&self, _limit: usize) -> Result<Vec<LeaderboardEntry>> {
            Err(Error::LockPoisoned)
        }

        fn submit(&self, _entry: LeaderboardEntry) -> Result<SubmitOutcome> {
            Err(Error::LockPoisoned)
        }
    }

    fn state_with(store: Arc<dyn LeaderboardStore>) -> AppState {
        AppState {
            store,
            share_card_max_age: 3600,
        }
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/leaderboard")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_read() {
        let app = router(state_with(Arc::new(MemoryStore::new())));

        let resp = app
            .clone()
            .oneshot(post(r#"{"fid":1,"username":"alice","score":12,"pfpUrl":"https://a/p.png"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!({"success": true, "newHighScore": true})
        );

        let resp = app.oneshot(get("/api/leaderboard")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!([{"fid": 1, "username": "alice", "score": 12, "pfp_url": "https://a/p.png"}])
        );
    }

    #[tokio::test]
    async fn test_lower_score_is_not_a_high_score() {
        let app = router(state_with(Arc::new(MemoryStore::new())));
        app.clone()
            .oneshot(post(r#"{"fid":1,"username":"a","score":12}"#))
            .await
            .unwrap();
        let resp = app
            .clone()
            .oneshot(post(r#"{"fid":1,"username":"a","score":4}"#))
            .await
            .unwrap();
        assert_eq!(
            json_body(resp).await,
            serde_json::json!({"success": true, "newHighScore": false})
        );

        let resp = app.oneshot(get("/api/leaderboard")).await.unwrap();
        assert_eq!(json_body(resp).await[0]["score"], 12);
    }

    #[tokio::test]
    async fn test_missing_data_is_bad_request() {
        let app = router(state_with(Arc::new(MemoryStore::new())));
        let resp = app.oneshot(post(r#"{"username":"a","score":3}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await, serde_json::json!({"error": "Missing Data"}));
    }

    #[tokio::test]
    async fn test_zero_fid_is_missing_data() {
        let store = Arc::new(MemoryStore::new());
        let app = router(state_with(store.clone()));
        let resp = app.oneshot(post(r#"{"fid":0,"score":3}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await, serde_json::json!({"error": "Missing Data"}));
        assert!(store.top(LEADERBOARD_LIMIT).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = router(state_with(Arc::new(MemoryStore::new())));
        let resp = app.oneshot(post("{nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let app = router(state_with(Arc::new(BrokenStore)));
        let resp = app.clone().oneshot(get("/api/leaderboard")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(resp).await["error"].is_string());

        let resp = app.oneshot(post(r#"{"fid":1,"score":3}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_read_is_capped_at_limit() {
        let store = Arc::new(MemoryStore::new());
        for fid in 1..=70u64 {
            store
                .submit(LeaderboardEntry {
                    fid,
                    username: String::new(),
                    score: fid,
                    pfp_url: None,
                })
                .unwrap();
        }
        let app = router(state_with(store));
        let resp = app.oneshot(get("/api/leaderboard")).await.unwrap();
        let rows = json_body(resp).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), LEADERBOARD_LIMIT);
        assert_eq!(rows[0]["score"], 70);
    }

    #[tokio::test]
    async fn test_share_card_headers_vary_by_variant() {
        let app = router(state_with(Arc::new(MemoryStore::new())));

        let resp = app.clone().oneshot(get("/api/og?score=42")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_eq!(
            resp.headers()[header::CACHE_CONTROL],
            "public, max-age=3600, immutable"
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("42 ETH"));

        let resp = app.oneshot(get("/api/og")).await.unwrap();
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, max-age=300");
    }
}
