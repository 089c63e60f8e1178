//! Browser client for the leaderboard service
//!
//! Requests go to the page's own origin. Callers spawn these with
//! `wasm_bindgen_futures::spawn_local` and only log failures.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::leaderboard::{LeaderboardEntry, ScoreSubmission, SubmitOutcome};
use crate::{Error, Result};

const LEADERBOARD_PATH: &str = "/api/leaderboard";

fn js_error(e: JsValue) -> Error {
    Error::Network(format!("{e:?}"))
}

/// Run a request and return the body of a 2xx response
async fn send(request: Request) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| Error::Network("no window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(Error::Network(format!(
            "{} {}",
            response.status(),
            response.status_text()
        )));
    }
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| Error::Network("response body is not text".to_string()))
}

/// Read the current top of the leaderboard
pub async fn fetch_leaderboard() -> Result<Vec<LeaderboardEntry>> {
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::SameOrigin);
    let request = Request::new_with_str_and_init(LEADERBOARD_PATH, &init).map_err(js_error)?;

    let body = send(request).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Submit a finished run
pub async fn submit_score(submission: &ScoreSubmission) -> Result<SubmitOutcome> {
    let payload = serde_json::to_string(submission)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::SameOrigin);
    init.set_body(&JsValue::from_str(&payload));
    let request = Request::new_with_str_and_init(LEADERBOARD_PATH, &init).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let body = send(request).await?;
    Ok(serde_json::from_str(&body)?)
}
