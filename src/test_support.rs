use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::AppMessage;
use crate::config::AppConfig;

/// In-process stand-in for the artist backend.
pub struct Backend {
    pub config: AppConfig,
    suggestion_hits: Arc<AtomicUsize>,
}

impl Backend {
    pub async fn spawn() -> Self {
        let suggestion_hits = Arc::new(AtomicUsize::new(0));
        let router = router(suggestion_hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            config: AppConfig::default().with_api_base_url(format!("http://{addr}")),
            suggestion_hits,
        }
    }

    pub fn suggestion_hits(&self) -> usize {
        self.suggestion_hits.load(Ordering::SeqCst)
    }
}

/// Search queries equal to `fail` get a 500. Artist id `404` is missing and
/// id `500` fails.
fn router(suggestion_hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/api/artist/{id}",
            get(|Path(id): Path<u32>| async move {
                match id {
                    404 => Err(StatusCode::NOT_FOUND),
                    500 => Err(StatusCode::INTERNAL_SERVER_ERROR),
                    _ => Ok(Json(json!({
                        "artist": {
                            "id": id,
                            "name": "Queen",
                            "image": "https://img.example/queen.jpeg",
                            "members": ["Freddie Mercury", "Brian May"],
                            "creationDate": 1970,
                            "firstAlbum": "14-12-1973"
                        },
                        "locations": [
                            {"address": "london-uk", "lat": 51.5, "lon": -0.12},
                            {"address": "atlantis", "lat": null, "lon": 10.0}
                        ],
                        "dates": ["*23-08-2019"],
                        "relations": {"london-uk": ["23-08-2019"]}
                    }))),
                }
            }),
        )
        .route(
            "/api/suggestions",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let hits = suggestion_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let q = params.get("q").cloned().unwrap_or_default();
                    Json(json!([
                        {"text": format!("{q} band"), "type": "artist/band"},
                        {"text": format!("{q}-city"), "type": "location"}
                    ]))
                }
            }),
        )
        .route(
            "/api/search",
            post(
                |Query(params): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    let q = params.get("q").cloned().unwrap_or_default();
                    if q == "fail" {
                        return Err(StatusCode::INTERNAL_SERVER_ERROR);
                    }
                    let min = body["creationYearMin"].as_i64().unwrap_or_default();
                    Ok(Json(json!({
                        "artists": [
                            {"id": 1, "name": format!("{q}-{min}"), "creationDate": 1970, "firstAlbum": "14-12-1973"},
                            {"id": 2, "name": "second", "creationDate": 1985, "firstAlbum": "01-01-1990"}
                        ]
                    })))
                },
            ),
        )
}

pub async fn next_message(rx: &mut UnboundedReceiver<AppMessage>) -> AppMessage {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("message channel closed")
}
