//! Theme handlers

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use scripture_chat_common::themes::{self, Theme, ThemeAssets, DEFAULT_DOMAIN};

/// Selectable domains
#[derive(Serialize)]
pub struct ThemeListResponse {
    pub domains: Vec<DomainSummary>,
    pub default: &'static str,
}

#[derive(Serialize)]
pub struct DomainSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Theme record plus the assets to preload for it
#[derive(Serialize)]
pub struct ThemeResponse {
    /// Domain id that was asked for
    pub requested: String,
    /// True when the requested id is unknown and the default was served
    pub fallback: bool,
    pub theme: &'static Theme,
    pub assets: ThemeAssets,
}

#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    pub domain: Option<String>,
}

/// List selectable domains
pub async fn list_themes() -> Json<ThemeListResponse> {
    let domains = themes::available_domains()
        .into_iter()
        .map(|id| {
            let theme = themes::get_theme(id);
            DomainSummary {
                id: theme.id,
                name: theme.name,
                description: theme.description,
            }
        })
        .collect();

    Json(ThemeListResponse {
        domains,
        default: DEFAULT_DOMAIN,
    })
}

/// Theme for a domain given in the path
pub async fn get_theme(Path(domain): Path<String>) -> Json<ThemeResponse> {
    Json(resolve(domain))
}

/// Theme for `?domain=`, the way the chat page selects it
pub async fn theme_for_query(Query(query): Query<ThemeQuery>) -> Json<ThemeResponse> {
    Json(resolve(query.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string())))
}

fn resolve(requested: String) -> ThemeResponse {
    let theme = themes::get_theme(&requested);
    let fallback = theme.id != requested;

    if fallback {
        tracing::debug!(requested = %requested, "Unknown domain, serving default theme");
    }

    ThemeResponse {
        requested,
        fallback,
        theme,
        assets: theme.assets(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{router_with, test_config};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use scripture_chat_common::knowledge::MockKnowledgeService;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> serde_json::Value {
        let app = router_with(Arc::new(MockKnowledgeService::streaming(["x"])), test_config());
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_themes() {
        let body = get_json("/api/themes").await;
        let ids: Vec<&str> = body["domains"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["mahabharata", "bible", "quran"]);
        assert_eq!(body["default"], "default");
    }

    #[tokio::test]
    async fn test_known_domain() {
        let body = get_json("/api/themes/mahabharata").await;
        assert_eq!(body["fallback"], false);
        assert_eq!(body["theme"]["id"], "mahabharata");
        assert_eq!(body["theme"]["animations"]["thinking"], "lotusBloom");
        assert_eq!(body["assets"]["images"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_domain_falls_back() {
        let body = get_json("/api/themes/avesta").await;
        assert_eq!(body["requested"], "avesta");
        assert_eq!(body["fallback"], true);
        assert_eq!(body["theme"]["id"], "default");
    }

    #[tokio::test]
    async fn test_query_parameter() {
        let body = get_json("/api/theme?domain=bible").await;
        assert_eq!(body["theme"]["name"], "Holy Bible");

        let body = get_json("/api/theme").await;
        assert_eq!(body["theme"]["id"], "default");
        assert_eq!(body["fallback"], false);
    }
}
