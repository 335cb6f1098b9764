/*!
Swagger UI integration for interactive API documentation.

Serves a finished document at `/swagger-ui/swagger.json` next to a Swagger UI
page at `/swagger-ui/` that loads it.
*/

use crate::{
    error::{OpenApiError, OpenApiResult},
    specification::OpenApiSpec,
};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Route of the rendered document
pub const SPEC_ROUTE: &str = "/swagger-ui/swagger.json";

/// Route of the Swagger UI page
pub const UI_ROUTE: &str = "/swagger-ui/";

/// State shared by the documentation handlers
#[derive(Clone)]
struct SwaggerState {
    /// Pretty-printed document, rendered once
    spec_json: Arc<String>,
    /// Page title
    title: Arc<String>,
}

/// Serves a document and an interactive viewer for it
#[derive(Debug, Clone)]
pub struct SwaggerUi {
    spec_json: Arc<String>,
    title: Arc<String>,
}

impl SwaggerUi {
    /// Render the document for serving
    pub fn new(spec: &OpenApiSpec) -> OpenApiResult<Self> {
        Ok(Self {
            spec_json: Arc::new(spec.to_json(true)?),
            title: Arc::new(spec.info.title.clone()),
        })
    }

    /// Router with the document and viewer routes
    pub fn router(&self) -> Router {
        let state = SwaggerState {
            spec_json: Arc::clone(&self.spec_json),
            title: Arc::clone(&self.title),
        };

        Router::new()
            .route(SPEC_ROUTE, get(serve_spec))
            .route(UI_ROUTE, get(serve_index))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Serve the documentation until the listener fails
    pub async fn serve(&self, addr: SocketAddr) -> OpenApiResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| OpenApiError::server_error(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Swagger UI available at http://{}{}", addr, UI_ROUTE);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| OpenApiError::server_error(format!("Server error: {}", e)))?;

        Ok(())
    }

    fn index_html(title: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {{
            margin: 0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>

    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                url: '{spec_route}',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                validatorUrl: null
            }});
        }};
    </script>
</body>
</html>"#,
            title = html_escape(title),
            spec_route = SPEC_ROUTE,
        )
    }
}

async fn serve_spec(State(state): State<SwaggerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.spec_json.as_str().to_owned(),
    )
}

async fn serve_index(State(state): State<SwaggerState>) -> Html<String> {
    Html(SwaggerUi::index_html(&state.title))
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn swagger() -> SwaggerUi {
        SwaggerUi::new(&OpenApiSpec::new("Pets <API>", "1.0.0")).unwrap()
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_pretty_document() {
        let (status, content_type, body) = get_body(swagger().router(), SPEC_ROUTE).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let spec: OpenApiSpec = serde_json::from_str(&body).unwrap();
        assert_eq!(spec.info.title, "Pets <API>");
        assert!(body.contains('\n'));
    }

    #[tokio::test]
    async fn test_serves_index_page() {
        let (status, content_type, body) = get_body(swagger().router(), UI_ROUTE).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("url: '/swagger-ui/swagger.json'"));
        assert!(body.contains("<title>Pets &lt;API&gt;</title>"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get_body(swagger().router(), "/swagger-ui/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
