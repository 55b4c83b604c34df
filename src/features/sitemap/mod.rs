use crate::AppState;
use crate::services::SitemapServiceError;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;

/// Media type of the sitemap response. The body is always UTF-8.
pub const SITEMAP_CONTENT_TYPE: &str = "text/xml";

pub fn sitemap_router(path: &str) -> Router<AppState> {
    Router::new().route(path, get(sitemap_handler))
}

// the body is fully rendered before the response is built, so a failure can never leave a
// half-written sitemap on the wire
async fn sitemap_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = state.sitemap.render_sitemap().await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, SITEMAP_CONTENT_TYPE)],
        body,
    )
        .into_response())
}

/// Anything that stops the sitemap from being produced. Always a generic 500 to the client.
pub struct AppError(SitemapServiceError);

impl From<SitemapServiceError> for AppError {
    fn from(e: SitemapServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("sitemap request failed: {:?}", anyhow::Error::from(self.0));
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
