//! Banner CRUD and display handlers.
//!
//! Errors are rendered as `{"error": kind, "message": text}` with a status
//! derived from the [`ServiceError`] kind.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use banner_core::{Banner, BannerId, SelectionError};
use serde_json::json;

use super::{AppState, DisplayOrigin};
use crate::origin::PeerOriginResolver;
use crate::service::{CreateBannerRequest, ServiceError, UpdateBannerRequest};

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Selection(SelectionError::NoActiveBanner) => {
                StatusCode::NOT_FOUND
            }
            Self::Selection(SelectionError::OriginResolutionFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Storage(_)
            | Self::Selection(
                SelectionError::CacheUnavailable(_)
                | SelectionError::StoreUnavailable(_)
                | SelectionError::CacheWriteFailed { .. },
            ) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), error = %self, "banner request failed");
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// `POST /banners` -- 201 with `{"id": ..}`.
pub async fn create_banner_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateBannerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `GET /banners` -- all banners ordered by id.
pub async fn list_banners_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Banner>>, ServiceError> {
    Ok(Json(state.service.list().await?))
}

/// `GET /banners/{id}`.
pub async fn get_banner_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Banner>, ServiceError> {
    Ok(Json(state.service.get(BannerId(id)).await?))
}

/// `PATCH /banners/{id}` -- applies the provided fields. The path id wins
/// over any id in the body.
pub async fn update_banner_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut req): Json<UpdateBannerRequest>,
) -> Result<Json<Banner>, ServiceError> {
    req.id = BannerId(id);
    Ok(Json(state.service.update(req).await?))
}

/// `DELETE /banners/{id}` -- 204 on success.
pub async fn delete_banner_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.service.delete(BannerId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /banners/active` -- the banner to show right now.
///
/// In peer mode the remote address recorded by the listener is the origin;
/// a request without one fails origin resolution.
pub async fn active_banner_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Banner>, ServiceError> {
    let banner = match state.display_origin {
        DisplayOrigin::Configured => state.service.display().await?,
        DisplayOrigin::Peer => {
            let peer = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip());
            state
                .service
                .display_for(&PeerOriginResolver::new(peer))
                .await?
        }
    };
    Ok(Json(banner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServiceError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound(BannerId(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Selection(SelectionError::NoActiveBanner).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Selection(SelectionError::StoreUnavailable(anyhow::anyhow!("down")))
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::Selection(SelectionError::OriginResolutionFailed(anyhow::anyhow!(
                "no route"
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
