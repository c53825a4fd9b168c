use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DownloadCountDto, MessageResponse, MovieDto};
use crate::models::movie::{CatalogStats, Category, MovieUpdate, NewMovie};

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

fn parse_category(raw: &str) -> Result<Category, ApiError> {
    Category::parse(raw).ok_or_else(|| {
        ApiError::validation(format!(
            "Unknown category '{raw}' (expected one of: {})",
            Category::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

/// GET /api/movies
/// Public browse surface, optionally narrowed to one category.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let category = query.category.as_deref().map(parse_category).transpose()?;

    let movies = state
        .store()
        .list_movies(category.map(Category::as_str))
        .await?;

    Ok(Json(ApiResponse::success(
        movies.into_iter().map(MovieDto::from).collect(),
    )))
}

/// GET /api/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let movie = state
        .store()
        .get_movie(id)
        .await?
        .ok_or_else(|| ApiError::movie_not_found(id))?;

    Ok(Json(ApiResponse::success(MovieDto::from(movie))))
}

/// POST /api/movies/{id}/download
/// Bump the download counter and return the new value.
pub async fn record_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DownloadCountDto>>, ApiError> {
    let download_count = state
        .store()
        .record_movie_download(id)
        .await?
        .ok_or_else(|| ApiError::movie_not_found(id))?;

    Ok(Json(ApiResponse::success(DownloadCountDto {
        id,
        download_count,
    })))
}

/// POST /api/admin/movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewMovie>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    if payload.title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if payload.download_url.is_empty() {
        return Err(ApiError::validation("Download URL is required"));
    }
    parse_category(&payload.category)?;

    let movie = state.store().add_movie(&payload).await?;

    tracing::info!("Movie added: {} ({})", movie.title, movie.id);

    Ok(Json(ApiResponse::success(MovieDto::from(movie))))
}

/// PUT /api/admin/movies/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<MovieUpdate>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    if let Some(category) = &payload.category {
        parse_category(category)?;
    }
    if let Some(count) = payload.download_count
        && count < 0
    {
        return Err(ApiError::validation("Download count cannot be negative"));
    }

    let movie = state
        .store()
        .update_movie(id, &payload)
        .await?
        .ok_or_else(|| ApiError::movie_not_found(id))?;

    Ok(Json(ApiResponse::success(MovieDto::from(movie))))
}

/// DELETE /api/admin/movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let removed = state.store().remove_movie(id).await?;

    if !removed {
        return Err(ApiError::movie_not_found(id));
    }

    tracing::info!("Movie removed: {id}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Movie {id} deleted"),
    })))
}

/// GET /api/admin/stats
/// Download totals behind the admin analytics view.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CatalogStats>>, ApiError> {
    let stats = state.store().movie_stats().await?;

    Ok(Json(ApiResponse::success(stats)))
}
