use serde::Serialize;

use crate::models::movie::Movie;
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub screenshots: Vec<String>,
    pub download_url: String,
    pub download_url_480p: Option<String>,
    pub download_url_720p: Option<String>,
    pub download_url_1080p: Option<String>,
    pub download_url_2160p: Option<String>,
    pub file_size_480p: Option<String>,
    pub file_size_720p: Option<String>,
    pub file_size_1080p: Option<String>,
    pub file_size_2160p: Option<String>,
    pub category: String,
    pub download_count: i64,
    pub language: String,
    pub release_year: Option<String>,
    pub rating: Option<String>,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            image_url: movie.image_url,
            screenshots: movie.screenshots.unwrap_or_default(),
            download_url: movie.download_url,
            download_url_480p: movie.download_url_480p,
            download_url_720p: movie.download_url_720p,
            download_url_1080p: movie.download_url_1080p,
            download_url_2160p: movie.download_url_2160p,
            file_size_480p: movie.file_size_480p,
            file_size_720p: movie.file_size_720p,
            file_size_1080p: movie.file_size_1080p,
            file_size_2160p: movie.file_size_2160p,
            category: movie.category,
            download_count: movie.download_count,
            language: movie.language,
            release_year: movie.release_year,
            rating: movie.rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadCountDto {
    pub id: i32,
    pub download_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
