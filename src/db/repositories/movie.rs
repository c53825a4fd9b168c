use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::movies;
use crate::models::movie::{
    CatalogStats, CategoryDownloads, Movie, MovieUpdate, NewMovie, TopMovie,
};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movies::Model) -> Movie {
        Movie {
            id: model.id,
            title: model.title,
            description: model.description,
            image_url: model.image_url,
            screenshots: model
                .screenshots
                .and_then(|s| serde_json::from_str(&s).ok()),
            download_url: model.download_url,
            download_url_480p: model.download_url_480p,
            download_url_720p: model.download_url_720p,
            download_url_1080p: model.download_url_1080p,
            download_url_2160p: model.download_url_2160p,
            file_size_480p: model.file_size_480p,
            file_size_720p: model.file_size_720p,
            file_size_1080p: model.file_size_1080p,
            file_size_2160p: model.file_size_2160p,
            category: model.category,
            download_count: model.download_count,
            language: model.language,
            release_year: model.release_year,
            rating: model.rating,
        }
    }

    pub async fn add(&self, movie: &NewMovie) -> Result<Movie> {
        let active = movies::ActiveModel {
            title: Set(movie.title.clone()),
            description: Set(movie.description.clone()),
            image_url: Set(movie.image_url.clone()),
            screenshots: Set(movie
                .screenshots
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok())),
            download_url: Set(movie.download_url.clone()),
            download_url_480p: Set(movie.download_url_480p.clone()),
            download_url_720p: Set(movie.download_url_720p.clone()),
            download_url_1080p: Set(movie.download_url_1080p.clone()),
            download_url_2160p: Set(movie.download_url_2160p.clone()),
            file_size_480p: Set(movie.file_size_480p.clone()),
            file_size_720p: Set(movie.file_size_720p.clone()),
            file_size_1080p: Set(movie.file_size_1080p.clone()),
            file_size_2160p: Set(movie.file_size_2160p.clone()),
            category: Set(movie.category.clone()),
            download_count: Set(0),
            language: Set(movie.language.clone()),
            release_year: Set(movie.release_year.clone()),
            rating: Set(movie.rating.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let movie = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        Ok(movie.map(Self::map_model))
    }

    /// List the catalog, newest first, optionally narrowed to one category.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Movie>> {
        let mut query = movies::Entity::find().order_by_desc(movies::Column::Id);

        if let Some(category) = category {
            query = query.filter(movies::Column::Category.eq(category));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Apply an administrative edit. Absent fields keep their stored value.
    /// Returns `None` for an unknown id.
    pub async fn update(&self, id: i32, update: &MovieUpdate) -> Result<Option<Movie>> {
        let Some(existing) = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie for update")?
        else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = existing.into();

        if let Some(title) = &update.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &update.description {
            active.description = Set(description.clone());
        }
        if let Some(image_url) = &update.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(screenshots) = &update.screenshots {
            active.screenshots = Set(serde_json::to_string(screenshots).ok());
        }
        if let Some(download_url) = &update.download_url {
            active.download_url = Set(download_url.clone());
        }
        if let Some(url) = &update.download_url_480p {
            active.download_url_480p = Set(url.clone());
        }
        if let Some(url) = &update.download_url_720p {
            active.download_url_720p = Set(url.clone());
        }
        if let Some(url) = &update.download_url_1080p {
            active.download_url_1080p = Set(url.clone());
        }
        if let Some(url) = &update.download_url_2160p {
            active.download_url_2160p = Set(url.clone());
        }
        if let Some(size) = &update.file_size_480p {
            active.file_size_480p = Set(size.clone());
        }
        if let Some(size) = &update.file_size_720p {
            active.file_size_720p = Set(size.clone());
        }
        if let Some(size) = &update.file_size_1080p {
            active.file_size_1080p = Set(size.clone());
        }
        if let Some(size) = &update.file_size_2160p {
            active.file_size_2160p = Set(size.clone());
        }
        if let Some(category) = &update.category {
            active.category = Set(category.clone());
        }
        if let Some(count) = update.download_count {
            active.download_count = Set(count);
        }
        if let Some(language) = &update.language {
            active.language = Set(language.clone());
        }
        if let Some(year) = &update.release_year {
            active.release_year = Set(year.clone());
        }
        if let Some(rating) = &update.rating {
            active.rating = Set(rating.clone());
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update movie")?;

        Ok(Some(Self::map_model(model)))
    }

    /// Returns true when a row was actually deleted.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = movies::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete movie")?;

        Ok(result.rows_affected > 0)
    }

    /// Increment the download counter in place and return the new value.
    /// The single-statement increment keeps the counter monotonic under
    /// concurrent downloads. Returns `None` for an unknown id.
    pub async fn record_download(&self, id: i32) -> Result<Option<i64>> {
        let result = movies::Entity::update_many()
            .col_expr(
                movies::Column::DownloadCount,
                Expr::col(movies::Column::DownloadCount).add(1),
            )
            .filter(movies::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment download count")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let count = movies::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to re-read download count")?
            .map(|m| m.download_count);

        Ok(count)
    }

    /// Aggregate download totals for the admin analytics view. The catalog
    /// is bounded (low thousands of rows), so this folds in memory rather
    /// than pushing GROUP BY into the store.
    pub async fn stats(&self) -> Result<CatalogStats> {
        let rows = movies::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to load movies for stats")?;

        let total_movies = rows.len();
        let total_downloads: i64 = rows.iter().map(|m| m.download_count).sum();

        let mut by_downloads: Vec<&movies::Model> = rows.iter().collect();
        by_downloads.sort_by_key(|m| std::cmp::Reverse(m.download_count));
        let top_movies = by_downloads
            .iter()
            .take(5)
            .map(|m| TopMovie {
                id: m.id,
                title: m.title.clone(),
                download_count: m.download_count,
            })
            .collect();

        let mut category_downloads: Vec<CategoryDownloads> = Vec::new();
        for movie in &rows {
            match category_downloads
                .iter_mut()
                .find(|c| c.category == movie.category)
            {
                Some(entry) => entry.downloads += movie.download_count,
                None => category_downloads.push(CategoryDownloads {
                    category: movie.category.clone(),
                    downloads: movie.download_count,
                }),
            }
        }

        Ok(CatalogStats {
            total_movies,
            total_downloads,
            top_movies,
            category_downloads,
        })
    }
}
