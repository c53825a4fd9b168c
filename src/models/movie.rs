use serde::{Deserialize, Deserializer, Serialize};

/// Fixed set of browsable catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Action,
    Comedy,
    Drama,
    Mystery,
    Adventure,
    Romance,
    Thriller,
    Bollywood,
    South,
    #[serde(rename = "Web Series")]
    WebSeries,
}

impl Category {
    pub const ALL: &'static [Self] = &[
        Self::Action,
        Self::Comedy,
        Self::Drama,
        Self::Mystery,
        Self::Adventure,
        Self::Romance,
        Self::Thriller,
        Self::Bollywood,
        Self::South,
        Self::WebSeries,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Mystery => "Mystery",
            Self::Adventure => "Adventure",
            Self::Romance => "Romance",
            Self::Thriller => "Thriller",
            Self::Bollywood => "Bollywood",
            Self::South => "South",
            Self::WebSeries => "Web Series",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub screenshots: Option<Vec<String>>,
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

/// Input for catalog inserts. The id and download counter are assigned by
/// the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub screenshots: Option<Vec<String>>,
    pub download_url: String,
    #[serde(default)]
    pub download_url_480p: Option<String>,
    #[serde(default)]
    pub download_url_720p: Option<String>,
    #[serde(default)]
    pub download_url_1080p: Option<String>,
    #[serde(default)]
    pub download_url_2160p: Option<String>,
    #[serde(default)]
    pub file_size_480p: Option<String>,
    #[serde(default)]
    pub file_size_720p: Option<String>,
    #[serde(default)]
    pub file_size_1080p: Option<String>,
    #[serde(default)]
    pub file_size_2160p: Option<String>,
    pub category: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

fn default_language() -> String {
    "English".to_string()
}

/// Distinguishes an absent field (leave untouched) from an explicit null
/// (clear the column) on nullable update fields.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Partial update applied by administrative edits. Absent fields are left
/// untouched; `download_count` may only move through here or the download
/// endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub screenshots: Option<Vec<String>>,
    pub download_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub download_url_480p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub download_url_720p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub download_url_1080p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub download_url_2160p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_size_480p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_size_720p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_size_1080p: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_size_2160p: Option<Option<String>>,
    pub category: Option<String>,
    pub download_count: Option<i64>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_year: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<String>>,
}

/// Aggregates behind the admin analytics view.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_movies: usize,
    pub total_downloads: i64,
    pub top_movies: Vec<TopMovie>,
    pub category_downloads: Vec<CategoryDownloads>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopMovie {
    pub id: i32,
    pub title: String,
    pub download_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDownloads {
    pub category: String,
    pub downloads: i64,
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn category_round_trips_through_names() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(*cat));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(Category::parse("Documentary"), None);
        assert_eq!(Category::parse("action"), None);
    }
}
