use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: String,

    pub image_url: String,

    /// JSON array of screenshot URLs, ordered as submitted.
    pub screenshots: Option<String>,

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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
