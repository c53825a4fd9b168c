use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Demo rows so a fresh deployment has something to browse.
/// (title, description, image, download base, category, year, rating, has 4k)
const DEMO_MOVIES: &[(&str, &str, &str, &str, &str, &str, &str, bool)] = &[
    (
        "The Dark Knight",
        "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, \
         Batman must accept one of the greatest psychological and physical tests of his ability \
         to fight injustice.",
        "https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM0NF5BMl5BanBnXkFtZTcwODAyMTk2Mw@@._V1_.jpg",
        "https://example.com/movies/dark-knight",
        "Action",
        "2008",
        "9.0/10",
        false,
    ),
    (
        "Inception",
        "A thief who steals corporate secrets through the use of dream-sharing technology is \
         given the inverse task of planting an idea into the mind of a C.E.O.",
        "https://m.media-amazon.com/images/M/MV5BMjAxMzY3NjcxNF5BMl5BanBnXkFtZTcwNTI5OTM0Mw@@._V1_.jpg",
        "https://example.com/movies/inception",
        "Thriller",
        "2010",
        "8.8/10",
        true,
    ),
    (
        "The Shawshank Redemption",
        "Two imprisoned men bond over a number of years, finding solace and eventual redemption \
         through acts of common decency.",
        "https://m.media-amazon.com/images/M/MV5BMDFkYTc0MGEtZmNhMC00ZDIzLWFmNTEtODM1ZmRlYWMwMWFmXkEyXkFqcGdeQXVyMTMxODk2OTU@._V1_.jpg",
        "https://example.com/movies/shawshank-redemption",
        "Drama",
        "1994",
        "9.3/10",
        false,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Sessions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        use crate::entities::movies::Column;

        for (title, description, image_url, base_url, category, year, rating, has_4k) in
            DEMO_MOVIES
        {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Movies)
                .columns([
                    Column::Title,
                    Column::Description,
                    Column::ImageUrl,
                    Column::DownloadUrl,
                    Column::DownloadUrl480p,
                    Column::DownloadUrl720p,
                    Column::DownloadUrl1080p,
                    Column::DownloadUrl2160p,
                    Column::Category,
                    Column::DownloadCount,
                    Column::Language,
                    Column::ReleaseYear,
                    Column::Rating,
                ])
                .values_panic([
                    (*title).into(),
                    (*description).into(),
                    (*image_url).into(),
                    (*base_url).into(),
                    format!("{base_url}/480p").into(),
                    format!("{base_url}/720p").into(),
                    format!("{base_url}/1080p").into(),
                    has_4k.then(|| format!("{base_url}/2160p")).into(),
                    (*category).into(),
                    0i64.into(),
                    "English".into(),
                    (*year).into(),
                    (*rating).into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
