pub mod prelude;

pub mod movies;
pub mod sessions;
pub mod users;
