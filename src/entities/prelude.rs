pub use super::movies::Entity as Movies;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
