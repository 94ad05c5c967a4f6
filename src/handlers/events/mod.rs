pub mod favorites;

pub use favorites::{favorite_post, favorites_get};
