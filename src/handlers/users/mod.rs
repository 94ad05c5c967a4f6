pub mod follow;
pub mod following;
pub mod search;
pub mod show;
pub mod utils;

pub use follow::{follow_delete, follow_post};
pub use following::following_get;
pub use search::search_get;
pub use show::user_get;
