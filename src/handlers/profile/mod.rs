pub mod avatar;
pub mod save;
pub mod show;

pub use avatar::avatar_post;
pub use save::profile_save_post;
pub use show::profile_get;
