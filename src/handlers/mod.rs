// Handlers are grouped by surface: auth flows, the caller's profile,
// other users, event favorites, and the page view models the route
// guard fronts.
pub mod auth;
pub mod events;
pub mod pages;
pub mod profile;
pub mod users;
