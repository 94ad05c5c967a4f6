pub mod guard;
pub mod response;
pub mod session;

pub use guard::{decide, guard_middleware, GuardDecision, SessionPresence};
pub use response::{ApiResponse, ApiResult};
pub use session::{optional_user, require_user, CurrentUser};
