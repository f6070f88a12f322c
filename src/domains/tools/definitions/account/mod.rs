//! Account-scope tools: user listing and resolution.

mod find_users;
mod list_users;

pub use find_users::FindUsersTool;
pub use list_users::ListUsersTool;
