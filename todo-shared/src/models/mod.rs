/// Database models
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `todo_item`: Todo items, their editable fields and list filters
/// - `timestamp`: Lenient date parsing shared by bodies and query strings

pub mod timestamp;
pub mod todo_item;
pub mod user;
