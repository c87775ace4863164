pub mod user;

pub use user::{Authority, UserRecord};
