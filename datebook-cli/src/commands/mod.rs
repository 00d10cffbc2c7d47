pub mod delete;
pub mod list;
pub mod new;
pub mod repeat;
pub mod stats;
pub mod user;
