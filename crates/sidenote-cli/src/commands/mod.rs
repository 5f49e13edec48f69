pub mod add;
pub mod common;
pub mod completions;
pub mod delete;
pub mod keys;
pub mod list;
pub mod navigate;
pub mod pin;
