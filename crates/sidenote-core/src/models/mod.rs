//! Data models for sidenote

mod category;
mod note;

pub use category::Category;
pub use note::{validate_slug, Note, Route, ABOUT_ME_SLUG};
