pub mod fixtures;
pub mod page;

pub use fixtures::{EditPage, TranslationsPage};
pub use page::{ErrorLogView, PanelView, VirtualPage};

#[cfg(test)]
mod tests;
