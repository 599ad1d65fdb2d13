//! Terminal UI: state owner, panels, modals and rendering

pub mod components;
mod app;
mod forms;
mod input;
mod org_tree;
mod role_form;
mod user_form;
mod user_list;

pub use app::{App, AppEvent, AppSettings, Focus};
pub use input::{InputMode, KeyBindings, Nav};
pub use user_form::UserField;
pub use user_list::DEFAULT_PAGE_SIZE;
