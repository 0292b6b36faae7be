//! HTML page handlers.

mod display;
mod home;
mod not_found;

pub use display::display_handler;
pub use home::{SubmitForm, home_handler, submit_handler};
pub use not_found::not_found_page;
