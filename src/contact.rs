//! Contact form validation and submission, and the feedback popup.

mod form;
mod popup;
mod validate;

pub use form::*;
pub use popup::*;
pub use validate::*;

#[cfg(test)]
mod tests;
