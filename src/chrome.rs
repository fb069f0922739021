//! Page chrome: navigation highlighting, the mobile drawer and language menus.

mod drawer;
mod lang_menu;
mod nav;

pub use drawer::*;
pub use lang_menu::*;
pub use nav::*;

#[cfg(test)]
mod tests;
