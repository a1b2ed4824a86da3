//! Formatting helpers shared by the content loader and the generator

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
