//! Helper functions for page output
//!
//! URL generation, HTML snippets and date handling shared by the
//! renderer and the generator.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
