//! Convert a Markdown document into a styled PDF, falling back to a
//! print-ready HTML file when no PDF renderer is available.

pub mod convert;
pub mod error;
pub mod markdown;
pub mod render;
pub mod template;

pub use convert::ConvertPaths;
pub use convert::Converter;
pub use convert::Report;
pub use error::ConvertError;
