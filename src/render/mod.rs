pub mod with_chrome;

use std::path::Path;

use crate::error::ConvertError;

/// Turns a complete HTML document into PDF bytes.
#[allow(async_fn_in_trait)]
pub trait PdfRenderer {
    /// `asset_base` is the directory relative URLs in `html` resolve against.
    async fn render_pdf(
        &self,
        html: &str,
        asset_base: Option<&Path>,
    ) -> Result<Vec<u8>, ConvertError>;
}
