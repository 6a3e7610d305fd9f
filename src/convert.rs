//! The conversion pipeline: markdown source to a PDF, or to a print-ready
//! HTML page when the PDF attempt fails.

use std::path::Path;
use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use crate::error::ConvertError;
use crate::markdown::Gfm;
use crate::markdown::MarkdownRenderer;
use crate::render::with_chrome::WithChrome;
use crate::render::PdfRenderer;
use crate::template::Template;
use crate::template::DEFAULT_TITLE;

pub const DEFAULT_SOURCE: &str = "PROYECTO_DOCUMENTACION_COMPLETA.md";
pub const DEFAULT_PDF: &str = "PROYECTO_DOCUMENTACION_COMPLETA.pdf";
pub const DEFAULT_HTML: &str = "PROYECTO_DOCUMENTACION_COMPLETA.html";

/// Where the source is read from and where each kind of output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertPaths {
    pub source: PathBuf,
    pub pdf: PathBuf,
    pub html: PathBuf,
}

impl Default for ConvertPaths {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            pdf: PathBuf::from(DEFAULT_PDF),
            html: PathBuf::from(DEFAULT_HTML),
        }
    }
}

impl ConvertPaths {
    /// Outputs next to `source`, named after it.
    pub fn from_source(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        Self {
            pdf: source.with_extension("pdf"),
            html: source.with_extension("html"),
            source,
        }
    }
}

/// Outcome of [`Converter::run`].
#[derive(Debug)]
pub struct Report {
    pub pdf: Result<PathBuf, ConvertError>,
    /// Only attempted when the pdf failed.
    pub html: Option<Result<PathBuf, ConvertError>>,
}

impl Report {
    /// The file that was written, if any.
    pub fn output(&self) -> Option<&Path> {
        match (&self.pdf, &self.html) {
            (Ok(p), _) => Some(p.as_path()),
            (Err(_), Some(Ok(p))) => Some(p.as_path()),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.output().is_some()
    }
}

pub struct Converter<M = Gfm, P = WithChrome> {
    paths: ConvertPaths,
    title: String,
    markdown: M,
    pdf: P,
}

impl Converter {
    pub fn new(paths: ConvertPaths) -> Self {
        Self::with_renderers(paths, Gfm, WithChrome::new())
    }
}

impl<M, P> Converter<M, P>
where
    M: MarkdownRenderer,
    P: PdfRenderer,
{
    pub fn with_renderers(paths: ConvertPaths, markdown: M, pdf: P) -> Self {
        Self {
            paths,
            title: DEFAULT_TITLE.to_string(),
            markdown,
            pdf,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn paths(&self) -> &ConvertPaths {
        &self.paths
    }

    /// Try the pdf; only if that fails, write the html page instead.
    pub async fn run(&self) -> Report {
        let pdf = self.convert_to_pdf().await;
        if pdf.is_ok() {
            return Report { pdf, html: None };
        }

        println!("Falling back to HTML conversion...");
        let html = self.convert_to_html().await;

        Report {
            pdf,
            html: Some(html),
        }
    }

    /// Render the source into the print template and write it as a pdf.
    pub async fn convert_to_pdf(&self) -> Result<PathBuf, ConvertError> {
        let res = self.write_pdf().await;

        match &res {
            Ok(path) => println!("PDF created successfully: {}", path.display()),
            Err(e) => report_failure(e),
        }

        res
    }

    /// Render the source into the screen template and write it as html.
    pub async fn convert_to_html(&self) -> Result<PathBuf, ConvertError> {
        let res = self.write_html().await;

        match &res {
            Ok(path) => {
                println!("HTML file created successfully: {}", path.display());
                println!("You can open it in a browser and print to PDF using Ctrl+P -> Save as PDF");
            }
            Err(e) => report_failure(e),
        }

        res
    }

    /// The complete HTML document for `template`, as it would be rendered
    /// or written.
    pub async fn document(&self, template: Template) -> Result<String, ConvertError> {
        let source = &self.paths.source;

        let markdown = fs::read_to_string(source)
            .await
            .map_err(|e| ConvertError::Read {
                path: source.clone(),
                source: e,
            })?;

        let fragment = self.markdown.to_html(&markdown)?;
        debug!("{} rendered to {} bytes of html", source.display(), fragment.len());

        Ok(template.render(&fragment, &self.title))
    }

    async fn write_pdf(&self) -> Result<PathBuf, ConvertError> {
        let doc = self.document(Template::Print).await?;

        let asset_base = fs::canonicalize(&self.paths.source)
            .await
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));

        let pdf = self.pdf.render_pdf(&doc, asset_base.as_deref()).await?;

        write_output(&self.paths.pdf, &pdf).await?;
        Ok(self.paths.pdf.clone())
    }

    async fn write_html(&self) -> Result<PathBuf, ConvertError> {
        let doc = self.document(Template::Screen).await?;

        write_output(&self.paths.html, doc.as_bytes()).await?;
        Ok(self.paths.html.clone())
    }
}

/// Create or truncate `path` and write `data` to it.
async fn write_output(path: &Path, data: &[u8]) -> Result<(), ConvertError> {
    fs::write(path, data)
        .await
        .map_err(|source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

fn report_failure(e: &ConvertError) {
    debug!("conversion attempt failed: {:?}", e);

    if e.is_missing_capability() {
        println!("{}", e);
    } else {
        println!("Error: {}", e);
    }
}
