use std::io;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;
use tracing::info;
use url::Url;

use crate::error::ConvertError;
use crate::render::PdfRenderer;

const CAPABILITY: &str = "chrome";

/// Prints HTML to PDF with a headless Chrome or Chromium.
#[derive(Debug, Clone, Default)]
pub struct WithChrome {
    /// Use this executable instead of searching for one.
    executable: Option<PathBuf>,
}

impl WithChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(executable.into()),
        }
    }

    /// Print an HTML document to PDF.
    ///
    /// The document is written to a temporary directory and loaded from
    /// there by chrome, so `asset_base` is injected as `<base href>` for
    /// relative links and images to resolve.
    ///
    /// # Returns
    ///
    /// bytes of the PDF file
    pub async fn print_to_pdf(
        &self,
        html: &str,
        asset_base: Option<&Path>,
    ) -> Result<Vec<u8>, ConvertError> {
        let chrome = self.find_chrome_executable().await?;

        let temp_dir = TempDir::new().map_err(|e| ConvertError::Render(e.to_string()))?;
        let cwd = temp_dir.path();

        let input_file_path = Self::create_markup_file(cwd, html, asset_base).await?;
        let pdf_path = cwd.join("output.pdf");

        let mut cmd = Self::build_chrome_print_cmd(&chrome, &input_file_path, &pdf_path, cwd);
        debug!("running {:?} in {}", cmd, cwd.display());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ConvertError::missing(CAPABILITY, format!("{}: {}", chrome.display(), e))
            } else {
                ConvertError::Render(format!("failed to run {}: {}", chrome.display(), e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Render(format!(
                "{} exited with {:?}: {}",
                chrome.display(),
                output.status.code(),
                stderr.trim()
            )));
        }

        let pdf = fs::read(&pdf_path).await.map_err(|e| {
            ConvertError::Render(format!("chrome produced no pdf at {}: {}", pdf_path.display(), e))
        })?;

        if !pdf.starts_with(b"%PDF") {
            return Err(ConvertError::Render(format!(
                "{} is not a pdf file",
                pdf_path.display()
            )));
        }

        info!("chrome printed {} bytes of pdf", pdf.len());

        Ok(pdf)
    }

    /// Setup html context: the base url for relative assets.
    ///
    /// `asset_base` must be absolute; a relative one is ignored.
    fn setup_html_page_context(input: &str, asset_base: Option<&Path>) -> String {
        let Some(base_path) = asset_base else {
            return input.to_string();
        };

        let Ok(base_url) = Url::from_directory_path(base_path) else {
            debug!("asset base {} is not absolute, not setting <base>", base_path.display());
            return input.to_string();
        };

        let base_href = format!(r#"<base href="{}">"#, base_url);

        match input.find("<head>") {
            Some(pos) => {
                let at = pos + "<head>".len();
                let mut html = String::with_capacity(input.len() + base_href.len() + 1);
                html.push_str(&input[..at]);
                html.push('\n');
                html.push_str(&base_href);
                html.push_str(&input[at..]);
                html
            }
            None => format!("{}{}", base_href, input),
        }
    }

    /// Find Chrome executable: the configured one, or one of the common
    /// install locations.
    async fn find_chrome_executable(&self) -> Result<PathBuf, ConvertError> {
        if let Some(path) = &self.executable {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(ConvertError::missing(
                CAPABILITY,
                format!("{} does not exist", path.display()),
            ));
        }

        // Check macOS Chrome path first
        let mac_chrome = Path::new("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if mac_chrome.exists() {
            return Ok(mac_chrome.to_path_buf());
        }

        // Try common Chrome/Chromium names in PATH
        let chrome_names = [
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
            "chrome",
        ];

        for name in &chrome_names {
            if let Ok(output) = Command::new("which").arg(name).output().await {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        debug!("found chrome: {}", path);
                        return Ok(PathBuf::from(path));
                    }
                }
            }
        }

        Err(ConvertError::missing(
            CAPABILITY,
            "Chrome/Chromium executable not found. Please install Chrome or Chromium.",
        ))
    }

    /// Create the html file for chrome to load.
    async fn create_markup_file(
        base_dir: &Path,
        html: &str,
        asset_base: Option<&Path>,
    ) -> Result<PathBuf, ConvertError> {
        let html = Self::setup_html_page_context(html, asset_base);
        let path = base_dir.join("input.html");

        fs::write(&path, html.as_bytes())
            .await
            .map_err(|source| ConvertError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    /// Build a chrome command that prints `input` to `pdf_path`.
    fn build_chrome_print_cmd(chrome: &Path, input: &Path, pdf_path: &Path, cwd: &Path) -> Command {
        let mut cmd = Command::new(chrome);

        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(input)
            .current_dir(cwd)
            .kill_on_drop(true);

        cmd
    }
}

impl PdfRenderer for WithChrome {
    async fn render_pdf(
        &self,
        html: &str,
        asset_base: Option<&Path>,
    ) -> Result<Vec<u8>, ConvertError> {
        self.print_to_pdf(html, asset_base).await
    }
}
