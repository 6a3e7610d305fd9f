use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use mdpdf::markdown::Gfm;
use mdpdf::render::with_chrome::WithChrome;
use mdpdf::ConvertPaths;
use mdpdf::Converter;
use tempfile::TempDir;

/// Golden master test configuration
struct GoldenTest {
    name: &'static str,
    input_file: &'static str,
    /// Fragments the output must contain, checked before the golden file.
    expected: &'static [&'static str],
}

/// Struct contains fixtures, golden and debug paths
struct TestPaths {
    fixtures_dir: PathBuf,
    golden_dir: PathBuf,
    debug_dir: PathBuf,
}

/// Helper function to get test paths
fn get_test_paths() -> TestPaths {
    let root_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let fixtures_dir = root_dir.join("tests/fixtures");
    let golden_dir = root_dir.join("tests/golden");
    let debug_dir = root_dir.join("tests/debug");

    // Ensure directories exist
    fs::create_dir_all(&fixtures_dir).unwrap();
    fs::create_dir_all(&golden_dir).unwrap();
    fs::create_dir_all(&debug_dir).unwrap();

    TestPaths {
        fixtures_dir,
        golden_dir,
        debug_dir,
    }
}

/// Convert a fixture with no pdf renderer available and return the html
/// fallback.
async fn convert_fixture(paths: &TestPaths, input_file: &str) -> Result<String> {
    let work = TempDir::new()?;
    let source = work.path().join(input_file);
    fs::copy(paths.fixtures_dir.join(input_file), &source)
        .with_context(|| format!("Failed to copy fixture: {}", input_file))?;

    let convert_paths = ConvertPaths::from_source(&source);
    let chrome = WithChrome::with_executable(work.path().join("no-chrome"));
    let report = Converter::with_renderers(convert_paths.clone(), Gfm, chrome)
        .run()
        .await;

    anyhow::ensure!(report.pdf.is_err(), "pdf should not be produced without chrome");
    anyhow::ensure!(!convert_paths.pdf.exists(), "pdf file should not exist");

    let actual = fs::read_to_string(&convert_paths.html)
        .with_context(|| format!("Fallback html missing: {}", convert_paths.html.display()))?;

    Ok(actual)
}

/// Run a golden master test. Set `UPDATE_GOLDEN=1` to rewrite the golden
/// file from the current output.
async fn run_golden_test(test: &GoldenTest) -> Result<()> {
    let paths = get_test_paths();
    let actual = convert_fixture(&paths, test.input_file).await?;

    for fragment in test.expected {
        anyhow::ensure!(actual.contains(fragment), "output lacks {:?}", fragment);
    }

    // Always save debug copy to tests/debug
    let debug_path = paths.debug_dir.join(format!("{}.actual.html", test.name));
    fs::write(&debug_path, &actual)?;
    println!("🔍 Debug html saved: {}", debug_path.display());

    let golden_path = paths.golden_dir.join(format!("{}.html", test.name));

    if std::env::var_os("UPDATE_GOLDEN").is_some() {
        fs::write(&golden_path, &actual)?;
        println!("✨ Updated golden file: {}", golden_path.display());
        return Ok(());
    }

    let expected = fs::read_to_string(&golden_path).with_context(|| {
        format!(
            "Golden file missing: {}. Run with UPDATE_GOLDEN=1 to create it.",
            golden_path.display()
        )
    })?;

    if expected != actual {
        anyhow::bail!(
            "Output differs from golden file {}. Actual output saved to: {}",
            golden_path.display(),
            debug_path.display()
        );
    }

    println!("✅ Golden test '{}' passed", test.name);
    Ok(())
}

#[tokio::test]
async fn test_structure_document() {
    let test = GoldenTest {
        name: "structure",
        input_file: "structure.md",
        expected: &[
            "<a href=\"#guia-rapida\">Guía rápida</a>",
            "<h2 id=\"instalacion\">Instalación</h2>",
            "<blockquote>",
        ],
    };

    run_golden_test(&test).await.unwrap();
}

#[tokio::test]
async fn test_empty_document() {
    let test = GoldenTest {
        name: "empty",
        input_file: "empty.md",
        expected: &["<body>\n\n</body>"],
    };

    run_golden_test(&test).await.unwrap();
}

/// Highlighted code depends on the bundled syntax definitions, so the
/// sample is checked by fragments only.
#[tokio::test]
async fn test_sample_document() {
    let paths = get_test_paths();
    let actual = convert_fixture(&paths, "sample.md").await.unwrap();

    let expected = [
        "<div class=\"toc\">",
        "<a href=\"#guia-del-proyecto\">Guía del proyecto</a>",
        "<h1 id=\"guia-del-proyecto\">Guía del proyecto</h1>",
        "<h2 id=\"instalacion\">Instalación</h2>",
        "<div class=\"codehilite\"><pre><code class=\"language-bash\"><span class=\"hl-source hl-shell",
        "<div class=\"codehilite\"><pre><code class=\"language-rust\"><span class=\"hl-source hl-rust\">",
        "<blockquote>",
        "<table>",
        "<td>build</td>",
    ];

    for fragment in expected {
        assert!(actual.contains(fragment), "output lacks {:?}", fragment);
    }
}
