//! Static-site generator driver.
//!
//! Builds one version's HTML (and optionally PDF and per-page JSON
//! fragments) by invoking `sphinx-build` against that version's working
//! tree. The generator itself is external; this crate owns the invocation
//! sequence, the shared-theme refresh and the `versions.json` the generated
//! site reads for its version-switcher UI.

use std::fs;
use std::path::{Path, PathBuf};

use docship_config::{ConfigError, VersionRegistry};
use docship_exec::{ExecError, run};
use docship_sources::copy_tree;
use tracing::info;

/// Directory inside the sources folder that receives generated trees.
const OUTPUT_DIR: &str = "output";

/// Theme directory name inside each version's working tree.
const THEMES_DIR: &str = "_themes";

/// Error from building a version's site.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An external command failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry serialization error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested branch is not in the version registry.
    #[error("branch '{0}' is not in the version registry")]
    UnknownBranch(String),

    /// PDF requested but the latex build produced none.
    #[error("no PDF produced under {}", .0.display())]
    MissingPdf(PathBuf),
}

/// Write `versions.json` into the sources folder.
///
/// The generated site reads this file to populate its version-switcher UI;
/// entry order is preserved (first entry = latest).
pub fn write_versions_json(
    registry: &VersionRegistry,
    sources_folder: &Path,
) -> Result<(), BuildError> {
    registry.save(&sources_folder.join("versions.json"))?;
    Ok(())
}

/// Build one branch's documentation into `<sources_folder>/output/<slug>`.
///
/// Steps: refresh the shared theme from the latest version's tree, generate
/// HTML, generate the per-page JSON fragments the search indexer consumes,
/// and optionally build and copy a PDF.
///
/// # Errors
///
/// Any failing `sphinx-build`/`make` invocation aborts the build with the
/// command line and its output; there is no retry.
pub fn build(
    registry: &VersionRegistry,
    branch: &str,
    sources_folder: &Path,
    with_pdf: bool,
) -> Result<(), BuildError> {
    let slug = registry
        .slug_for_branch(branch)
        .ok_or_else(|| BuildError::UnknownBranch(branch.to_owned()))?;

    refresh_theme(registry, sources_folder, slug)?;

    let doctrees = format!("{slug}/_build/.doctrees");
    let source = format!("{slug}/");
    let html_output = format!("{OUTPUT_DIR}/{slug}");

    info!("building html for {slug}");
    run(
        "sphinx-build",
        &["-W", "-b", "html", "-d", &doctrees, &source, &html_output],
        Some(sources_folder),
    )?;

    let json_output = format!("{slug}/_build/json");
    info!("building search fragments for {slug}");
    run(
        "sphinx-build",
        &["-b", "json", "-d", &doctrees, &source, &json_output],
        Some(sources_folder),
    )?;

    if with_pdf {
        build_pdf(sources_folder, slug)?;
    }

    Ok(())
}

/// Replace the version's theme with the latest version's.
///
/// Old versions always publish with the current theme so the site stays
/// visually consistent across versions.
fn refresh_theme(
    registry: &VersionRegistry,
    sources_folder: &Path,
    slug: &str,
) -> Result<(), BuildError> {
    let latest_slug = registry.latest_slug();
    if slug == latest_slug {
        return Ok(());
    }

    let latest_themes = sources_folder.join(latest_slug).join(THEMES_DIR);
    if !latest_themes.is_dir() {
        return Ok(());
    }

    let target_themes = sources_folder.join(slug).join(THEMES_DIR);
    if target_themes.exists() {
        fs::remove_dir_all(&target_themes)?;
    }
    info!("refreshing theme for {slug} from {latest_slug}");
    copy_tree(&latest_themes, &target_themes)?;
    Ok(())
}

/// Build the latex output, run the PDF make target and copy the result
/// into the published tree.
fn build_pdf(sources_folder: &Path, slug: &str) -> Result<(), BuildError> {
    let doctrees = format!("{slug}/_build/.doctrees");
    let source = format!("{slug}/");
    let latex_output = format!("{slug}/_build/latex");

    info!("building pdf for {slug}");
    run(
        "sphinx-build",
        &["-W", "-b", "latex", "-d", &doctrees, &source, &latex_output],
        Some(sources_folder),
    )?;
    run("make", &["-C", &latex_output, "all-pdf"], Some(sources_folder))?;

    let latex_dir = sources_folder.join(&latex_output);
    let pdf = find_pdf(&latex_dir)?.ok_or(BuildError::MissingPdf(latex_dir))?;
    let file_name = pdf.file_name().unwrap_or_default();
    let destination = sources_folder
        .join(OUTPUT_DIR)
        .join(slug)
        .join(file_name);
    fs::copy(&pdf, &destination)?;
    Ok(())
}

/// First `*.pdf` file directly under `dir`.
fn find_pdf(dir: &Path) -> Result<Option<PathBuf>, std::io::Error> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "pdf") {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
