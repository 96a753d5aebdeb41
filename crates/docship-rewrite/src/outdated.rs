//! Outdated-version banner injection.
//!
//! Version templates ship a banner wrapped in a delimited HTML comment.
//! For every page of a non-latest version that still exists in the latest
//! version's tree, the commented block is activated: the link token inside
//! it is substituted with the page's own path and the comment markers are
//! dropped, leaving live markup.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docship_config::VersionRegistry;
use regex::Regex;
use tracing::{debug, info};

use crate::{RewriteError, html_files, url_path};

/// Opening marker of the commented banner block (byte-exact template
/// contract).
pub const PLACEHOLDER_BEGIN: &str = "<!--@ OUTDATED_VERSION_PLACEHOLDER_BEGIN @";

/// Closing marker of the commented banner block.
pub const PLACEHOLDER_END: &str = "@ OUTDATED_VERSION_PLACEHOLDER_END @-->";

/// Link token inside the block, substituted with the page's path under the
/// latest version.
const LATEST_PAGE_TOKEN: &str = "/@LATEST_DOC_PAGE_URL@";

/// Pages that never get a banner.
const IGNORED_PAGES: &[&str] = &["404.html", "search.html"];

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<!--@ OUTDATED_VERSION_PLACEHOLDER_BEGIN @(.*)@ OUTDATED_VERSION_PLACEHOLDER_END @-->",
    )
    .unwrap()
});

/// Inject "view latest" banners into one published version.
///
/// `branch` identifies the version just built; only branches of the
/// current major series (`series_prefix`) participate. `latest_tree_slug`
/// names the published tree of the latest version to compare against
/// (usually the bare-major alias). Returns the number of pages rewritten.
///
/// Pages whose template carries no placeholder are skipped silently; a
/// placeholder that opens but never closes is an error, since silently
/// shipping the commented-out banner would mask a template regression.
pub fn inject_banners(
    registry: &VersionRegistry,
    pages_folder: &Path,
    branch: &str,
    series_prefix: &str,
    latest_tree_slug: &str,
) -> Result<usize, RewriteError> {
    if !branch.starts_with(series_prefix) {
        debug!("{branch} is not part of the {series_prefix} series, no banners");
        return Ok(0);
    }

    let slug = registry
        .slug_for_branch(branch)
        .ok_or_else(|| RewriteError::UnknownBranch(branch.to_owned()))?;
    if slug == registry.latest_slug() {
        debug!("{branch} is the latest version, no banners");
        return Ok(0);
    }

    let latest_root = pages_folder.join(latest_tree_slug);
    let latest_pages: HashSet<PathBuf> = html_files(&latest_root)?
        .into_iter()
        .map(|path| path.strip_prefix(&latest_root).unwrap_or(&path).to_path_buf())
        .collect();

    let target_root = pages_folder.join(slug);
    let mut rewritten = 0;
    for file in html_files(&target_root)? {
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if IGNORED_PAGES.contains(&name) {
            continue;
        }

        let relative = file.strip_prefix(&target_root).unwrap_or(&file).to_path_buf();
        if !latest_pages.contains(&relative) {
            continue;
        }

        if activate_banner(&file, &relative)? {
            rewritten += 1;
        }
    }

    info!("injected {rewritten} outdated-version banners for {slug}");
    Ok(rewritten)
}

/// Activate the banner block in one page, if the page carries one.
fn activate_banner(file: &Path, relative: &Path) -> Result<bool, RewriteError> {
    let content = fs::read_to_string(file)?;
    if !content.contains(PLACEHOLDER_BEGIN) {
        return Ok(false);
    }

    let Some(captures) = PLACEHOLDER_RE.captures(&content) else {
        return Err(RewriteError::UnterminatedPlaceholder(file.to_path_buf()));
    };

    // Site-absolute path of the page under the latest version's tree
    let latest_link = format!("/{}", url_path(relative));
    debug!("activating banner in {} -> {latest_link}", file.display());

    let block = captures.get(0).map_or("", |m| m.as_str());
    let live = captures
        .get(1)
        .map_or("", |m| m.as_str())
        .replace(LATEST_PAGE_TOKEN, &latest_link);
    fs::write(file, content.replace(block, &live))?;
    Ok(true)
}
