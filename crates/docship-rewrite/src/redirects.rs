//! Redirect-page rewriting for relocated versions.
//!
//! When a version moves to a new publish path, every generated page under
//! the old path is replaced in place with a small redirect document that
//! forwards the visitor (meta refresh) to the equivalent page under the new
//! slug. Two addressing modes exist: an absolute destination built from the
//! public site URL, and a relative destination computed against the page's
//! own location so the tree works from any host.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::{RewriteError, html_files, url_path};

/// Render the redirect document for one destination.
///
/// The canonical link is only emitted in absolute mode; a relative
/// canonical URL would be meaningless to crawlers.
fn redirect_page(destination: &str, canonical: bool) -> String {
    let canonical_line = if canonical {
        format!("        <link rel=\"canonical\" href=\"{destination}\">\n")
    } else {
        String::new()
    };
    format!(
        "\n<!DOCTYPE HTML>\n<html lang=\"en-US\">\n    <head>\n        \
         <meta charset=\"UTF-8\">\n        \
         <meta http-equiv=\"refresh\" content=\"1; url={destination}\">\n\
         {canonical_line}    </head>\n</html>\n"
    )
}

/// Replace every page under `html_root` with an absolute redirect to
/// `<url_prefix>/<new_slug>/<relative path>`.
///
/// Returns the number of rewritten pages. Re-running over an already
/// rewritten tree produces identical output.
///
/// # Errors
///
/// [`RewriteError::MissingRoot`] if `html_root` does not exist; I/O errors
/// are fatal, the pass does not continue past them.
pub fn write_absolute_redirects(
    html_root: &Path,
    url_prefix: &str,
    new_slug: &str,
) -> Result<usize, RewriteError> {
    if !html_root.exists() {
        return Err(RewriteError::MissingRoot(html_root.to_path_buf()));
    }

    let prefix = url_prefix.trim_end_matches('/');
    let mut rewritten = 0;
    for file in html_files(html_root)? {
        let relative = file.strip_prefix(html_root).unwrap_or(&file);
        let destination = format!("{prefix}/{new_slug}/{}", url_path(relative));
        debug!("redirecting {} -> {destination}", file.display());
        fs::write(&file, redirect_page(&destination, true))?;
        rewritten += 1;
    }

    info!(
        "wrote {rewritten} absolute redirects under {}",
        html_root.display()
    );
    Ok(rewritten)
}

/// Replace every page under `html_root` with a redirect computed relative
/// to the page's own directory under `old_slug`, pointing at the same page
/// under `new_slug`.
///
/// Returns the number of rewritten pages.
///
/// # Errors
///
/// [`RewriteError::MissingRoot`] if `html_root` does not exist.
pub fn write_relative_redirects(
    html_root: &Path,
    old_slug: &str,
    new_slug: &str,
) -> Result<usize, RewriteError> {
    if !html_root.exists() {
        return Err(RewriteError::MissingRoot(html_root.to_path_buf()));
    }

    let mut rewritten = 0;
    for file in html_files(html_root)? {
        let relative = file.strip_prefix(html_root).unwrap_or(&file);
        let origin_dir = Path::new(old_slug).join(relative.parent().unwrap_or(Path::new("")));
        let destination = Path::new(new_slug).join(relative);
        let target = relative_path(&origin_dir, &destination);
        debug!("redirecting {} -> {target}", file.display());
        fs::write(&file, redirect_page(&target, false))?;
        rewritten += 1;
    }

    info!(
        "wrote {rewritten} relative redirects under {}",
        html_root.display()
    );
    Ok(rewritten)
}

/// Lexical relative path from directory `from` to path `to`.
///
/// Both inputs are relative publish paths; no filesystem access happens.
fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts = Vec::with_capacity(from.len() - common + to.len() - common);
    for _ in common..from.len() {
        parts.push("..".to_owned());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    if parts.is_empty() {
        ".".to_owned()
    } else {
        parts.join("/")
    }
}
