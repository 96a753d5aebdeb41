//! Source materialization for the docship pipeline.
//!
//! Turns the version registry into one isolated working tree per slug: a
//! bare clone of the documentation repository plus a `git worktree` per
//! branch. Trees for different slugs never share a directory.
//!
//! Also home to [`copy_tree`] (the pipeline's recursive tree copy) and
//! [`branches_to_build`] (the incremental-build shortcut).

use std::fs;
use std::path::Path;

use docship_config::VersionRegistry;
use docship_exec::{ExecError, git};
use tracing::info;

/// Directory inside the sources folder holding the bare clone.
const MIRROR_DIR: &str = "tmp";

/// Directory inside the sources folder that receives generated trees.
const OUTPUT_DIR: &str = "output";

/// Error from source materialization.
#[derive(Debug, thiserror::Error)]
pub enum SourcesError {
    /// An external git command failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested branch is not in the version registry.
    #[error("branch '{0}' is not in the version registry")]
    UnknownBranch(String),
}

/// Materialize a working tree for every registry entry.
///
/// Bare-clones `repo_url` into `<sources_folder>/tmp`, then fetches each
/// branch and adds `<sources_folder>/<slug>` as a worktree. `skip_slug`
/// (the bare-major alias, when configured) is not checked out; its tree is
/// produced later by a copy. Creates `<sources_folder>/output` for
/// generated HTML.
pub fn materialize(
    registry: &VersionRegistry,
    repo_url: &str,
    sources_folder: &Path,
    skip_slug: Option<&str>,
) -> Result<(), SourcesError> {
    fs::create_dir_all(sources_folder)?;

    info!("cloning {repo_url} into {MIRROR_DIR}");
    git::clone_bare(repo_url, MIRROR_DIR, sources_folder)?;

    let mirror = sources_folder.join(MIRROR_DIR);
    for entry in registry {
        if skip_slug == Some(entry.slug.as_str()) {
            continue;
        }
        checkout_worktree(&mirror, &entry.slug, &entry.branch)?;
    }

    fs::create_dir_all(sources_folder.join(OUTPUT_DIR))?;
    Ok(())
}

/// Materialize the working tree for a single branch.
///
/// Expects the bare clone from a prior [`materialize`] run; used by
/// incremental rebuilds of one version.
pub fn materialize_branch(
    registry: &VersionRegistry,
    sources_folder: &Path,
    branch: &str,
) -> Result<(), SourcesError> {
    let slug = registry
        .slug_for_branch(branch)
        .ok_or_else(|| SourcesError::UnknownBranch(branch.to_owned()))?;

    let mirror = sources_folder.join(MIRROR_DIR);
    checkout_worktree(&mirror, slug, branch)?;
    fs::create_dir_all(sources_folder.join(OUTPUT_DIR))?;
    Ok(())
}

fn checkout_worktree(mirror: &Path, slug: &str, branch: &str) -> Result<(), SourcesError> {
    info!("materializing {slug} from {branch}");
    git::fetch_branch(branch, mirror)?;
    let worktree = format!("../{slug}");
    git::worktree_add(&worktree, branch, mirror)?;
    Ok(())
}

/// Which branches need rebuilding after the current commit.
///
/// A change under `.ci/`, or under `_themes/` while on the main branch,
/// invalidates every published version; anything else rebuilds only the
/// branch the commit landed on (`current_branch`, typically from the CI
/// environment).
pub fn branches_to_build(
    registry: &VersionRegistry,
    workdir: &Path,
    current_branch: &str,
    main_branch: &str,
) -> Result<Vec<String>, SourcesError> {
    let head = git::rev_parse("HEAD", workdir)?;
    let previous = git::rev_parse("HEAD^1", workdir)?;
    let changed = git::diff_name_only(&previous, &head, workdir)?;

    let changed_ci = changed.iter().any(|path| path.starts_with(".ci"));
    let changed_theme = changed.iter().any(|path| path.starts_with("_themes"));

    if changed_ci || (changed_theme && current_branch == main_branch) {
        Ok(registry.iter().map(|entry| entry.branch.clone()).collect())
    } else {
        Ok(vec![current_branch.to_owned()])
    }
}

/// Recursively copy the contents of `src` into `dst`.
///
/// `dst` is created if missing; existing files are overwritten.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docship_config::VersionRegistry;
    use docship_exec::run;

    fn registry() -> VersionRegistry {
        VersionRegistry::from_json_str(
            r#"{"2.0": "release/2.0", "2": "release/2.0-alias", "1": "master"}"#,
        )
        .unwrap()
    }

    /// Create an origin repository with a `release/2.0` branch.
    fn seed_origin(dir: &Path) {
        run("git", &["init", "-b", "master", "."], Some(dir)).unwrap();
        run("git", &["config", "user.email", "t@example.com"], Some(dir)).unwrap();
        run("git", &["config", "user.name", "t"], Some(dir)).unwrap();
        fs::write(dir.join("index.rst"), "v1\n").unwrap();
        git::add_all(dir).unwrap();
        git::commit("v1 docs", dir).unwrap();
        git::checkout_new_branch("release/2.0", dir).unwrap();
        fs::write(dir.join("index.rst"), "v2\n").unwrap();
        git::add_all(dir).unwrap();
        git::commit("v2 docs", dir).unwrap();
    }

    #[test]
    fn materialize_creates_one_tree_per_slug() {
        let root = tempfile::tempdir().unwrap();
        let origin = root.path().join("origin");
        fs::create_dir(&origin).unwrap();
        seed_origin(&origin);

        let registry =
            VersionRegistry::from_json_str(r#"{"2.0": "release/2.0", "1": "master"}"#).unwrap();
        let sources = root.path().join("sources");
        materialize(&registry, origin.to_str().unwrap(), &sources, None).unwrap();

        assert_eq!(
            fs::read_to_string(sources.join("2.0/index.rst")).unwrap(),
            "v2\n"
        );
        assert_eq!(
            fs::read_to_string(sources.join("1/index.rst")).unwrap(),
            "v1\n"
        );
        assert!(sources.join("output").is_dir());
    }

    #[test]
    fn materialize_skips_the_alias_slug() {
        let root = tempfile::tempdir().unwrap();
        let origin = root.path().join("origin");
        fs::create_dir(&origin).unwrap();
        seed_origin(&origin);

        let sources = root.path().join("sources");
        materialize(&registry(), origin.to_str().unwrap(), &sources, Some("2")).unwrap();

        assert!(sources.join("2.0").is_dir());
        assert!(!sources.join("2").exists());
    }

    #[test]
    fn materialize_branch_requires_a_registered_branch() {
        let root = tempfile::tempdir().unwrap();
        let err =
            materialize_branch(&registry(), root.path(), "release/9.9").unwrap_err();
        assert!(matches!(err, SourcesError::UnknownBranch(_)));
    }

    #[test]
    fn copy_tree_copies_nested_files() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        fs::create_dir_all(src.join("sub/deep")).unwrap();
        fs::write(src.join("a.html"), "a").unwrap();
        fs::write(src.join("sub/deep/b.html"), "b").unwrap();

        let dst = root.path().join("dst");
        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.html")).unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dst.join("sub/deep/b.html")).unwrap(),
            "b"
        );
    }

    #[test]
    fn ci_change_rebuilds_every_branch() {
        let root = tempfile::tempdir().unwrap();
        seed_origin(root.path());
        fs::create_dir_all(root.path().join(".ci")).unwrap();
        fs::write(root.path().join(".ci/pipeline.yml"), "stages\n").unwrap();
        git::add_all(root.path()).unwrap();
        git::commit("ci change", root.path()).unwrap();

        let branches =
            branches_to_build(&registry(), root.path(), "release/2.0", "master").unwrap();
        assert_eq!(
            branches,
            vec![
                "release/2.0".to_owned(),
                "release/2.0-alias".to_owned(),
                "master".to_owned()
            ]
        );
    }

    #[test]
    fn theme_change_off_main_rebuilds_only_current() {
        let root = tempfile::tempdir().unwrap();
        seed_origin(root.path());
        fs::create_dir_all(root.path().join("_themes")).unwrap();
        fs::write(root.path().join("_themes/layout.html"), "<html>\n").unwrap();
        git::add_all(root.path()).unwrap();
        git::commit("theme change", root.path()).unwrap();

        // HEAD is on release/2.0, not the main branch
        let branches =
            branches_to_build(&registry(), root.path(), "release/2.0", "master").unwrap();
        assert_eq!(branches, vec!["release/2.0".to_owned()]);
    }

    #[test]
    fn content_change_rebuilds_only_current() {
        let root = tempfile::tempdir().unwrap();
        seed_origin(root.path());
        fs::write(root.path().join("guide.rst"), "guide\n").unwrap();
        git::add_all(root.path()).unwrap();
        git::commit("content change", root.path()).unwrap();

        let branches = branches_to_build(&registry(), root.path(), "master", "master").unwrap();
        assert_eq!(branches, vec!["master".to_owned()]);
    }
}
