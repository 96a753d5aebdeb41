//! Publishing the merged site to the hosting branch.
//!
//! The hosting working tree is wiped (minus a protected set), refilled
//! from the merged output folder, and force-pushed as a single-commit
//! history: the hosting branch carries no useful history and re-initing
//! keeps it from growing without bound.

use std::fs;
use std::path::Path;

use docship_config::SiteConfig;
use docship_exec::git;
use docship_sources::copy_tree;
use tracing::info;

use crate::DeployError;

/// Committer identity used for publish commits.
const PUBLISH_IDENTITY: (&str, &str) = ("docship", "docship@localhost");

/// Remote name the publish push goes through.
const PUBLISH_REMOTE: &str = "origin-pages";

/// Ensure `pages_folder` holds a checkout of the hosting branch.
///
/// Clones the hosting branch (single-branch, shallow) when the folder has
/// no checkout yet; an existing checkout is reused as-is. The clone is what
/// carries protected files (CNAME and friends) into the publish.
pub fn checkout_hosting(
    site: &SiteConfig,
    repo_url: &str,
    pages_folder: &Path,
) -> Result<(), DeployError> {
    if pages_folder.join(".git").exists() {
        return Ok(());
    }

    info!(
        "cloning {} into {}",
        site.hosting_branch,
        pages_folder.display()
    );
    let dest = pages_folder.to_string_lossy();
    git::clone_branch(repo_url, &site.hosting_branch, &dest, Path::new("."))?;
    Ok(())
}

/// Replace the hosting working tree at `pages_folder` with the contents of
/// `output_folder` and force-push it to the hosting branch.
///
/// `token` authenticates the push; it is embedded in the remote URL and
/// never logged. Any failing step aborts the publish with no rollback.
pub fn publish(
    site: &SiteConfig,
    repo_url: &str,
    output_folder: &Path,
    pages_folder: &Path,
    token: &str,
) -> Result<(), DeployError> {
    if !output_folder.is_dir() {
        return Err(DeployError::MissingTree(output_folder.to_path_buf()));
    }
    fs::create_dir_all(pages_folder)?;

    info!("replacing hosting tree at {}", pages_folder.display());
    clean_working_tree(pages_folder, &site.protected_files)?;
    copy_tree(output_folder, pages_folder)?;

    // Single-commit history: drop whatever history the tree carried
    let git_dir = pages_folder.join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(&git_dir)?;
    }

    git::init(pages_folder)?;
    git::checkout_new_branch(&site.hosting_branch, pages_folder)?;
    git::add_all(pages_folder)?;
    let (name, email) = PUBLISH_IDENTITY;
    git::commit_as(name, email, "Deploy documentation site", pages_folder)?;
    git::remote_add(
        PUBLISH_REMOTE,
        &authenticated_url(repo_url, token),
        pages_folder,
    )?;

    info!("pushing {} to {}", site.hosting_branch, PUBLISH_REMOTE);
    git::push_force(PUBLISH_REMOTE, &site.hosting_branch, pages_folder)?;
    Ok(())
}

/// Remove everything from the working tree except the protected set.
fn clean_working_tree(pages_folder: &Path, protected: &[String]) -> Result<(), DeployError> {
    for entry in fs::read_dir(pages_folder)? {
        let entry = entry?;
        let name = entry.file_name();
        if protected.iter().any(|keep| keep.as_str() == name) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Embed the publish credential into the remote URL.
fn authenticated_url(repo_url: &str, token: &str) -> String {
    match repo_url.split_once("://") {
        Some((scheme, rest)) => format!("{scheme}://{token}@{rest}"),
        None => repo_url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docship_config::SiteConfig;
    use docship_exec::run;

    fn seed_output(output: &Path) {
        for slug in ["2.0", "1"] {
            let root = output.join(slug);
            fs::create_dir_all(&root).unwrap();
            fs::write(root.join("index.html"), format!("<html>{slug}</html>")).unwrap();
        }
    }

    #[test]
    fn publish_replaces_hosting_tree_and_pushes() {
        let root = tempfile::tempdir().unwrap();
        run(
            "git",
            &["init", "--bare", "-b", "gh-pages", "hosted.git"],
            Some(root.path()),
        )
        .unwrap();
        let remote = root.path().join("hosted.git");

        let output = root.path().join("output");
        seed_output(&output);

        let pages = root.path().join("pages");
        fs::create_dir_all(pages.join("stale_dir")).unwrap();
        fs::write(pages.join("CNAME"), "docs.example.io\n").unwrap();
        fs::write(pages.join("stale.html"), "old").unwrap();
        fs::write(pages.join("stale_dir/old.html"), "old").unwrap();

        publish(
            &SiteConfig::default(),
            remote.to_str().unwrap(),
            &output,
            &pages,
            "unused-token",
        )
        .unwrap();

        // Working tree: protected file kept, stale contents replaced
        assert_eq!(
            fs::read_to_string(pages.join("CNAME")).unwrap(),
            "docs.example.io\n"
        );
        assert!(!pages.join("stale.html").exists());
        assert!(!pages.join("stale_dir").exists());
        assert!(pages.join("2.0/index.html").exists());

        // Hosting branch received the merged tree
        let listed = run(
            "git",
            &["ls-tree", "-r", "--name-only", "gh-pages"],
            Some(&remote),
        )
        .unwrap();
        assert!(listed.contains("2.0/index.html"));
        assert!(listed.contains("1/index.html"));
        assert!(listed.contains("CNAME"));
        assert!(!listed.contains("stale.html"));
    }

    #[test]
    fn checkout_hosting_clones_the_hosting_branch() {
        let root = tempfile::tempdir().unwrap();
        run(
            "git",
            &["init", "--bare", "-b", "gh-pages", "hosted.git"],
            Some(root.path()),
        )
        .unwrap();
        let remote = root.path().join("hosted.git");

        // Seed the hosting branch with a protected file
        let work = root.path().join("work");
        fs::create_dir_all(&work).unwrap();
        run("git", &["init", "-b", "gh-pages", "."], Some(&work)).unwrap();
        fs::write(work.join("CNAME"), "docs.example.io\n").unwrap();
        docship_exec::git::add_all(&work).unwrap();
        docship_exec::git::commit_as("t", "t@example.com", "seed", &work).unwrap();
        docship_exec::git::remote_add("origin", remote.to_str().unwrap(), &work).unwrap();
        docship_exec::git::push_force("origin", "gh-pages", &work).unwrap();

        let pages = root.path().join("pages");
        checkout_hosting(&SiteConfig::default(), remote.to_str().unwrap(), &pages).unwrap();

        assert_eq!(
            fs::read_to_string(pages.join("CNAME")).unwrap(),
            "docs.example.io\n"
        );

        // An existing checkout is reused, not re-cloned
        checkout_hosting(&SiteConfig::default(), remote.to_str().unwrap(), &pages).unwrap();
    }

    #[test]
    fn publish_requires_the_output_tree() {
        let root = tempfile::tempdir().unwrap();
        let err = publish(
            &SiteConfig::default(),
            "https://github.com/example/docs.git",
            &root.path().join("missing"),
            &root.path().join("pages"),
            "token",
        )
        .unwrap_err();
        assert!(matches!(err, DeployError::MissingTree(_)));
    }

    #[test]
    fn authenticated_url_embeds_the_token() {
        assert_eq!(
            authenticated_url("https://github.com/example/docs.git", "s3cret"),
            "https://s3cret@github.com/example/docs.git"
        );
        // Local paths (tests, mirrors) pass through untouched
        assert_eq!(authenticated_url("/srv/docs.git", "s3cret"), "/srv/docs.git");
    }
}
