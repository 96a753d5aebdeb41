//! Typed wrappers for the git operations the pipeline needs.
//!
//! Each function builds an explicit argument list for [`run`](crate::run);
//! nothing here touches repository internals, this is branch, worktree and
//! publish plumbing against a remote.

use std::path::Path;

use crate::{ExecError, run};

/// `git clone --bare <url> <dest>`.
pub fn clone_bare(repo_url: &str, dest: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["clone", "--bare", repo_url, dest], Some(workdir))?;
    Ok(())
}

/// `git clone --single-branch -b <branch> --depth 1 <url> <dest>`.
pub fn clone_branch(
    repo_url: &str,
    branch: &str,
    dest: &str,
    workdir: &Path,
) -> Result<(), ExecError> {
    run(
        "git",
        &[
            "clone",
            "--single-branch",
            "-b",
            branch,
            "--depth",
            "1",
            repo_url,
            dest,
        ],
        Some(workdir),
    )?;
    Ok(())
}

/// `git fetch origin <branch>:<branch>` — materializes a local branch in a
/// bare repository.
pub fn fetch_branch(branch: &str, workdir: &Path) -> Result<(), ExecError> {
    let refspec = format!("{branch}:{branch}");
    run("git", &["fetch", "origin", &refspec], Some(workdir))?;
    Ok(())
}

/// `git worktree add <path> <branch>`.
pub fn worktree_add(path: &str, branch: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["worktree", "add", path, branch], Some(workdir))?;
    Ok(())
}

/// `git init .`
pub fn init(workdir: &Path) -> Result<(), ExecError> {
    run("git", &["init", "."], Some(workdir))?;
    Ok(())
}

/// `git checkout -b <branch>`.
pub fn checkout_new_branch(branch: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["checkout", "-b", branch], Some(workdir))?;
    Ok(())
}

/// `git add -A .`
pub fn add_all(workdir: &Path) -> Result<(), ExecError> {
    run("git", &["add", "-A", "."], Some(workdir))?;
    Ok(())
}

/// `git commit -m <message>`.
pub fn commit(message: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["commit", "-m", message], Some(workdir))?;
    Ok(())
}

/// `git commit -m <message>` with an explicit committer identity, for
/// environments (CI publish) that have no ambient git config.
pub fn commit_as(
    name: &str,
    email: &str,
    message: &str,
    workdir: &Path,
) -> Result<(), ExecError> {
    let user = format!("user.name={name}");
    let mail = format!("user.email={email}");
    run(
        "git",
        &["-c", &user, "-c", &mail, "commit", "-m", message],
        Some(workdir),
    )?;
    Ok(())
}

/// `git remote add <name> <url>`.
///
/// The URL may embed a credential; callers must not log it.
pub fn remote_add(name: &str, url: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["remote", "add", name, url], Some(workdir))?;
    Ok(())
}

/// `git push <remote> <branch> --force`.
pub fn push_force(remote: &str, branch: &str, workdir: &Path) -> Result<(), ExecError> {
    run("git", &["push", remote, branch, "--force"], Some(workdir))?;
    Ok(())
}

/// `git rev-parse <rev>`, trimmed.
pub fn rev_parse(rev: &str, workdir: &Path) -> Result<String, ExecError> {
    let output = run("git", &["rev-parse", rev], Some(workdir))?;
    Ok(output.trim().to_owned())
}

/// `git diff --name-only <from>..<to>`, one path per line.
pub fn diff_name_only(from: &str, to: &str, workdir: &Path) -> Result<Vec<String>, ExecError> {
    let range = format!("{from}..{to}");
    let output = run("git", &["diff", "--name-only", &range], Some(workdir))?;
    Ok(output.lines().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Initialize a repository with one commit in `dir`.
    fn init_repo(dir: &Path) {
        init(dir).unwrap();
        run("git", &["config", "user.email", "t@example.com"], Some(dir)).unwrap();
        run("git", &["config", "user.name", "t"], Some(dir)).unwrap();
        fs::write(dir.join("index.rst"), "hello\n").unwrap();
        add_all(dir).unwrap();
        commit("initial", dir).unwrap();
    }

    #[test]
    fn rev_parse_returns_trimmed_hash() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let hash = rev_parse("HEAD", dir.path()).unwrap();
        assert_eq!(hash.len(), 40);
        assert!(!hash.ends_with('\n'));
    }

    #[test]
    fn diff_name_only_lists_changed_paths() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("changed.rst"), "more\n").unwrap();
        add_all(dir.path()).unwrap();
        commit("second", dir.path()).unwrap();

        let changed = diff_name_only("HEAD^1", "HEAD", dir.path()).unwrap();
        assert_eq!(changed, vec!["changed.rst".to_owned()]);
    }

    #[test]
    fn fetch_and_worktree_materialize_a_branch() {
        let root = tempfile::tempdir().unwrap();
        let origin = root.path().join("origin");
        fs::create_dir(&origin).unwrap();
        init_repo(&origin);
        checkout_new_branch("release/2.1", &origin).unwrap();
        fs::write(origin.join("extra.rst"), "v2.1\n").unwrap();
        add_all(&origin).unwrap();
        commit("branch content", &origin).unwrap();

        clone_bare(origin.to_str().unwrap(), "mirror", root.path()).unwrap();
        let mirror = root.path().join("mirror");
        fetch_branch("release/2.1", &mirror).unwrap();
        worktree_add("../2.1", "release/2.1", &mirror).unwrap();

        assert!(root.path().join("2.1/extra.rst").exists());
    }
}
