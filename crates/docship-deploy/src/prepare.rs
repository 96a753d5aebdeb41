//! Final shaping of the merged output tree before publishing.
//!
//! Two conveniences keep old URLs alive: the legacy slug (a historical
//! publish path, e.g. "en/latest") is recreated as a copy of its target
//! version and then rewritten into relative redirect pages, and the latest
//! version's tree is copied to its bare-major alias (e.g. "2.0" → "2") so
//! the short path always serves the newest docs of that series.

use std::path::Path;

use docship_config::{SiteConfig, VersionRegistry};
use docship_rewrite::redirects::write_relative_redirects;
use docship_sources::copy_tree;
use tracing::info;

use crate::DeployError;

/// Materialize the legacy redirect tree and the bare-major alias inside
/// `output_folder`. Both steps are skipped when unconfigured.
pub fn prepare_output(
    registry: &VersionRegistry,
    site: &SiteConfig,
    output_folder: &Path,
) -> Result<(), DeployError> {
    if let (Some(legacy_slug), Some(legacy_target)) =
        (site.legacy_slug.as_deref(), site.legacy_target.as_deref())
    {
        let source = output_folder.join(legacy_target);
        if !source.is_dir() {
            return Err(DeployError::MissingTree(source));
        }
        let legacy_root = output_folder.join(legacy_slug);
        info!("recreating legacy tree {legacy_slug} from {legacy_target}");
        copy_tree(&source, &legacy_root)?;
        write_relative_redirects(&legacy_root, legacy_slug, legacy_target)?;
    }

    if let Some(major_alias) = site.major_alias.as_deref() {
        let latest = output_folder.join(registry.latest_slug());
        if !latest.is_dir() {
            return Err(DeployError::MissingTree(latest));
        }
        info!(
            "copying latest tree {} to alias {major_alias}",
            registry.latest_slug()
        );
        copy_tree(&latest, &output_folder.join(major_alias))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docship_config::{SiteConfig, VersionRegistry};
    use std::fs;

    fn registry() -> VersionRegistry {
        VersionRegistry::from_json_str(r#"{"2.0": "release/2.0", "1": "master"}"#).unwrap()
    }

    fn site() -> SiteConfig {
        SiteConfig {
            legacy_slug: Some("en/latest".to_owned()),
            legacy_target: Some("1".to_owned()),
            major_alias: Some("2".to_owned()),
            ..SiteConfig::default()
        }
    }

    fn seed(output: &Path, slug: &str) {
        let root = output.join(slug);
        fs::create_dir_all(root.join("guide")).unwrap();
        fs::write(root.join("index.html"), format!("<html>{slug}</html>")).unwrap();
        fs::write(root.join("guide/install.html"), "<html>guide</html>").unwrap();
    }

    #[test]
    fn legacy_tree_is_rebuilt_as_redirects() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "2.0");
        seed(dir.path(), "1");

        prepare_output(&registry(), &site(), dir.path()).unwrap();

        let legacy = dir.path().join("en/latest");
        assert!(legacy.join("guide/install.html").exists());
        let content = fs::read_to_string(legacy.join("guide/install.html")).unwrap();
        // Redirect from en/latest/guide back to the real version
        assert!(content.contains("url=../../../1/guide/install.html"));
    }

    #[test]
    fn latest_tree_is_copied_to_major_alias() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "2.0");
        seed(dir.path(), "1");

        prepare_output(&registry(), &site(), dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("2/index.html")).unwrap(),
            "<html>2.0</html>"
        );
        // The original tree is untouched
        assert_eq!(
            fs::read_to_string(dir.path().join("2.0/index.html")).unwrap(),
            "<html>2.0</html>"
        );
    }

    #[test]
    fn nothing_happens_when_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "2.0");

        prepare_output(&registry(), &SiteConfig::default(), dir.path()).unwrap();

        assert!(!dir.path().join("2").exists());
        assert!(!dir.path().join("en").exists());
    }

    #[test]
    fn missing_target_tree_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "2.0");
        // "1" tree missing

        let err = prepare_output(&registry(), &site(), dir.path()).unwrap_err();
        assert!(matches!(err, DeployError::MissingTree(_)));
    }
}
