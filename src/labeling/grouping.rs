use regex::Regex;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::types::{Grouping, ImagePairGroup, Role};
use crate::session::UploadSession;

/// Reduce an uploaded filename to a safe single path component.
///
/// Directory parts are dropped, control characters and `<>:"/\\|?*` are
/// removed, and leading dots and surrounding whitespace stripped. Unicode
/// letters are kept. Returns None if nothing is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");
    let pattern = Regex::new(r#"[\x00-\x1F\x7F<>:"/\\|?*]"#).expect("static regex");
    let cleaned = pattern.replace_all(last, "");
    let cleaned = cleaned
        .trim()
        .trim_start_matches('.')
        .trim_end_matches(['.', ' ']);

    if cleaned.is_empty() || cleaned.len() > 255 {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Write an upload into the session directory under its sanitized name.
///
/// A name already present in the session is skipped, the first upload wins.
pub async fn save_upload(
    session: &UploadSession,
    file_name: &str,
    data: &[u8],
) -> io::Result<Option<PathBuf>> {
    let Some(safe_name) = sanitize_filename(file_name) else {
        warn!("Skipping upload with unusable filename: {:?}", file_name);
        return Ok(None);
    };

    let path = session.path_for(&safe_name);
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("Skipping duplicate upload {:?} (saved as {})", file_name, safe_name);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    file.write_all(data).await?;
    file.flush().await?;

    debug!("Saved upload {} ({} bytes)", safe_name, data.len());
    Ok(Some(path))
}

/// Split `{base}_{R|T}.{ext}` into base name and role
pub fn parse_role(file_name: &str) -> Option<(String, Role)> {
    let (base_name, remainder) = file_name.rsplit_once('_')?;
    let token = remainder.split('.').next().unwrap_or("");
    Role::from_token(token).map(|role| (base_name.to_string(), role))
}

/// Pair saved files by base name. Groups missing a role are reported as incomplete.
pub fn group_pairs(files: &[PathBuf]) -> Grouping {
    let mut groups: BTreeMap<String, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

    for path in files {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((base_name, role)) = parse_role(file_name) else {
            debug!("Ignoring file without role suffix: {}", file_name);
            continue;
        };

        let entry = groups.entry(base_name).or_default();
        match role {
            Role::Reference => entry.0 = Some(path.clone()),
            Role::Target => entry.1 = Some(path.clone()),
        }
    }

    let mut grouping = Grouping::default();
    for (base_name, slots) in groups {
        match slots {
            (Some(reference), Some(target)) => grouping.pairs.push(ImagePairGroup {
                base_name,
                reference,
                target,
            }),
            _ => {
                warn!("Dropping incomplete image group: {}", base_name);
                grouping.incomplete.push(base_name);
            }
        }
    }

    grouping
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/scratch").join(n)).collect()
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/a_R.png").as_deref(), Some("a_R.png"));
        assert_eq!(sanitize_filename("C:\\Users\\me\\b_T.jpg").as_deref(), Some("b_T.jpg"));
        assert_eq!(sanitize_filename("my photo_R.png").as_deref(), Some("my photo_R.png"));
        assert_eq!(sanitize_filename("猫_R.png").as_deref(), Some("猫_R.png"));
        assert_eq!(sanitize_filename("a<b>:c|d?*_T.png").as_deref(), Some("abcd_T.png"));
        assert_eq!(sanitize_filename("bad\u{0}\u{1f}name_R.png").as_deref(), Some("badname_R.png"));
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("a_R.png"), Some(("a".to_string(), Role::Reference)));
        assert_eq!(parse_role("scene_01_T.jpg"), Some(("scene_01".to_string(), Role::Target)));
        assert_eq!(parse_role("x_T.tar.gz"), Some(("x".to_string(), Role::Target)));
        assert_eq!(parse_role("a_X.png"), None);
        assert_eq!(parse_role("noUnderscore.png"), None);
        assert_eq!(parse_role("a_RT.png"), None);
    }

    #[test]
    fn test_incomplete_groups_dropped() {
        let grouping = group_pairs(&paths(&["a_R.png", "a_T.png", "b_R.jpg"]));
        assert_eq!(grouping.pairs.len(), 1);
        assert_eq!(grouping.pairs[0].base_name, "a");
        assert!(grouping.pairs[0].reference.ends_with("a_R.png"));
        assert!(grouping.pairs[0].target.ends_with("a_T.png"));
        assert_eq!(grouping.incomplete, vec!["b".to_string()]);
    }

    #[test]
    fn test_no_valid_pairs() {
        let grouping = group_pairs(&paths(&["a_R.png", "readme.txt", "c_T.png"]));
        assert!(grouping.pairs.is_empty());
        assert_eq!(grouping.incomplete, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_save_upload_sanitizes() {
        let root = tempfile::tempdir().unwrap();
        let session = SessionManager::new(root.path()).create_session().unwrap();

        let saved = save_upload(&session, "../evil_R.png", b"\x89PNG").await.unwrap().unwrap();
        assert_eq!(saved, session.path_for("evil_R.png"));
        assert!(saved.exists());

        assert!(save_upload(&session, "..", b"x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_upload_keeps_first_duplicate() {
        let root = tempfile::tempdir().unwrap();
        let session = SessionManager::new(root.path()).create_session().unwrap();

        let first = save_upload(&session, "dir1/猫_R.png", b"first").await.unwrap();
        assert_eq!(first, Some(session.path_for("猫_R.png")));

        let second = save_upload(&session, "dir2/猫_R.png", b"second").await.unwrap();
        assert!(second.is_none());
        assert_eq!(std::fs::read(session.path_for("猫_R.png")).unwrap(), b"first");
    }
}
