use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::bail;

use crate::error::Error;
use crate::utils::time_util::TimeUtil;

pub const BACKUP_FILE_PREFIX: &str = "db-backup-";
pub const BACKUP_FILE_SUFFIX: &str = ".json";

pub struct FileUtil {}

impl FileUtil {
    /// Path for a new backup file; the backup directory is created if absent.
    pub fn new_backup_path(backup_dir: &str) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(backup_dir)?;
        let file_name = format!(
            "{}{}{}",
            BACKUP_FILE_PREFIX,
            TimeUtil::backup_timestamp(),
            BACKUP_FILE_SUFFIX
        );
        Ok(Path::new(backup_dir).join(file_name))
    }

    /// The most recent backup: lexical max of the backup file names, no file
    /// contents read.
    pub fn latest_backup_file(backup_dir: &str) -> anyhow::Result<PathBuf> {
        let dir = Path::new(backup_dir);
        if !dir.is_dir() {
            bail! {Error::SnapshotError(format!(
                "no backup directory found: {}",
                backup_dir
            ))}
        }

        let mut file_names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if file_name.starts_with(BACKUP_FILE_PREFIX) {
                file_names.push(file_name);
            }
        }
        file_names.sort();

        match file_names.pop() {
            Some(file_name) => Ok(dir.join(file_name)),
            None => bail! {Error::SnapshotError(format!(
                "no backup files found in {}",
                backup_dir
            ))},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_backup_file_picks_lexical_max() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "db-backup-2024-01-01T00-00-00-000Z.json",
            "db-backup-2024-06-01T00-00-00-000Z.json",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let latest = FileUtil::latest_backup_file(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(
            latest.file_name().unwrap().to_str().unwrap(),
            "db-backup-2024-06-01T00-00-00-000Z.json"
        );
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(
            dir.path().join("db-backup-2024-03-01T00-00-00-000Z.json"),
            "{}",
        )
        .unwrap();
        // sorts after every db-backup file but must not win
        fs::write(dir.path().join("zz-other.json"), "{}").unwrap();

        let latest = FileUtil::latest_backup_file(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(
            latest.file_name().unwrap().to_str().unwrap(),
            "db-backup-2024-03-01T00-00-00-000Z.json"
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = FileUtil::latest_backup_file("/nonexistent/backups").unwrap_err();
        assert!(err.to_string().contains("no backup directory"));
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileUtil::latest_backup_file(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("no backup files"));
    }

    #[test]
    fn test_new_backup_path_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let backup_dir = dir.path().join("backups");
        let path = FileUtil::new_backup_path(backup_dir.to_str().unwrap()).unwrap();
        assert!(backup_dir.is_dir());
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with(BACKUP_FILE_PREFIX));
        assert!(file_name.ends_with(BACKUP_FILE_SUFFIX));
    }
}
