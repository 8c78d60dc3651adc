use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 移動檔案；只有跨檔案系統時才改用複製後刪除
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(
                "跨檔案系統，改用複製: {} -> {} ({e})",
                source.display(),
                target.display()
            );
            copy_and_delete(source, target)
                .with_context(|| format!("移動檔案失敗 (原始錯誤: {e})"))
        }
        Err(e) => Err(e).with_context(|| {
            format!("移動檔案失敗: {} -> {}", source.display(), target.display())
        }),
    }
}

/// 複製檔案後刪除原檔案
fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).with_context(|| {
        format!("複製檔案失敗: {} -> {}", source.display(), target.display())
    })?;

    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_move_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.png");
        let target = temp_dir.path().join("b.png");
        fs::write(&source, "content").unwrap();

        move_file(&source, &target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "content");
    }

    #[test]
    fn test_move_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.png");
        let target = temp_dir.path().join("b.png");

        assert!(move_file(&source, &target).is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_rename_error_is_returned_without_copying() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.png");
        let target = temp_dir.path().join("missing_dir").join("a.png");
        fs::write(&source, "content").unwrap();

        let err = move_file(&source, &target).unwrap_err();

        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), ErrorKind::NotFound);
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_source_dir_leaves_no_copy() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("locked");
        fs::create_dir(&source_dir).unwrap();
        let source = source_dir.join("a.png");
        let target = temp_dir.path().join("a.png");
        fs::write(&source, "content").unwrap();
        fs::set_permissions(&source_dir, fs::Permissions::from_mode(0o555)).unwrap();

        let result = move_file(&source, &target);
        fs::set_permissions(&source_dir, fs::Permissions::from_mode(0o755)).unwrap();

        // root 不受權限限制，rename 會成功
        if result.is_err() {
            assert!(source.exists());
            assert!(!target.exists());
        }
    }
}
