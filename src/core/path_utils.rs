/*
 * This module provides utility functions for path handling: locating the
 * per-user configuration directory and splitting the `filename` option into
 * the directory and name parts the native pickers take separately.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local configuration directory.
 * This function determines the platform-specific path for local (non-roaming)
 * application configuration data and creates it if necessary. The path is
 * derived without an organization qualifier (e.g., AppData/Local/<app> on
 * Windows, ~/.config/<app> on Linux).
 *
 * Returns `None` if the directory could not be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!(
        "PathUtils: Attempting to get base app config local dir for '{}'",
        app_name
    );
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {:?}: {}",
                    config_path,
                    e
                );
                return None;
            }
            log::debug!(
                "PathUtils: Created base app config directory: {:?}",
                config_path
            );
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Splits `filename` at its last `/` or `\` into a directory part (keeping the
 * trailing separator) and a name part. A value ending in a separator is all
 * directory; a value without separators is all name. Both separators are
 * accepted on every platform because the option value is caller text, not a
 * parsed `Path`.
 */
pub fn split_dir_and_name(filename: &str) -> (&str, &str) {
    match filename.rfind(['/', '\\']) {
        Some(idx) => filename.split_at(idx + 1),
        None => ("", filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_dir_and_name() {
        assert_eq!(split_dir_and_name(r"C:\dir\a.txt"), (r"C:\dir\", "a.txt"));
        assert_eq!(split_dir_and_name("/tmp/dir/"), ("/tmp/dir/", ""));
        assert_eq!(split_dir_and_name("report.pdf"), ("", "report.pdf"));
        assert_eq!(split_dir_and_name("C:/mixed\\b.txt"), ("C:/mixed\\", "b.txt"));
        assert_eq!(split_dir_and_name(""), ("", ""));
    }

    #[test]
    fn test_get_base_app_config_local_dir_creates_and_returns_same_path() {
        // Arrange
        let unique_app_name = format!("TestApp_PathUtils_{}", rand::random::<u128>());

        // Act
        let first = get_base_app_config_local_dir(&unique_app_name);
        let second = get_base_app_config_local_dir(&unique_app_name);

        // Assert
        // ProjectDirs can be unavailable in stripped-down environments (no HOME).
        if let Some(path) = first {
            assert!(path.is_dir(), "Directory should exist at {:?}", path);
            assert_eq!(second.as_ref(), Some(&path));
            assert!(
                path.to_string_lossy()
                    .to_lowercase()
                    .contains(&unique_app_name.to_lowercase())
            );
            if let Err(e) = fs::remove_dir_all(&path) {
                eprintln!("Test cleanup error for {}: {}", path.display(), e);
            }
        }
    }
}
