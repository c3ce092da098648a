//! Init command tests
//!
//! 1. Creates config directory
//! 2. Creates default config.toml pointing at the data directory
//! 3. Does not overwrite existing config without --force
//! 4. Written config loads back

use memos_mcp::config::app_config::AppConfig;
use memos_mcp::config::path_resolver::{get_config_dir, get_default_database_path};
use std::fs;
use tempfile::TempDir;

mod init_tests {
    use super::*;

    /// Run `f` with XDG_CONFIG_HOME pointed at a fresh temp dir
    fn with_temp_config_home<F, T>(f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let temp_dir = TempDir::new().unwrap();
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

        let result = f();

        if let Some(val) = original {
            std::env::set_var("XDG_CONFIG_HOME", val);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
        result
    }

    #[test]
    fn test_init_writes_loadable_config() {
        with_temp_config_home(|| {
            let config_dir = get_config_dir();
            assert!(!config_dir.exists());

            // Simulate init command
            fs::create_dir_all(&config_dir).unwrap();
            let config_path = config_dir.join("config.toml");
            let database = get_default_database_path();
            let default_config =
                AppConfig::default().with_database_path(&database.to_string_lossy());
            fs::write(&config_path, default_config.to_toml().unwrap()).unwrap();

            assert!(config_path.exists());
            let content = fs::read_to_string(&config_path).unwrap();
            assert!(content.contains("database_path"));
            assert!(content.contains("memos.db"));

            let loaded = AppConfig::from_file(&config_path).unwrap();
            assert_eq!(loaded.database_path(), database.to_string_lossy());
            assert!(loaded.user_id().is_none());
        });
    }

    #[test]
    fn test_existing_config_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let custom_content = r#"
database_path = "/custom/memos.db"
user_id = 8
"#;
        fs::write(&config_path, custom_content).unwrap();

        // Without --force the existing file is kept
        let force = false;
        if !config_path.exists() || force {
            fs::write(&config_path, AppConfig::default().to_toml().unwrap()).unwrap();
        }

        let existing = AppConfig::from_file(&config_path).unwrap();
        assert_eq!(existing.database_path(), "/custom/memos.db");
        assert_eq!(existing.user_id(), Some(8));
    }
}
