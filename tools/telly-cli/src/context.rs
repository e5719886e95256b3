//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use telly_commerce::cart::CartStore;
use telly_storage::{Cache, FileStore};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding slot files.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the cart over the configured storage directory.
    ///
    /// Refuses an invalid config before touching storage.
    pub fn open_cart(&self) -> Result<CartStore<FileStore>> {
        self.config.ensure_valid()?;
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
        Ok(CartStore::open(Cache::new(store), self.config.cart.clone()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file by walking up from `start`.
///
/// Unreadable candidates are skipped so a broken file higher up does not
/// shadow a good one.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match CliConfig::load(config_path.to_str()?) {
                    Ok(config) => return Some((config, config_path)),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "skipping config: {:#}", e)
                    }
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("telly-ctx-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = temp_dir("walk");
        std::fs::write(
            root.join("telly.toml"),
            "[cart]\nslot_key = \"cart:test\"\n",
        )
        .unwrap();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = find_config(&nested).unwrap();
        assert_eq!(config.cart.slot_key, "cart:test");
        assert_eq!(path, root.join("telly.toml"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_storage_dir_resolves_relative() {
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: PathBuf::from("/srv/shop"),
        };
        assert_eq!(ctx.storage_dir(), PathBuf::from("/srv/shop/.telly"));
        assert_eq!(ctx.resolve_path("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_open_cart_rejects_invalid_config() {
        let root = temp_dir("invalid");
        let mut config = CliConfig::default();
        config.checkout.tax_rate_percent = -8.0;
        let ctx = Context {
            config,
            config_path: None,
            output: Output::new(false, true),
            cwd: root.clone(),
        };

        assert!(ctx.open_cart().is_err());
        assert!(!root.join(".telly").exists());

        let _ = std::fs::remove_dir_all(&root);
    }
}
