//! Configuration for avlfile
//!
//! Open options for a tree file, with sensible defaults.

use std::path::PathBuf;

/// Open options for a `TreeFile`
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------
    /// Directory holding both files (created on open if missing)
    /// Internal structure:
    ///   {directory}/
    ///     ├── {filename}         (data slots)
    ///     └── {filename}.index   (virtual → physical mapping)
    pub directory: PathBuf,

    /// Data file name; required
    pub filename: Option<String>,

    // -------------------------------------------------------------------------
    // Capabilities
    // -------------------------------------------------------------------------
    /// Allow insert, remove and truncate
    pub writable: bool,

    /// Allow in-place update of existing records
    pub updatable: bool,

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// fsync both files when the handle is closed
    pub sync_on_close: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            filename: None,
            writable: false,
            updatable: false,
            sync_on_close: true,
        }
    }
}

impl Config {
    /// Suffix appended to the data file name to form the index file name
    pub const INDEX_SUFFIX: &'static str = ".index";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the data file, if a filename is set
    pub fn data_path(&self) -> Option<PathBuf> {
        self.filename
            .as_ref()
            .map(|name| self.directory.join(name))
    }

    /// Full path of the index file, if a filename is set
    pub fn index_path(&self) -> Option<PathBuf> {
        self.filename
            .as_ref()
            .map(|name| self.directory.join(format!("{}{}", name, Self::INDEX_SUFFIX)))
    }

    /// Files must be opened for writing when either mutating capability is set
    pub fn needs_write_access(&self) -> bool {
        self.writable || self.updatable
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory holding the data and index files
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.directory = path.into();
        self
    }

    /// Set the data file name
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.config.filename = Some(name.into());
        self
    }

    /// Enable or disable insert/remove/truncate
    pub fn writable(mut self, writable: bool) -> Self {
        self.config.writable = writable;
        self
    }

    /// Enable or disable in-place update
    pub fn updatable(mut self, updatable: bool) -> Self {
        self.config.updatable = updatable;
        self
    }

    /// Enable or disable fsync on close
    pub fn sync_on_close(mut self, sync: bool) -> Self {
        self.config.sync_on_close = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
