//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `TICKETDESK_*` environment variables and configuration
//! files; the command line may still override the data directory.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Name given to the administrator created on first start.
pub const DEFAULT_ADMIN_NAME: &str = "Administrador del Sistema";
/// Email of the administrator created on first start.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@gestortickets.com";
/// Password of the administrator created on first start.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Data location and default administrator identity.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKETDESK")]
pub struct DeskSettings {
    /// Directory holding the collection files.
    #[ortho_config(default = DEFAULT_DATA_DIR.to_owned())]
    pub data_dir: String,
    /// Display name of the bootstrap administrator.
    pub admin_name: Option<String>,
    /// Email of the bootstrap administrator.
    pub admin_email: Option<String>,
    /// Password of the bootstrap administrator.
    pub admin_password: Option<String>,
}

impl DeskSettings {
    /// Configured data directory, [`DEFAULT_DATA_DIR`] unless overridden.
    #[must_use]
    pub fn data_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.data_dir.as_str())
    }

    /// Configured administrator name, falling back to [`DEFAULT_ADMIN_NAME`].
    #[must_use]
    pub fn admin_name(&self) -> &str {
        self.admin_name.as_deref().unwrap_or(DEFAULT_ADMIN_NAME)
    }

    /// Configured administrator email, falling back to [`DEFAULT_ADMIN_EMAIL`].
    #[must_use]
    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }

    /// Configured administrator password, falling back to
    /// [`DEFAULT_ADMIN_PASSWORD`].
    #[must_use]
    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Replace the data directory, as a command-line flag does.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
