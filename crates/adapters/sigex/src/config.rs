//! SIGEX client configuration

use std::path::PathBuf;
use std::time::Duration;

/// SIGEX client settings
#[derive(Debug, Clone)]
pub struct SigexSettings {
    /// Service root, e.g. `https://sigex.kz:10443`
    pub base_url: String,

    /// PEM client certificate path
    pub mtls_crt: Option<PathBuf>,

    /// PEM private key path
    pub mtls_key: Option<PathBuf>,

    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,

    /// Timeout for JSON request/response calls
    pub json_timeout: Duration,

    /// Timeout for the raw document upload
    pub upload_timeout: Duration,
}

impl Default for SigexSettings {
    fn default() -> Self {
        Self {
            base_url: "https://sigex.kz:10443".to_string(),
            mtls_crt: None,
            mtls_key: None,
            connect_timeout: Duration::from_secs(10),
            json_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(120),
        }
    }
}

/// Builder for SigexSettings
pub struct SigexSettingsBuilder {
    settings: SigexSettings,
}

impl SigexSettingsBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            settings: SigexSettings {
                base_url: base_url.into(),
                ..Default::default()
            },
        }
    }

    /// Set the client certificate and key paths
    pub fn with_identity(
        mut self,
        crt: Option<impl Into<PathBuf>>,
        key: Option<impl Into<PathBuf>>,
    ) -> Self {
        self.settings.mtls_crt = crt.map(Into::into);
        self.settings.mtls_key = key.map(Into::into);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connect_timeout = timeout;
        self
    }

    pub fn with_json_timeout(mut self, timeout: Duration) -> Self {
        self.settings.json_timeout = timeout;
        self
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.settings.upload_timeout = timeout;
        self
    }

    pub fn build(self) -> SigexSettings {
        self.settings
    }
}
