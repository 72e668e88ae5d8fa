use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use dd_core::{IdentityProvider, PreferenceStore, Result};

pub mod backends;
pub mod session;

pub use backends::*;
pub use session::Session;

#[derive(Clone)]
pub struct Config {
    pub firebase_api_key: Option<String>,
    pub firebase_project_id: Option<String>,
    pub identity_base_url: Option<String>,
    pub firestore_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            firebase_api_key: None,
            firebase_project_id: None,
            identity_base_url: None,
            firestore_base_url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("firebase_api_key", &self.firebase_api_key.as_deref().map(|_| "<redacted>"))
            .field("firebase_project_id", &self.firebase_project_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    fn firebase(&self) -> Option<(&str, &str)> {
        let key = self.firebase_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let project = self.firebase_project_id.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        Some((key, project))
    }
}

pub type Backends = (Arc<dyn IdentityProvider>, Arc<dyn PreferenceStore>);

/// Firebase when credentials are configured and the `firebase` feature is
/// enabled, in-memory otherwise.
pub fn create_backends(config: &Config) -> Result<Backends> {
    #[cfg(feature = "firebase")]
    {
        if let Some((api_key, project_id)) = config.firebase() {
            let identity = FirebaseIdentity::new(
                api_key.to_string(),
                config.identity_base_url.clone(),
                config.timeout,
            )?;
            let store = FirestorePreferences::new(
                api_key.to_string(),
                project_id.to_string(),
                config.firestore_base_url.clone(),
                identity.token(),
                config.timeout,
            )?;
            tracing::info!(project = project_id, "using Firebase backends");
            return Ok((Arc::new(identity), Arc::new(store)));
        }
    }

    if config.firebase().is_some() {
        tracing::warn!("Firebase credentials set but the firebase feature is disabled; using memory backends");
    } else {
        tracing::info!("using in-memory identity and preference backends");
    }
    Ok((Arc::new(InMemoryIdentity::new()), Arc::new(InMemoryPreferences::new())))
}

impl Session {
    pub fn from_config(config: &Config) -> Result<Self> {
        let (identity, store) = create_backends(config)?;
        Ok(Self::new(identity, store).with_save_timeout(config.timeout))
    }
}

pub mod prelude {
    pub use super::{Config, Session};
    pub use dd_core::{AuthError, Error, Result, User, UserId, UserPreferences};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backends_without_credentials() {
        let (identity, _) = create_backends(&Config::default()).unwrap();
        assert_eq!(identity.name(), "memory");

        let config = Config {
            firebase_api_key: Some("key".to_string()),
            firebase_project_id: Some("  ".to_string()),
            ..Config::default()
        };
        let (identity, _) = create_backends(&config).unwrap();
        assert_eq!(identity.name(), "memory");
    }

    #[cfg(feature = "firebase")]
    #[test]
    fn test_firebase_backends_with_credentials() {
        let config = Config {
            firebase_api_key: Some("key".to_string()),
            firebase_project_id: Some("demo".to_string()),
            ..Config::default()
        };
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.backend(), "firebase");
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            firebase_api_key: Some("AIza-secret".to_string()),
            ..Config::default()
        };
        assert!(!format!("{:?}", config).contains("AIza-secret"));
    }
}
