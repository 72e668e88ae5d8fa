use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};
use dd_core::{AuthError, Error, IdentityProvider, PreferenceStore, Result, User, UserPreferences};
use dd_news::is_valid_topic;

pub const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_secs(10);

/// The signed-in user's view of identity and stored interests.
pub struct Session {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn PreferenceStore>,
    save_timeout: Duration,
}

impl Session {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            identity,
            store,
            save_timeout: DEFAULT_SAVE_TIMEOUT,
        }
    }

    pub fn with_save_timeout(mut self, timeout: Duration) -> Self {
        self.save_timeout = timeout;
        self
    }

    pub fn backend(&self) -> &str {
        self.identity.name()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let user = self.identity.sign_in(email, password).await?;
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let user = self.identity.sign_up(email, password).await?;
        info!(user = %user.id, "account created");
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.identity.sign_out().await
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    /// Auth state changes; `None` when signed out.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.identity.subscribe()
    }

    fn require_user(&self) -> Result<User> {
        self.current_user()
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Interests of the signed-in user; empty when signed out or never saved.
    pub async fn preferences(&self) -> Result<Vec<String>> {
        match self.current_user() {
            Some(user) => self.store.interests(&user.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the stored interests, dropping repeats.
    pub async fn save_preferences(&self, interests: &[String]) -> Result<UserPreferences> {
        let user = self.require_user()?;
        let mut unique: Vec<String> = Vec::with_capacity(interests.len());
        for interest in interests {
            if !unique.contains(interest) {
                unique.push(interest.clone());
            }
        }
        let prefs = self.store.set(&user.id, &unique).await?;
        debug!(user = %user.id, interests = ?prefs.interests, "preferences saved");
        Ok(prefs)
    }

    pub async fn add_interest(&self, topic: &str) -> Result<Vec<String>> {
        let user = self.require_user()?;
        if !is_valid_topic(topic) {
            return Err(Error::InvalidTopic(vec![topic.to_string()]));
        }

        let mut interests = self.store.interests(&user.id).await?;
        if interests.iter().any(|i| i == topic) {
            debug!(topic, "interest already present");
            return Ok(interests);
        }
        interests.push(topic.to_string());

        tokio::time::timeout(self.save_timeout, self.save_preferences(&interests))
            .await
            .map_err(|_| Error::Storage("Operation timed out".to_string()))??;
        Ok(interests)
    }

    /// Drops `topic` from the stored interests. Does nothing when signed out.
    pub async fn remove_interest(&self, topic: &str) -> Result<Vec<String>> {
        let Some(user) = self.current_user() else {
            debug!(topic, "remove_interest without a signed-in user");
            return Ok(Vec::new());
        };
        let interests: Vec<String> = self
            .store
            .interests(&user.id)
            .await?
            .into_iter()
            .filter(|i| i != topic)
            .collect();
        self.save_preferences(&interests).await?;
        Ok(interests)
    }
}
