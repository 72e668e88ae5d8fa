use async_trait::async_trait;
use tokio::sync::watch;
use crate::types::{User, UserId, UserPreferences};
use crate::Result;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load the stored preference record, if one was ever saved
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreferences>>;

    /// Replace the stored interests. Other fields of the record are merged.
    async fn set(&self, user_id: &UserId, interests: &[String]) -> Result<UserPreferences>;

    async fn interests(&self, user_id: &UserId) -> Result<Vec<String>> {
        Ok(self
            .get(user_id)
            .await?
            .map(|prefs| prefs.interests)
            .unwrap_or_default())
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<User>;

    async fn sign_out(&self) -> Result<()>;

    /// Observe auth state changes; the current value is the signed-in user.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    fn current_user(&self) -> Option<User> {
        self.subscribe().borrow().clone()
    }
}
