use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{watch, RwLock};
use dd_core::{AuthError, IdentityProvider, PreferenceStore, Result, User, UserId, UserPreferences};

const MIN_PASSWORD_CHARS: usize = 6;

struct Account {
    id: UserId,
    password: String,
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Process-local accounts for tests and offline runs.
pub struct InMemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
    next_id: AtomicU64,
    state: watch::Sender<Option<User>>,
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            state,
        }
    }

    fn signed_in(&self, id: UserId, email: &str) -> User {
        let user = User {
            id,
            email: Some(email.to_string()),
        };
        self.state.send_replace(Some(user.clone()));
        user
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn name(&self) -> &str {
        "memory"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let accounts = self.accounts.read().await;
        let account = accounts.get(email).ok_or(AuthError::UserNotFound)?;
        if account.password != password {
            return Err(AuthError::WrongPassword.into());
        }
        Ok(self.signed_in(account.id.clone(), email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        if !looks_like_email(email) {
            return Err(AuthError::InvalidEmail.into());
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword.into());
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailInUse.into());
        }
        let id = UserId(format!("local-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        accounts.insert(
            email.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        Ok(self.signed_in(id, email))
    }

    async fn sign_out(&self) -> Result<()> {
        self.state.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }
}

#[derive(Default)]
pub struct InMemoryPreferences {
    records: RwLock<HashMap<UserId, UserPreferences>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferences {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreferences>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn set(&self, user_id: &UserId, interests: &[String]) -> Result<UserPreferences> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let created_at = records.get(user_id).map(|p| p.created_at).unwrap_or(now);
        let prefs = UserPreferences {
            interests: interests.to_vec(),
            created_at,
            updated_at: now,
        };
        records.insert(user_id.clone(), prefs.clone());
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_core::Error;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let identity = InMemoryIdentity::new();
        let mut changes = identity.subscribe();
        assert!(identity.current_user().is_none());

        let user = identity.sign_up("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow().as_ref().map(|u| u.id.clone()), Some(user.id.clone()));

        identity.sign_out().await.unwrap();
        assert!(identity.current_user().is_none());

        let again = identity.sign_in("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(identity.current_user(), Some(again));
    }

    #[tokio::test]
    async fn test_auth_errors() {
        let identity = InMemoryIdentity::new();
        identity.sign_up("ada@example.com", "hunter22").await.unwrap();

        let cases = [
            (identity.sign_in("bob@example.com", "whatever").await, AuthError::UserNotFound),
            (identity.sign_in("ada@example.com", "wrong-one").await, AuthError::WrongPassword),
            (identity.sign_up("ada@example.com", "hunter22").await, AuthError::EmailInUse),
            (identity.sign_up("carol@example.com", "123").await, AuthError::WeakPassword),
            (identity.sign_up("not-an-email", "hunter22").await, AuthError::InvalidEmail),
        ];
        for (result, expected) in cases {
            match result {
                Err(Error::Auth(actual)) => assert_eq!(actual, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_preferences_keep_created_at() {
        let store = InMemoryPreferences::new();
        let user = UserId("u1".to_string());
        assert!(store.get(&user).await.unwrap().is_none());
        assert!(store.interests(&user).await.unwrap().is_empty());

        let first = store.set(&user, &["AI".to_string()]).await.unwrap();
        let second = store
            .set(&user, &["AI".to_string(), "Space".to_string()])
            .await
            .unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(store.interests(&user).await.unwrap(), vec!["AI", "Space"]);
    }
}
