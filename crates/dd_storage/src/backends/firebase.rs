//! Firebase Authentication and Firestore over their REST APIs.

use std::fmt;
use std::sync::{Arc, RwLock as StdRwLock};
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use dd_core::{
    AuthError, AuthOperation, Error, IdentityProvider, PreferenceStore, Result, User, UserId,
    UserPreferences,
};

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const USERS_COLLECTION: &str = "users";

/// ID token of the signed-in user, shared between auth and Firestore clients.
#[derive(Clone, Default)]
pub struct IdToken(Arc<StdRwLock<Option<String>>>);

impl IdToken {
    pub fn get(&self) -> Option<String> {
        self.0.read().ok().and_then(|t| t.clone())
    }

    fn set(&self, token: Option<String>) {
        if let Ok(mut slot) = self.0.write() {
            *slot = token;
        }
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.get().is_some() { "IdToken(<redacted>)" } else { "IdToken(None)" })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthReply {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseIdentity {
    client: Client,
    api_key: String,
    base_url: String,
    token: IdToken,
    state: watch::Sender<Option<User>>,
}

impl FirebaseIdentity {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AuthError::NotConfigured.into());
        }
        let (state, _) = watch::channel(None);
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string()),
            token: IdToken::default(),
            state,
        })
    }

    /// Handle to the ID token for authenticating Firestore requests.
    pub fn token(&self) -> IdToken {
        self.token.clone()
    }

    async fn call(&self, endpoint: &str, email: &str, password: &str, op: AuthOperation) -> Result<User> {
        let response = self
            .client
            .post(format!("{}/accounts:{}", self.base_url, endpoint))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let code = response
                .json::<ErrorReply>()
                .await
                .map(|reply| reply.error.message)
                .unwrap_or_else(|_| status.to_string());
            tracing::warn!(%status, code = %code, endpoint, "identity request rejected");
            return Err(AuthError::from_code(&code, op).into());
        }

        let reply: AuthReply = response.json().await?;
        self.token.set(reply.id_token);
        let user = User {
            id: UserId(reply.local_id),
            email: reply.email.or_else(|| Some(email.to_string())),
        };
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }
}

impl fmt::Debug for FirebaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseIdentity")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    fn name(&self) -> &str {
        "firebase"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        self.call("signInWithPassword", email, password, AuthOperation::SignIn).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        self.call("signUp", email, password, AuthOperation::SignUp).await
    }

    async fn sign_out(&self) -> Result<()> {
        self.token.set(None);
        self.state.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }
}

/// Preferences kept in the `users/{uid}` document under a `preferences` map.
pub struct FirestorePreferences {
    client: Client,
    api_key: String,
    project_id: String,
    base_url: String,
    token: IdToken,
}

impl FirestorePreferences {
    pub fn new(
        api_key: String,
        project_id: String,
        base_url: Option<String>,
        token: IdToken,
        timeout: Duration,
    ) -> Result<Self> {
        if project_id.trim().is_empty() {
            return Err(AuthError::NotConfigured.into());
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            project_id,
            base_url: base_url.unwrap_or_else(|| DEFAULT_FIRESTORE_URL.to_string()),
            token,
        })
    }

    fn document_url(&self, user_id: &UserId) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, USERS_COLLECTION, user_id
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.query(&[("key", self.api_key.as_str())]);
        match self.token.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl fmt::Debug for FirestorePreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestorePreferences")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn timestamp(fields: &Value, name: &str) -> Option<DateTime<Utc>> {
    fields
        .pointer(&format!("/{}/timestampValue", name))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reads the `preferences` map of a Firestore document.
fn decode_preferences(document: &Value) -> Option<UserPreferences> {
    let fields = document.pointer("/fields/preferences/mapValue/fields")?;
    let interests = fields
        .pointer("/interests/arrayValue/values")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let now = Utc::now();
    Some(UserPreferences {
        interests,
        created_at: timestamp(fields, "createdAt").unwrap_or(now),
        updated_at: timestamp(fields, "updatedAt").unwrap_or(now),
    })
}

fn encode_preferences(prefs: &UserPreferences) -> Value {
    let values: Vec<Value> = prefs
        .interests
        .iter()
        .map(|i| json!({ "stringValue": i }))
        .collect();
    json!({
        "fields": {
            "preferences": {
                "mapValue": {
                    "fields": {
                        "interests": { "arrayValue": { "values": values } },
                        "createdAt": { "timestampValue": prefs.created_at.to_rfc3339() },
                        "updatedAt": { "timestampValue": prefs.updated_at.to_rfc3339() },
                    }
                }
            }
        }
    })
}

fn storage_error(status: StatusCode, detail: String) -> Error {
    Error::Storage(format!("Firestore returned {}: {}", status, detail))
}

#[async_trait]
impl PreferenceStore for FirestorePreferences {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreferences>> {
        let response = self
            .request(self.client.get(self.document_url(user_id)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: Value = response.json().await?;
                Ok(decode_preferences(&document))
            }
            status => Err(storage_error(status, response.text().await.unwrap_or_default())),
        }
    }

    async fn set(&self, user_id: &UserId, interests: &[String]) -> Result<UserPreferences> {
        let now = Utc::now();
        let created_at = self.get(user_id).await?.map(|p| p.created_at).unwrap_or(now);
        let prefs = UserPreferences {
            interests: interests.to_vec(),
            created_at,
            updated_at: now,
        };

        // only the preferences field is replaced; the rest of the document stays
        let response = self
            .request(self.client.patch(self.document_url(user_id)))
            .query(&[("updateMask.fieldPaths", "preferences")])
            .json(&encode_preferences(&prefs))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(storage_error(status, response.text().await.unwrap_or_default()));
        }
        tracing::debug!(user = %user_id, count = prefs.interests.len(), "preferences saved");
        Ok(prefs)
    }
}
