use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid topics detected: {}. Please enter valid topic names.", .0.join(", "))]
    InvalidTopic(Vec<String>),

    #[error("Failed to fetch article: {0}")]
    Fetch(String),

    #[error("Could not extract sufficient content from the article. Please try a different URL.")]
    InsufficientContent { length: usize },

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Errors the user can fix by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InvalidTopic(_) | Error::InsufficientContent { .. }
        )
    }
}

/// Which identity operation produced an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    SignIn,
    SignUp,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No account found with this email. Please sign up first.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("Password is too weak. Please use at least 6 characters.")]
    WeakPassword,

    #[error("An account with this email already exists. Please sign in instead.")]
    EmailInUse,

    #[error("Authentication is not configured. Please check your project settings.")]
    NotConfigured,

    #[error("Invalid email address. Please check your email format.")]
    InvalidEmail,

    #[error("Sign in failed: {0}")]
    SignInFailed(String),

    #[error("Sign up failed: {0}")]
    SignUpFailed(String),

    #[error("User not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    /// Maps an identity-provider error code to a user-facing error.
    ///
    /// Accepts both the `auth/user-not-found` style and the REST style
    /// (`EMAIL_NOT_FOUND`, `WEAK_PASSWORD : Password should be ...`).
    pub fn from_code(code: &str, operation: AuthOperation) -> Self {
        let normalized = code
            .split(" : ")
            .next()
            .unwrap_or(code)
            .trim()
            .trim_start_matches("auth/")
            .replace('-', "_")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "USER_NOT_FOUND" | "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
            "WRONG_PASSWORD" | "INVALID_PASSWORD" => AuthError::WrongPassword,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "EMAIL_ALREADY_IN_USE" | "EMAIL_EXISTS" => AuthError::EmailInUse,
            "CONFIGURATION_NOT_FOUND" => AuthError::NotConfigured,
            "INVALID_EMAIL" => AuthError::InvalidEmail,
            _ => match operation {
                AuthOperation::SignIn => AuthError::SignInFailed(code.to_string()),
                AuthOperation::SignUp => AuthError::SignUpFailed(code.to_string()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_codes_map_to_messages() {
        assert_eq!(
            AuthError::from_code("auth/user-not-found", AuthOperation::SignIn),
            AuthError::UserNotFound
        );
        assert_eq!(
            AuthError::from_code("INVALID_PASSWORD", AuthOperation::SignIn),
            AuthError::WrongPassword
        );
        assert_eq!(
            AuthError::from_code(
                "WEAK_PASSWORD : Password should be at least 6 characters",
                AuthOperation::SignUp
            ),
            AuthError::WeakPassword
        );
        assert_eq!(
            AuthError::from_code("EMAIL_EXISTS", AuthOperation::SignUp),
            AuthError::EmailInUse
        );
        assert_eq!(
            AuthError::from_code("auth/configuration-not-found", AuthOperation::SignUp),
            AuthError::NotConfigured
        );
    }

    #[test]
    fn test_unknown_auth_code_is_wrapped() {
        let err = AuthError::from_code("TOO_MANY_ATTEMPTS_TRY_LATER", AuthOperation::SignIn);
        assert_eq!(err.to_string(), "Sign in failed: TOO_MANY_ATTEMPTS_TRY_LATER");

        let err = AuthError::from_code("OPERATION_NOT_ALLOWED", AuthOperation::SignUp);
        assert_eq!(err.to_string(), "Sign up failed: OPERATION_NOT_ALLOWED");
    }

    #[test]
    fn test_invalid_topic_message_lists_topics() {
        let err = Error::InvalidTopic(vec!["aaaa".to_string(), "12345".to_string()]);
        assert_eq!(
            err.to_string(),
            "Invalid topics detected: aaaa, 12345. Please enter valid topic names."
        );
        assert!(err.is_user_correctable());
        assert!(!Error::provider("NewsAPI", "boom").is_user_correctable());
    }
}
