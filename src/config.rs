//! Credentials and HTTP client configuration.
//!
//! Both can be read from environment variables so that scripts do not need to
//! hard-code secrets:
//!
//! ```bash
//! export FPL_EMAIL=me@example.com
//! export FPL_PASSWORD=...
//! export FPL_USER_ID=91928
//! ```

use std::fmt;
use std::time::Duration;

use crate::{FplError, Result, UserId};

pub const EMAIL_ENV_VAR: &str = "FPL_EMAIL";
pub const PASSWORD_ENV_VAR: &str = "FPL_PASSWORD";
pub const USER_ID_ENV_VAR: &str = "FPL_USER_ID";
pub const API_URL_ENV_VAR: &str = "FPL_API_URL";
pub const LOGIN_URL_ENV_VAR: &str = "FPL_LOGIN_URL";

/// Base path of the public FPL API.
pub const FPL_API_URL: &str = "https://fantasy.premierleague.com/api/";
/// Form login endpoint of the Premier League account service.
pub const FPL_LOGIN_URL: &str = "https://users.premierleague.com/accounts/login/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Account details used for user-specific data such as the current squad.
///
/// All fields are optional; public data (teams, players, fixtures) needs none
/// of them. Setting credentials never triggers a login.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(
        user_id: Option<UserId>,
        email: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            user_id,
            email,
            password,
        }
    }

    /// Email and password only; the user id is resolved from the profile.
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: None,
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Read `FPL_USER_ID`, `FPL_EMAIL` and `FPL_PASSWORD`. Unset or empty
    /// variables are treated as absent; an unparsable user id is an error.
    pub fn from_env() -> Result<Self> {
        let user_id = match non_empty_env(USER_ID_ENV_VAR) {
            Some(raw) => Some(raw.parse::<UserId>()?),
            None => None,
        };

        Ok(Self {
            user_id,
            email: non_empty_env(EMAIL_ENV_VAR),
            password: non_empty_env(PASSWORD_ENV_VAR),
        })
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn overridden_by(self, overrides: Credentials) -> Self {
        Self {
            user_id: overrides.user_id.or(self.user_id),
            email: overrides.email.or(self.email),
            password: overrides.password.or(self.password),
        }
    }

    /// Check the login precondition and hand out the email/password pair.
    pub fn require_login(&self) -> Result<(String, String)> {
        let email = self.email.clone().ok_or_else(|| FplError::MissingEmail {
            env_var: EMAIL_ENV_VAR.to_string(),
        })?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| FplError::MissingPassword {
                env_var: PASSWORD_ENV_VAR.to_string(),
            })?;
        Ok((email, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Endpoint and timeout settings for [`crate::fpl::http::FplClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub login_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: FPL_API_URL.to_string(),
            login_url: FPL_LOGIN_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl ClientConfig {
    /// Defaults, with `FPL_API_URL` / `FPL_LOGIN_URL` applied when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: non_empty_env(API_URL_ENV_VAR).unwrap_or(defaults.api_url),
            login_url: non_empty_env(LOGIN_URL_ENV_VAR).unwrap_or(defaults.login_url),
            timeout: defaults.timeout,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
