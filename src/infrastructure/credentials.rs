//! Plan server credentials
//!
//! Credentials live in a properties file, `.credentials` by default:
//!
//! ```text
//! username=jane
//! password=secret
//! ```

use crate::plan::PlanError;
use std::fmt;
use std::path::Path;

/// Username and password for HTTP basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password or personal access token
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Creates credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parses the properties format
    ///
    /// Blank lines and lines starting with `#` or `!` are ignored, keys and
    /// values are separated by the first `=` or `:`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Credentials`] if `username` or `password` is
    /// missing or empty.
    pub fn parse(content: &str) -> Result<Self, PlanError> {
        let mut username = None;
        let mut password = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(['=', ':']) else {
                continue;
            };
            match key.trim() {
                "username" => username = Some(value.trim().to_string()),
                "password" => password = Some(value.trim().to_string()),
                _ => {}
            }
        }

        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self { username, password })
            }
            _ => Err(PlanError::Credentials(
                "both 'username' and 'password' must be set".to_string(),
            )),
        }
    }

    /// Reads and parses a credentials file
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Credentials`] if the file cannot be read or is
    /// incomplete.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded credentials file");
        Self::parse(&content)
    }
}
