//! Identity provider
//!
//! The app only needs to know whether someone is signed in and who.
//! `LocalIdentity` checks credentials against the configured accounts and
//! remembers the session in a small JSON file.

use crate::config::Account;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{info, warn};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("no account for {0}")]
    UnknownAccount(String),

    #[error("wrong password")]
    WrongPassword,

    #[error("session file error: {0}")]
    Io(#[from] io::Error),

    #[error("session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait IdentityProvider {
    fn current_user(&self) -> Option<User>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, IdentityError>;
    fn sign_out(&mut self) -> Result<(), IdentityError>;
}

pub struct LocalIdentity {
    accounts: Vec<Account>,
    /// Where the session is persisted; `None` keeps it in memory only
    session_path: Option<PathBuf>,
    user: Option<User>,
}

impl LocalIdentity {
    /// Restore any saved session
    ///
    /// An unreadable session file is logged and treated as signed out.
    pub fn new(accounts: Vec<Account>, session_path: Option<PathBuf>) -> Self {
        let user = session_path
            .as_ref()
            .filter(|path| path.exists())
            .and_then(|path| match Self::read_session(path) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable session file");
                    None
                }
            });
        Self {
            accounts,
            session_path,
            user,
        }
    }

    fn read_session(path: &Path) -> Result<User, IdentityError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_session(&self, user: &User) -> Result<(), IdentityError> {
        let Some(path) = &self.session_path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(user)?)?;
        Ok(())
    }

    fn check_credentials(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        if !EMAIL_REGEX.is_match(email) {
            return Err(IdentityError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(IdentityError::MissingPassword);
        }
        if self.accounts.is_empty() {
            return Ok(());
        }
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| IdentityError::UnknownAccount(email.to_string()))?;
        if account.password != password {
            return Err(IdentityError::WrongPassword);
        }
        Ok(())
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, IdentityError> {
        let email = email.trim();
        self.check_credentials(email, password)?;
        let user = User {
            email: email.to_string(),
        };
        self.write_session(&user)?;
        info!(email = %user.email, "signed in");
        self.user = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<(), IdentityError> {
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "signed out");
        }
        if let Some(path) = &self.session_path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
