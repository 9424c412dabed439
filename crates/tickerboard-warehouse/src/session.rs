use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::WarehouseError;

const MAX_USER_ID_LEN: usize = 128;

/// Identity that owns scraps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, WarehouseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(WarehouseError::InvalidRecord(String::from(
                "user id cannot be empty",
            )));
        }
        if trimmed.chars().count() > MAX_USER_ID_LEN {
            return Err(WarehouseError::InvalidRecord(format!(
                "user id exceeds {MAX_USER_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = WarehouseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Identity collaborator: who is signed in, and how to stop being signed in.
pub trait SessionProvider {
    fn current_user(&self) -> Result<Option<UserId>, WarehouseError>;

    fn sign_out(&self) -> Result<(), WarehouseError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    user_id: Option<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

/// Session persisted as JSON under the tickerboard home.
///
/// With no session file, the fallback user (if any) counts as signed in.
/// Signing out writes an explicit empty session so the fallback stops applying.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
    fallback_user: Option<UserId>,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_user: None,
        }
    }

    pub fn with_fallback_user(mut self, user: Option<UserId>) -> Self {
        self.fallback_user = user;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sign_in(&self, user: &UserId) -> Result<(), WarehouseError> {
        self.write(Some(user.clone()))?;
        info!(user = %user, "signed in");
        Ok(())
    }

    fn read(&self) -> Result<Option<SessionFile>, WarehouseError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, user_id: Option<UserId>) -> Result<(), WarehouseError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let session = SessionFile {
            user_id,
            updated_at: OffsetDateTime::now_utc(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&session)?)?;
        Ok(())
    }
}

impl SessionProvider for FileSession {
    fn current_user(&self) -> Result<Option<UserId>, WarehouseError> {
        match self.read()? {
            Some(session) => Ok(session.user_id),
            None => Ok(self.fallback_user.clone()),
        }
    }

    fn sign_out(&self) -> Result<(), WarehouseError> {
        self.write(None)?;
        info!(path = %self.path.display(), "signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fallback_user_applies_until_sign_out() {
        let temp = tempdir().expect("tempdir");
        let session = FileSession::new(temp.path().join("session.json"))
            .with_fallback_user(Some(UserId::parse("env-user").expect("valid")));

        assert_eq!(
            session.current_user().expect("read").map(String::from),
            Some(String::from("env-user"))
        );

        session.sign_out().expect("sign out");
        assert_eq!(session.current_user().expect("read"), None);
    }

    #[test]
    fn sign_in_replaces_previous_user() {
        let temp = tempdir().expect("tempdir");
        let session = FileSession::new(temp.path().join("nested").join("session.json"));
        assert_eq!(session.current_user().expect("read"), None);

        let user = UserId::parse("  alice ").expect("valid");
        session.sign_in(&user).expect("sign in");
        assert_eq!(session.current_user().expect("read"), Some(user));
    }

    #[test]
    fn corrupt_session_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("session.json");
        fs::write(&path, "not json").expect("write");

        let err = FileSession::new(path).current_user().expect_err("must fail");
        assert!(matches!(err, WarehouseError::Session(_)));
    }
}
