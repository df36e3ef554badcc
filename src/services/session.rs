use std::path::PathBuf;

use crate::model::User;

/// Source of the signed-in user. `None` means a guest session.
pub trait SessionSource {
    fn current_user(&self) -> Option<User>;
}

/// Reads the stored session document, e.g. `{"user": {"first_name": ...}}`
/// or the bare user object.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionSource for FileSession {
    fn current_user(&self) -> Option<User> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                log::debug!("No session at {}: {err}", self.path.display());
                return None;
            }
        };

        match parse_session(&content) {
            Ok(user) => user,
            Err(err) => {
                log::warn!("Ignoring unreadable session {}: {err}", self.path.display());
                None
            }
        }
    }
}

fn parse_session(content: &str) -> serde_json::Result<Option<User>> {
    let mut document: serde_json::Value = serde_json::from_str(content)?;
    match document.get_mut("user") {
        Some(user) => serde_json::from_value(user.take()),
        None => serde_json::from_value(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_session_is_guest() {
        let temp = tempdir().unwrap();
        let session = FileSession::new(temp.path().join("session.json"));
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_wrapped_and_bare_documents() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.json");

        std::fs::write(&path, r#"{"user": {"first_name": "Ann", "last_name": "Lee"}}"#).unwrap();
        let user = FileSession::new(&path).current_user().unwrap();
        assert_eq!(user.first_name, "Ann");

        std::fs::write(&path, r#"{"first_name": "Bo", "last_name": "Ng", "role": "doctor"}"#)
            .unwrap();
        let user = FileSession::new(&path).current_user().unwrap();
        assert_eq!(user.last_name, "Ng");

        std::fs::write(&path, r#"{"user": null}"#).unwrap();
        assert_eq!(FileSession::new(&path).current_user(), None);
    }

    #[test]
    fn test_corrupt_session_is_guest() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert_eq!(FileSession::new(path).current_user(), None);
    }
}
