use serde::{Deserialize, Serialize};

const GUEST_NAME: &str = "Guest User";
const GUEST_INITIALS: &str = "GU";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Header identity for the signed-in user, or the guest when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub initials: String,
    pub greeting_name: String,
}

impl Identity {
    pub fn from_user(user: Option<&User>) -> Self {
        let Some(user) = user else {
            return Self::guest();
        };

        let name = format!("{} {}", user.first_name.trim(), user.last_name.trim())
            .trim()
            .to_string();
        if name.is_empty() {
            return Self::guest();
        }

        let initials: String = [&user.first_name, &user.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        let greeting_name = match user.first_name.trim() {
            "" => "User".to_string(),
            first => first.to_string(),
        };

        Self {
            name,
            initials,
            greeting_name,
        }
    }

    pub fn guest() -> Self {
        Self {
            name: GUEST_NAME.to_string(),
            initials: GUEST_INITIALS.to_string(),
            greeting_name: "User".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_user_is_guest() {
        let identity = Identity::from_user(None);
        assert_eq!(identity.name, "Guest User");
        assert_eq!(identity.initials, "GU");
    }

    #[test]
    fn test_initials_from_names() {
        let user = User {
            first_name: "ann".into(),
            last_name: "Lee".into(),
        };
        let identity = Identity::from_user(Some(&user));
        assert_eq!(identity.initials, "AL");
        assert_eq!(identity.name, "ann Lee");
        assert_eq!(identity.greeting_name, "ann");
    }

    #[test]
    fn test_partial_and_empty_names() {
        let user = User {
            first_name: String::new(),
            last_name: "Diaz".into(),
        };
        let identity = Identity::from_user(Some(&user));
        assert_eq!(identity.initials, "D");
        assert_eq!(identity.greeting_name, "User");

        let blank = User {
            first_name: " ".into(),
            last_name: String::new(),
        };
        assert_eq!(Identity::from_user(Some(&blank)), Identity::guest());
    }
}
