use std::fmt;

/// Represents a chat user on either platform
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            display_name: None,
            is_bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    pub fn name(&self) -> String {
        if let Some(ref display) = self.display_name {
            display.clone()
        } else if let Some(ref username) = self.username {
            username.clone()
        } else {
            self.id.clone()
        }
    }

    /// IRC nicknames arrive lowercase; replies address users with the
    /// first letter upper-cased.
    pub fn capitalized(&self) -> String {
        capitalize(&self.name())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first letter of every whitespace separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_precedence() {
        let user = User::new("42");
        assert_eq!(user.name(), "42");

        let user = user.with_username("harmon758");
        assert_eq!(user.name(), "harmon758");
        assert_eq!(user.capitalized(), "Harmon758");

        let user = user.with_display_name("Harmon");
        assert_eq!(user.to_string(), "Harmon");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the  whole CHAT"), "The Whole Chat");
        assert_eq!(capitalize(""), "");
    }
}
