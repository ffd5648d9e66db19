/// Author of a message, as identified by the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    /// Bot accounts never trigger commands or auto-responses
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            is_bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Two users are the same author when their transport ids match;
    /// display fields may change between events.
    pub fn same_author(&self, other: &User) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_author_compares_ids_only() {
        let a = User::new("7").with_username("old");
        let b = User::new("7").with_username("new");
        assert!(a.same_author(&b));
        assert!(!a.same_author(&User::new("8")));
    }
}
