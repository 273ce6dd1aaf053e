//! Per-row fields exposed to presenters.

use serde::Serialize;
use url::Url;

/// A named field that can be read for any row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    FileName,
    FilePath,
    FileUrl,
    FileType,
    Selected,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::FileName,
        Role::FilePath,
        Role::FileUrl,
        Role::FileType,
        Role::Selected,
    ];

    /// The name presenters use to look the field up.
    pub fn name(self) -> &'static str {
        match self {
            Role::FileName => "fileName",
            Role::FilePath => "filePath",
            Role::FileUrl => "fileURL",
            Role::FileType => "fileType",
            Role::Selected => "selected",
        }
    }

    /// Resolves a field name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.name() == name)
    }
}

/// Returns the fixed role/name table.
pub fn role_names() -> Vec<(Role, &'static str)> {
    Role::ALL.into_iter().map(|r| (r, r.name())).collect()
}

/// Value of a [`Role`] for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RoleValue {
    Text(String),
    Url(Url),
    Bool(bool),
}

impl RoleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RoleValue::Text(s) => Some(s),
            RoleValue::Url(u) => Some(u.as_str()),
            RoleValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RoleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.name()), Some(role));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Role::from_name("size"), None);
        assert_eq!(Role::from_name("FileName"), None);
    }

    #[test]
    fn role_names_table() {
        let table = role_names();
        assert_eq!(table.len(), 5);
        assert!(table.contains(&(Role::FileUrl, "fileURL")));
    }

    #[test]
    fn role_value_accessors() {
        assert_eq!(RoleValue::Text("a".into()).as_str(), Some("a"));
        assert_eq!(RoleValue::Bool(true).as_bool(), Some(true));
        assert_eq!(RoleValue::Bool(true).as_str(), None);
    }

    #[test]
    fn role_value_serializes_untagged() {
        let json = serde_json::to_string(&RoleValue::Bool(false)).unwrap();
        assert_eq!(json, "false");
    }
}
