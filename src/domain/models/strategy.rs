use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How rule-matched users combine with the issue's existing assignees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep existing assignees and add every matched user
    #[default]
    Append,
    /// Only assign issues that have no assignee yet
    Set,
    /// Replace the assignees with the matched users
    Change,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Append, Self::Set, Self::Change];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Set => "set",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "set" => Ok(Self::Set),
            "change" => Ok(Self::Change),
            other => Err(format!(
                "invalid strategy '{other}' (expected append, set or change)"
            )),
        }
    }
}
