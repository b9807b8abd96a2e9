use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameParts {
    pub first_name: String,
    pub last_name: String,
}

/// Splits on single spaces: the first token is the first name, everything
/// after it (rejoined with a space) is the last name.
pub fn split_full_name(full_name: &str) -> NameParts {
    let mut tokens = full_name.split(' ');
    let first_name = tokens.next().unwrap_or_default().to_string();
    let last_name = tokens.collect::<Vec<_>>().join(" ");
    NameParts {
        first_name,
        last_name,
    }
}
