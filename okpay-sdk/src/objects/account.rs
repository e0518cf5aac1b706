use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Hive account names are capped at 16 characters.
pub const MAX_ACCOUNT_LEN: usize = 16;

/// Shortest account name the registry accepts.
pub const MIN_ACCOUNT_LEN: usize = 3;

const AVATAR_HOST: &str = "https://images.hive.blog/u";

/// A candidate recipient account, normalized from user input.
///
/// The only way to obtain one is [`AccountName::sanitize`], so every value is
/// lowercase, restricted to `a-z`, `0-9`, `-` and `.`, and at most
/// [`MAX_ACCOUNT_LEN`] characters long. It may still be empty or fail the
/// registry format rules; see [`AccountName::has_valid_format`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountName(CompactString);

impl AccountName {
    /// Normalize raw input into a candidate account name.
    ///
    /// Trims surrounding whitespace, lowercases, drops every character
    /// outside the account alphabet and truncates to [`MAX_ACCOUNT_LEN`].
    /// Total and idempotent.
    pub fn sanitize(raw: &str) -> Self {
        let name: CompactString = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| is_account_char(*c))
            .take(MAX_ACCOUNT_LEN)
            .collect();
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First character alphanumeric, then 2 to 15 characters from the
    /// account alphabet.
    pub fn has_valid_format(&self) -> bool {
        let mut chars = self.0.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return false;
        }
        (MIN_ACCOUNT_LEN..=MAX_ACCOUNT_LEN).contains(&self.0.len()) && chars.all(is_account_char)
    }

    /// Avatar image served by the Hive image proxy.
    ///
    /// The proxy answers with the image directly, so no lookup is needed.
    pub fn avatar_url(&self) -> String {
        format!("{AVATAR_HOST}/{}/avatar/original", self.0)
    }
}

impl std::fmt::Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn is_account_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.'
}

/// Account record as returned by `condenser_api.get_accounts`.
///
/// Only the fields okpay shows are decoded; everything else in the registry
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub hbd_balance: Option<String>,
}
