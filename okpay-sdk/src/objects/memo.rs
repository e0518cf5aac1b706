use rand::Rng;
use serde::{Deserialize, Serialize};

const MEMO_PREFIX: &str = "kcs-hpos";

/// Correlation token attached to every transfer of a session.
///
/// Format is `kcs-hpos-dddd-dddd`. Not a secret: the two groups are drawn
/// from a non-cryptographic generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memo(String);

impl Memo {
    /// Draw a fresh memo.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let first: u16 = rng.random_range(0..10_000);
        let second: u16 = rng.random_range(0..10_000);
        Self(format!("{MEMO_PREFIX}-{first:04}-{second:04}"))
    }

    /// Accept a previously persisted memo if it still has the memo format.
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix(MEMO_PREFIX)?.strip_prefix('-')?;
        let (first, second) = rest.split_once('-')?;
        let is_group = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
        (is_group(first) && is_group(second)).then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Memo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_memo_format(s: &str) -> bool {
        let bytes = s.as_bytes();
        s.len() == 18
            && s.starts_with("kcs-hpos-")
            && bytes[13] == b'-'
            && bytes[9..13].iter().all(u8::is_ascii_digit)
            && bytes[14..18].iter().all(u8::is_ascii_digit)
    }

    #[test]
    fn test_generated_memo_format() {
        for _ in 0..1000 {
            let memo = Memo::generate();
            assert!(matches_memo_format(memo.as_str()), "bad memo {memo}");
        }
    }

    #[test]
    fn test_parse_persisted_memo() {
        assert!(Memo::parse("kcs-hpos-0042-9999").is_some());
        assert!(Memo::parse("kcs-hpos-42-9999").is_none());
        assert!(Memo::parse("kcs-hpos-00a2-9999").is_none());
        assert!(Memo::parse("kcs-hpos-0042-99999").is_none());
        assert!(Memo::parse("okpay-0042-9999").is_none());
        assert!(Memo::parse("").is_none());

        let memo = Memo::generate();
        assert_eq!(Memo::parse(memo.as_str()), Some(memo));
    }
}
