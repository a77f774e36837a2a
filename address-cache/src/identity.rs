use sha2::{Digest, Sha256};
use std::fmt;
use strum_macros::{Display, EnumString};

const RECORD_EXTENSION: &str = ".json";

/// Longest file name most filesystems accept, in bytes
pub const MAX_RECORD_NAME_LEN: usize = 255;

/// How an identity is turned into a cache record name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum KeyScheme {
    /// SHA-256 of a length-prefixed encoding. No two distinct identities share
    /// a record.
    #[default]
    Hashed,
    /// `name_last`, made filename safe. `John_` + `Doe` and `John` + `_Doe`
    /// share a record. Names longer than [`MAX_RECORD_NAME_LEN`] use the
    /// hashed name instead.
    Legacy,
}

/// The person a cache record belongs to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    name: String,
    last: String,
}

impl IdentityKey {
    pub fn new(name: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last: last.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// Unambiguous text form, `{len}:{name}{len}:{last}` with byte lengths
    pub fn canonical(&self) -> String {
        format!(
            "{}:{}{}:{}",
            self.name.len(),
            self.name,
            self.last.len(),
            self.last
        )
    }

    /// Name of the record holding this identity's addresses
    pub fn record_name(&self, scheme: KeyScheme) -> String {
        match scheme {
            KeyScheme::Hashed => self.hashed_record_name(),
            KeyScheme::Legacy => {
                let joined = format!("{}_{}", self.name, self.last);
                let record = format!("{}{}", filenamify::filenamify(joined), RECORD_EXTENSION);
                if record.len() > MAX_RECORD_NAME_LEN {
                    self.hashed_record_name()
                } else {
                    record
                }
            }
        }
    }

    fn hashed_record_name(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        format!("{}{}", hex::encode(hasher.finalize()), RECORD_EXTENSION)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.last)
    }
}
