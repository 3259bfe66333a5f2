use std::fmt;
use std::hash::{Hash, Hasher};
use zeroize::Zeroize;

/// A stored (website, login, password, code word) tuple.
///
/// Identity is the `(website, login)` pair: two entries with the same pair are
/// the same entry whatever their password or recovery phrase.
#[derive(Clone)]
pub struct CredentialEntry {
    website: String,
    login: String,
    secret: String,
    recovery_phrase: String,
}

impl CredentialEntry {
    pub fn new(
        website: impl Into<String>,
        login: impl Into<String>,
        secret: impl Into<String>,
        recovery_phrase: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            login: login.into(),
            secret: secret.into(),
            recovery_phrase: recovery_phrase.into(),
        }
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn recovery_phrase(&self) -> &str {
        &self.recovery_phrase
    }

    /// Replaces the password, scrubbing the previous value
    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret.zeroize();
        self.secret = secret.into();
    }

    /// Returns the password as one `*` per character.
    ///
    /// Characters are Unicode scalar values, so a password containing
    /// characters outside the BMP (e.g. emoji) masks to fewer stars than a
    /// UTF-16 length would give: "clé🔐" masks to 4 stars, not 5.
    pub fn masked_secret(&self) -> String {
        "*".repeat(self.secret.chars().count())
    }

    /// Returns a copy whose password is replaced by asterisks of equal length
    pub fn masked_view(&self) -> Self {
        Self {
            website: self.website.clone(),
            login: self.login.clone(),
            secret: self.masked_secret(),
            recovery_phrase: self.recovery_phrase.clone(),
        }
    }

    /// Returns a copy with the password exposed
    pub fn raw_view(&self) -> Self {
        self.clone()
    }

    /// Exact comparison against the stored recovery phrase
    pub(crate) fn matches_phrase(&self, phrase: &str) -> bool {
        self.recovery_phrase == phrase
    }

    pub(crate) fn is_same_entry(&self, website: &str, login: &str) -> bool {
        self.website == website && self.login == login
    }
}

impl PartialEq for CredentialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.website == other.website && self.login == other.login
    }
}

impl Eq for CredentialEntry {}

impl Hash for CredentialEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.website.hash(state);
        self.login.hash(state);
    }
}

/// Always masked, so an entry can be printed without leaking the password
impl fmt::Display for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Website: {}, Login: {}, Password: {}",
            self.website,
            self.login,
            self.masked_secret()
        )
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("website", &self.website)
            .field("login", &self.login)
            .field("secret", &"[REDACTED]")
            .field("recovery_phrase", &"[REDACTED]")
            .finish()
    }
}

impl Drop for CredentialEntry {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.recovery_phrase.zeroize();
    }
}
