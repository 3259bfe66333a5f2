use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::core::entry::CredentialEntry;
use crate::core::error::{StoreError, StoreResult};

/// Operations every credential backend offers to the shell.
pub trait CredentialStorage: Send + Sync {
    /// Stores a new entry. Fails if the (website, login) pair already exists.
    fn save(&self, entry: CredentialEntry) -> StoreResult<()>;

    /// Replaces the entry with the same (website, login).
    /// Returns `false` and changes nothing when no such entry exists.
    fn update(&self, entry: CredentialEntry) -> bool;

    /// Masked copies of every entry for a website, in insertion order.
    fn list_by_website(&self, website: &str) -> Vec<CredentialEntry>;

    /// Unmasked copy of one entry, only if `recovery_phrase` matches.
    /// A wrong phrase and a missing entry both yield `None`.
    fn get_by_website_and_login(
        &self,
        website: &str,
        login: &str,
        recovery_phrase: &str,
    ) -> Option<CredentialEntry>;

    fn exists(&self, website: &str, login: &str) -> bool;
}

/// Lets several owners (threads, shells) drive one store
impl<T: CredentialStorage + ?Sized> CredentialStorage for Arc<T> {
    fn save(&self, entry: CredentialEntry) -> StoreResult<()> {
        (**self).save(entry)
    }

    fn update(&self, entry: CredentialEntry) -> bool {
        (**self).update(entry)
    }

    fn list_by_website(&self, website: &str) -> Vec<CredentialEntry> {
        (**self).list_by_website(website)
    }

    fn get_by_website_and_login(
        &self,
        website: &str,
        login: &str,
        recovery_phrase: &str,
    ) -> Option<CredentialEntry> {
        (**self).get_by_website_and_login(website, login, recovery_phrase)
    }

    fn exists(&self, website: &str, login: &str) -> bool {
        (**self).exists(website, login)
    }
}

/// Both maps live behind one lock so a reader never sees one updated without the other.
#[derive(Default)]
struct Inner {
    /// website -> entries in insertion order
    entries: HashMap<String, Vec<CredentialEntry>>,
    /// website -> logins present in `entries`
    logins: HashMap<String, HashSet<String>>,
}

impl Inner {
    fn contains(&self, website: &str, login: &str) -> bool {
        self.logins
            .get(website)
            .is_some_and(|logins| logins.contains(login))
    }
}

/// In-memory credential store, safe to share between threads.
#[derive(Default)]
pub struct CredentialStore {
    inner: RwLock<Inner>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation completes before anything that could panic, so a
    // poisoned lock still guards consistent maps.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Masked copies of all entries, grouped by website (sorted), then insertion order.
    pub fn all_entries(&self) -> Vec<CredentialEntry> {
        let inner = self.read();
        let mut websites: Vec<&String> = inner.entries.keys().collect();
        websites.sort();

        websites
            .into_iter()
            .flat_map(|website| inner.entries[website].iter())
            .map(CredentialEntry::masked_view)
            .collect()
    }

    /// Total number of stored entries
    pub fn len(&self) -> usize {
        self.read().entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStorage for CredentialStore {
    fn save(&self, entry: CredentialEntry) -> StoreResult<()> {
        let mut inner = self.write();

        if inner.contains(entry.website(), entry.login()) {
            warn!(
                website = entry.website(),
                login = entry.login(),
                "Rejected duplicate entry"
            );
            return Err(StoreError::DuplicateEntry {
                website: entry.website().to_string(),
                login: entry.login().to_string(),
            });
        }

        let website = entry.website().to_string();
        let login = entry.login().to_string();
        debug!(website = %website, login = %login, "Entry saved");
        inner.logins.entry(website.clone()).or_default().insert(login);
        inner.entries.entry(website).or_default().push(entry);

        Ok(())
    }

    fn update(&self, entry: CredentialEntry) -> bool {
        let mut inner = self.write();
        let website = entry.website().to_string();
        let login = entry.login().to_string();

        let Some(entries) = inner.entries.get_mut(&website) else {
            debug!(website = %website, login = %login, "Update skipped: unknown website");
            return false;
        };

        if !entries.iter().any(|e| e.is_same_entry(&website, &login)) {
            debug!(website = %website, login = %login, "Update skipped: unknown login");
            return false;
        }

        // Removes every match, so at most one entry per login survives
        entries.retain(|e| !e.is_same_entry(&website, &login));
        entries.push(entry);

        info!(website = %website, login = %login, "Entry updated");
        true
    }

    fn list_by_website(&self, website: &str) -> Vec<CredentialEntry> {
        self.read()
            .entries
            .get(website)
            .map(|entries| entries.iter().map(CredentialEntry::masked_view).collect())
            .unwrap_or_default()
    }

    fn get_by_website_and_login(
        &self,
        website: &str,
        login: &str,
        recovery_phrase: &str,
    ) -> Option<CredentialEntry> {
        let inner = self.read();
        let entry = inner
            .entries
            .get(website)?
            .iter()
            .find(|e| e.login() == login)?;

        if !entry.matches_phrase(recovery_phrase) {
            debug!(website, login, "Recovery phrase mismatch");
            return None;
        }

        Some(entry.raw_view())
    }

    fn exists(&self, website: &str, login: &str) -> bool {
        self.read().contains(website, login)
    }
}
