//! Interactive menu over a credential store
//!
//! Mirrors the confirm-before-update flow:
//! - `1` save a password (asks before overwriting an existing entry)
//! - `2` list masked passwords for a website
//! - `3` reveal one password with its code word
//! - `4` exit
//!
//! The shell works over any `BufRead`/`Write` pair so it can be driven by
//! stdin/stdout or by an in-memory buffer.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::core::config::ShellSettings;
use crate::core::entry::CredentialEntry;
use crate::core::store::CredentialStorage;

/// Outcome of one menu action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

pub struct Shell<S, R, W> {
    store: S,
    settings: ShellSettings,
    /// Read secrets through `rpassword` (only meaningful on a terminal)
    hide_input: bool,
    reader: R,
    writer: W,
}

impl<S, R, W> Shell<S, R, W>
where
    S: CredentialStorage,
    R: BufRead,
    W: Write,
{
    pub fn new(store: S, settings: ShellSettings, reader: R, writer: W) -> Self {
        Self {
            store,
            settings,
            hide_input: false,
            reader,
            writer,
        }
    }

    /// Enables no-echo secret input. Callers should only pass `true` when
    /// stdin is a terminal.
    pub fn with_hidden_input(mut self, hide: bool) -> Self {
        self.hide_input = hide && self.settings.hide_secret_input;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (S, W) {
        (self.store, self.writer)
    }

    /// Runs the menu until `4` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.writer, "=== Password Manager ===")?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            let step = match choice.as_str() {
                "1" => self.save_password()?,
                "2" => self.list_by_website()?,
                "3" => self.get_by_website_and_login()?,
                "4" => Step::Quit,
                other => {
                    debug!(choice = other, "Invalid menu choice");
                    writeln!(self.writer, "Invalid choice. Try again.")?;
                    Step::Continue
                }
            };

            if step == Step::Quit {
                break;
            }
        }

        writeln!(self.writer, "Exiting...")?;
        self.writer.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "Choose an action:")?;
        writeln!(self.writer, "1. Save password")?;
        writeln!(self.writer, "2. List passwords by website")?;
        writeln!(self.writer, "3. Get password by website and login")?;
        writeln!(self.writer, "4. Exit")?;
        write!(self.writer, "Your choice: ")?;
        self.writer.flush()?;
        Ok(())
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn save_password(&mut self) -> Result<Step> {
        writeln!(self.writer, "\n--- Save password ---")?;

        let Some(website) = self.prompt("Website: ")? else {
            return Ok(Step::Quit);
        };
        let Some(login) = self.prompt("Login: ")? else {
            return Ok(Step::Quit);
        };
        let Some(secret) = self.prompt_secret("Password: ")? else {
            return Ok(Step::Quit);
        };
        let Some(code_word) = self.prompt_secret("Code word: ")? else {
            return Ok(Step::Quit);
        };

        let entry = CredentialEntry::new(website, login, secret, code_word);

        if !self.store.exists(entry.website(), entry.login()) {
            match self.store.save(entry) {
                Ok(()) => writeln!(self.writer, "✅ Password saved")?,
                Err(e) => writeln!(self.writer, "Error: {}", e)?,
            }
            return Ok(Step::Continue);
        }

        writeln!(
            self.writer,
            "An entry for website '{}' and login '{}' already exists.",
            entry.website(),
            entry.login()
        )?;

        if self.settings.confirm_update {
            let Some(answer) = self.prompt("Update password? (yes/no): ")? else {
                return Ok(Step::Quit);
            };
            if !(answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")) {
                writeln!(self.writer, "Update cancelled.")?;
                return Ok(Step::Continue);
            }
        }

        info!(website = entry.website(), login = entry.login(), "Updating entry from shell");
        if self.store.update(entry) {
            writeln!(self.writer, "✅ Password updated")?;
        } else {
            writeln!(self.writer, "Error: entry no longer exists")?;
        }
        Ok(Step::Continue)
    }

    fn list_by_website(&mut self) -> Result<Step> {
        writeln!(self.writer, "\n--- Passwords by website ---")?;

        let Some(website) = self.prompt("Website: ")? else {
            return Ok(Step::Quit);
        };

        let entries = self.store.list_by_website(&website);
        if entries.is_empty() {
            writeln!(self.writer, "No passwords found for website '{}'.", website)?;
        } else {
            writeln!(self.writer, "Found entries (passwords masked):")?;
            for (i, entry) in entries.iter().enumerate() {
                writeln!(self.writer, "{}. {}", i + 1, entry)?;
            }
        }
        Ok(Step::Continue)
    }

    fn get_by_website_and_login(&mut self) -> Result<Step> {
        writeln!(self.writer, "\n--- Password by website and login ---")?;

        let Some(website) = self.prompt("Website: ")? else {
            return Ok(Step::Quit);
        };
        let Some(login) = self.prompt("Login: ")? else {
            return Ok(Step::Quit);
        };
        let Some(code_word) = self.prompt_secret("Code word: ")? else {
            return Ok(Step::Quit);
        };

        match self
            .store
            .get_by_website_and_login(&website, &login, &code_word)
        {
            Some(entry) => {
                writeln!(self.writer, "Password found:")?;
                writeln!(
                    self.writer,
                    "Website: {}, Login: {}, Password: {}",
                    entry.website(),
                    entry.login(),
                    entry.secret()
                )?;
            }
            None => writeln!(self.writer, "Password not found or wrong code word.")?,
        }
        Ok(Step::Continue)
    }

    // ========================================================================
    // INPUT HELPERS
    // ========================================================================

    /// Reads one trimmed line; `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", label)?;
        self.writer.flush()?;
        self.read_line()
    }

    fn prompt_secret(&mut self, label: &str) -> Result<Option<String>> {
        if !self.hide_input {
            return self.prompt(label);
        }

        // Hidden input is only enabled on a terminal. In canonical mode each
        // read returns one line, so the buffered reader never holds lines
        // typed ahead and /dev/tty sees them in order.
        write!(self.writer, "{}", label)?;
        self.writer.flush()?;
        let value = rpassword::read_password().context("Failed to read hidden input")?;
        Ok(Some(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CredentialStore;
    use std::io::Cursor;

    fn run_script(
        store: CredentialStore,
        settings: ShellSettings,
        script: &str,
    ) -> (CredentialStore, String) {
        let input = Cursor::new(script.to_string());
        let mut shell = Shell::new(store, settings, input, Vec::new());
        shell.run().expect("Shell should not fail on in-memory IO");
        let (store, out) = shell.into_parts();
        (store, String::from_utf8(out).unwrap())
    }

    fn run_default(script: &str) -> (CredentialStore, String) {
        run_script(CredentialStore::new(), ShellSettings::default(), script)
    }

    #[test]
    fn test_save_then_list_masked() {
        let (store, out) = run_default("1\ntest.com\nuser\n123456789\ncode\n2\ntest.com\n4\n");

        assert!(store.exists("test.com", "user"));
        assert!(out.contains("✅ Password saved"));
        assert!(out.contains("1. Website: test.com, Login: user, Password: *********"));
        assert!(!out.contains("123456789"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_get_with_code_word() {
        let (_, out) = run_default(
            "1\ngithub.com\ndev\ndevpass456\ncode123\n\
             3\ngithub.com\ndev\ncode123\n\
             3\ngithub.com\ndev\nwrongcode\n4\n",
        );

        assert!(out.contains("Website: github.com, Login: dev, Password: devpass456"));
        assert!(out.contains("Password not found or wrong code word."));
    }

    #[test]
    fn test_existing_entry_update_confirmed() {
        let (store, out) = run_default(
            "1\nfacebook.com\nuser\noldpass\ncode\n\
             1\nfacebook.com\nuser\nnewpass\ncode\nY\n4\n",
        );

        assert!(out.contains("already exists"));
        assert!(out.contains("✅ Password updated"));
        let entry = store
            .get_by_website_and_login("facebook.com", "user", "code")
            .unwrap();
        assert_eq!(entry.secret(), "newpass");
    }

    #[test]
    fn test_existing_entry_update_declined() {
        let (store, out) = run_default(
            "1\nfacebook.com\nuser\noldpass\ncode\n\
             1\nfacebook.com\nuser\nnewpass\ncode\nno\n4\n",
        );

        assert!(out.contains("Update cancelled."));
        let entry = store
            .get_by_website_and_login("facebook.com", "user", "code")
            .unwrap();
        assert_eq!(entry.secret(), "oldpass");
    }

    #[test]
    fn test_update_without_confirmation() {
        let settings = ShellSettings {
            confirm_update: false,
            ..Default::default()
        };
        let (store, out) = run_script(
            CredentialStore::new(),
            settings,
            "1\na.com\nuser\nold\ncode\n1\na.com\nuser\nnew\ncode\n4\n",
        );

        assert!(!out.contains("(yes/no)"));
        let entry = store.get_by_website_and_login("a.com", "user", "code").unwrap();
        assert_eq!(entry.secret(), "new");
    }

    #[test]
    fn test_unknown_website_and_invalid_choice() {
        let (_, out) = run_default("9\n2\nnonexistent.com\n4\n");

        assert!(out.contains("Invalid choice. Try again."));
        assert!(out.contains("No passwords found for website 'nonexistent.com'."));
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let (store, _) = run_default("1\n  spaced.com \n user \n pw \n code \n4\n");

        assert!(store.exists("spaced.com", "user"));
        assert_eq!(
            store
                .get_by_website_and_login("spaced.com", "user", "code")
                .unwrap()
                .secret(),
            "pw"
        );
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (store, out) = run_default("1\nhalf.com\nuser\n");

        assert!(store.is_empty());
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_hidden_input_respects_settings() {
        let settings = ShellSettings {
            hide_secret_input: false,
            ..Default::default()
        };
        let input = Cursor::new(String::new());
        let shell = Shell::new(CredentialStore::new(), settings, input, Vec::<u8>::new())
            .with_hidden_input(true);
        assert!(!shell.hide_input);
    }

    #[test]
    fn test_shell_over_shared_store() {
        let store = std::sync::Arc::new(CredentialStore::new());
        let mut shell = Shell::new(
            std::sync::Arc::clone(&store),
            ShellSettings::default(),
            Cursor::new("1\nshared.com\nuser\npw\ncode\n4\n".to_string()),
            Vec::<u8>::new(),
        );
        shell.run().unwrap();

        assert!(store.exists("shared.com", "user"));
    }
}
