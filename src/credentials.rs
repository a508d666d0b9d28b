//! Remote store credential storage via the OS keyring.
//!
//! Resolution order for the remote password:
//!
//! 1. if `--prompt-password` was given, skip the keyring and ask;
//! 2. otherwise the stored keyring entry, when one exists;
//! 3. otherwise an interactive prompt.
//!
//! A password obtained from the prompt is written back to the keyring so the
//! next run finds it. A keyring that is unavailable (no Secret Service
//! provider, locked, ...) downgrades to the prompt with a warning rather
//! than failing the run.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "reelsync.remote";

fn entry(user: &str) -> Result<Entry> {
    Entry::new(SERVICE_NAME, user)
        .with_context(|| format!("failed to create keyring entry for user '{user}'"))
}

/// The stored password for a user, if the keyring holds one.
pub fn stored_password(user: &str) -> Result<Option<String>> {
    match entry(user)?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read keyring entry for '{user}'")),
    }
}

/// Store the password for a user in the keyring.
pub fn store_password(user: &str, password: &str) -> Result<()> {
    entry(user)?
        .set_password(password)
        .with_context(|| format!("failed to store keyring entry for '{user}'"))
}

/// Resolve the remote password for a user.
pub fn resolve_password(user: &str, prompt_password: bool) -> Result<String> {
    if !prompt_password {
        match stored_password(user) {
            Ok(Some(password)) => return Ok(password),
            Ok(None) => log::debug!("no stored password for '{user}'"),
            Err(err) => log::warn!("keyring unavailable, falling back to prompt: {err:#}"),
        }
    }

    eprint!("Password for {user}: ");
    io::stderr().flush().ok();
    let stdin = io::stdin();
    let password = read_password(&mut stdin.lock())?;

    if let Err(err) = store_password(user, &password) {
        log::warn!("could not save password to the keyring: {err:#}");
    }
    Ok(password)
}

fn read_password(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
