// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Account persistence.
//!
//! Each role keeps its accounts under its own directory, one record file per
//! account, plus an append-only index of `email:nickname` lines. The role of a
//! nickname is resolved by scanning the three indexes, which also enforces
//! that emails and nicknames are unique across every role.
//!
//! # Record format
//!
//! ```text
//! Email: k@x.com
//! Nickname: kdot
//! Password: Kdot123!
//! Role: Artist
//! Approved: true
//! ```
//!
//! `Approved` is only present for artists. Users additionally own a
//! `followings.txt` (`Following:a,b`) and artists a `followers.txt`
//! (`Followers:a,b`).

pub mod validate;

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    error::{IoResultExt, PlatformError, Result},
    model::{Account, Credentials, Role},
    store::{self, layout::Layout},
};

const FOLLOWING_KEY: &str = "Following";
const FOLLOWERS_KEY: &str = "Followers";

/// One `email:nickname` line of a role index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    email: String,
    nickname: String,
}

impl IndexEntry {
    fn parse(line: &str) -> Option<Self> {
        let (email, nickname) = line.trim().split_once(':')?;
        if email.is_empty() || nickname.is_empty() {
            return None;
        }
        Some(Self {
            email: email.to_string(),
            nickname: nickname.to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{}:{}", self.email, self.nickname)
    }
}

pub struct AccountStore {
    layout: Layout,
}

impl AccountStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Whether the email or the nickname is used by any account of any role.
    pub fn is_email_or_nickname_taken(&self, email: &str, nickname: &str) -> Result<bool> {
        let email = email.trim().to_lowercase();
        let nickname = nickname.trim().to_lowercase();

        for role in Role::ALL {
            if self
                .index_entries(role)?
                .iter()
                .any(|e| e.email == email || e.nickname == nickname)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_nickname_taken(&self, nickname: &str) -> Result<bool> {
        Ok(self.locate_nickname(nickname)?.is_some())
    }

    /// Persists a new account.
    ///
    /// Besides the record file and index line this creates the role's side
    /// files: an empty following list for users, and an empty follower list
    /// plus `singles/` and `albums/` for artists.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::Validation`] if the credentials are malformed.
    /// * [`PlatformError::Conflict`] if the email or nickname is taken.
    pub fn save_account(&mut self, account: &Account) -> Result<()> {
        let creds = account.credentials();
        validate::validate_credentials(creds)?;

        if self.is_email_or_nickname_taken(&creds.email, &creds.nickname)? {
            return Err(PlatformError::Conflict(format!(
                "account with email {} or nickname {}",
                creds.email, creds.nickname
            )));
        }

        let role = account.role();
        store::ensure_dir(&self.layout.account_dir(role, &creds.nickname))?;
        self.write_account(account)?;

        let entry = IndexEntry {
            email: creds.email.clone(),
            nickname: creds.nickname.clone(),
        };
        store::append_line(&self.layout.index_file(role), &entry.to_line())?;

        match account {
            Account::User(user) => {
                self.write_name_list(
                    &self.layout.followings_file(&creds.nickname),
                    FOLLOWING_KEY,
                    &user.followings,
                )?;
            }
            Account::Artist(_) => {
                self.write_name_list(
                    &self.layout.followers_file(&creds.nickname),
                    FOLLOWERS_KEY,
                    &BTreeSet::new(),
                )?;
                store::ensure_dir(&self.layout.singles_dir(&creds.nickname))?;
                store::ensure_dir(&self.layout.albums_dir(&creds.nickname))?;
            }
            Account::Admin(_) => {}
        }

        info!(nickname = %creds.nickname, role = %role, "account created");
        Ok(())
    }

    pub fn register_user(&mut self, email: &str, nickname: &str, password: &str) -> Result<Account> {
        let account = Account::user(Credentials::new(email, nickname, password));
        self.save_account(&account)?;
        Ok(account)
    }

    /// Creates the configured admin account unless it already exists.
    pub fn ensure_admin(&mut self, config: &AppConfig) -> Result<Account> {
        let nickname = config.admin_nickname.trim().to_lowercase();

        if self.is_nickname_taken(&nickname)? {
            let account = self.load_account_by_nickname(&nickname)?;
            if account.role() != Role::Admin {
                return Err(PlatformError::Conflict(format!(
                    "nickname {nickname} reserved for the admin"
                )));
            }
            debug!(nickname = %nickname, "admin account already present");
            return Ok(account);
        }

        let account = Account::admin(Credentials::new(
            &config.admin_email,
            &nickname,
            &config.admin_password,
        ));
        self.save_account(&account)?;
        Ok(account)
    }

    /// Loads the account registered under `nickname`, whatever its role.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::NotFound`] if no index lists the nickname or its
    ///   record file is missing.
    /// * [`PlatformError::CorruptData`] if the record lacks a required field.
    pub fn load_account_by_nickname(&self, nickname: &str) -> Result<Account> {
        let nickname = nickname.trim().to_lowercase();
        let (role, entry) = self
            .locate_nickname(&nickname)?
            .ok_or_else(|| PlatformError::not_found("account", &nickname))?;

        self.read_account(role, &entry)
    }

    /// Looks up an account by email.
    ///
    /// Returns `Ok(None)` when the email is not registered, and an error when
    /// it is registered but its record cannot be read.
    pub fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = email.trim().to_lowercase();

        for role in Role::ALL {
            if let Some(entry) = self.index_entries(role)?.into_iter().find(|e| e.email == email) {
                return self.read_account(role, &entry).map(Some);
            }
        }
        Ok(None)
    }

    /// Checks a username (nickname or email) and password.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::NotFound`] if no such account exists.
    /// * [`PlatformError::InvalidCredentials`] on a password mismatch.
    /// * [`PlatformError::NotApproved`] for an artist awaiting approval.
    pub fn login(&self, username: &str, password: &str) -> Result<Account> {
        let username = username.trim().to_lowercase();
        if username.is_empty() {
            return Err(PlatformError::validation("username", "must not be empty"));
        }

        let account = if username.contains('@') {
            self.find_by_email(&username)?
                .ok_or_else(|| PlatformError::not_found("account", &username))?
        } else {
            self.load_account_by_nickname(&username)?
        };

        if account.credentials().password != password {
            warn!(username = %username, "failed login");
            return Err(PlatformError::InvalidCredentials);
        }

        if let Account::Artist(artist) = &account {
            if !artist.approved {
                return Err(PlatformError::NotApproved(artist.credentials.nickname.clone()));
            }
        }

        info!(nickname = %account.nickname(), role = %account.role(), "logged in");
        Ok(account)
    }

    pub fn change_password(&mut self, nickname: &str, old: &str, new: &str) -> Result<Account> {
        let mut account = self.load_account_by_nickname(nickname)?;
        if account.credentials().password != old {
            return Err(PlatformError::InvalidCredentials);
        }
        validate::validate_password(new)?;

        account.credentials_mut().password = new.to_string();
        self.write_account(&account)?;

        info!(nickname = %account.nickname(), "password changed");
        Ok(account)
    }

    /// Renames a user account.
    ///
    /// The user's directory and record file move to the new nickname, the
    /// index line is rewritten, and the follower lists of every artist the
    /// user follows are updated.
    pub fn change_user_nickname(&mut self, old: &str, new: &str) -> Result<Account> {
        let new = new.trim().to_lowercase();
        validate::validate_nickname(&new)?;

        let account = self.load_account_by_nickname(old)?;
        let Account::User(mut user) = account else {
            return Err(PlatformError::validation(
                "nickname",
                "only user accounts can change their nickname",
            ));
        };
        if self.is_nickname_taken(&new)? {
            return Err(PlatformError::Conflict(format!("nickname {new}")));
        }

        let old = user.credentials.nickname.clone();
        let email = user.credentials.email.clone();

        let old_dir = self.layout.account_dir(Role::User, &old);
        let new_dir = self.layout.account_dir(Role::User, &new);
        store::move_path(&old_dir, &new_dir)?;

        let moved_record = new_dir.join(format!("{old}-{email}.txt"));
        std::fs::remove_file(&moved_record).at(&moved_record)?;

        user.credentials.nickname = new.clone();
        let account = Account::User(user);
        self.write_account(&account)?;

        let index = self.layout.index_file(Role::User);
        let lines: Vec<String> = self
            .index_entries(Role::User)?
            .into_iter()
            .map(|mut e| {
                if e.nickname == old {
                    e.nickname = new.clone();
                }
                e.to_line()
            })
            .collect();
        store::write_record(&index, &lines)?;

        if let Account::User(user) = &account {
            for artist in &user.followings {
                let mut followers = self.load_followers(artist)?;
                if followers.remove(&old) {
                    followers.insert(new.clone());
                    self.write_name_list(&self.layout.followers_file(artist), FOLLOWERS_KEY, &followers)?;
                }
            }
        }

        info!(old = %old, new = %new, "user renamed");
        Ok(account)
    }

    pub fn follow_artist(&mut self, user: &str, artist: &str) -> Result<()> {
        self.update_following(user, artist, true)
    }

    pub fn unfollow_artist(&mut self, user: &str, artist: &str) -> Result<()> {
        self.update_following(user, artist, false)
    }

    fn update_following(&mut self, user: &str, artist: &str, follow: bool) -> Result<()> {
        let user = self.load_account_by_nickname(user)?;
        if user.role() != Role::User {
            return Err(PlatformError::validation("user", "only users can follow artists"));
        }
        let artist = self.load_account_by_nickname(artist)?;
        if artist.role() != Role::Artist {
            return Err(PlatformError::validation(
                "artist",
                format!("{} is not an artist", artist.nickname()),
            ));
        }

        let mut followings = self.load_followings(user.nickname())?;
        let mut followers = self.load_followers(artist.nickname())?;

        if follow {
            followings.insert(artist.nickname().to_string());
            followers.insert(user.nickname().to_string());
        } else {
            followings.remove(artist.nickname());
            followers.remove(user.nickname());
        }

        self.write_name_list(&self.layout.followings_file(user.nickname()), FOLLOWING_KEY, &followings)?;
        self.write_name_list(&self.layout.followers_file(artist.nickname()), FOLLOWERS_KEY, &followers)?;

        debug!(user = %user.nickname(), artist = %artist.nickname(), follow, "following updated");
        Ok(())
    }

    pub fn load_followings(&self, user: &str) -> Result<BTreeSet<String>> {
        let path = self.layout.followings_file(&user.to_lowercase());
        Ok(read_name_list(&store::read_file(&path), FOLLOWING_KEY))
    }

    pub fn load_followers(&self, artist: &str) -> Result<BTreeSet<String>> {
        let path = self.layout.followers_file(&artist.to_lowercase());
        Ok(read_name_list(&store::read_file(&path), FOLLOWERS_KEY))
    }

    /// Recovers an artist's email, falling back to the record file name when
    /// the index has no entry. Returns `None` if neither source has it.
    pub fn artist_email(&self, nickname: &str) -> Option<String> {
        let nickname = nickname.trim().to_lowercase();

        match self.index_entries(Role::Artist) {
            Ok(entries) => {
                if let Some(entry) = entries.into_iter().find(|e| e.nickname == nickname) {
                    return Some(entry.email);
                }
            }
            Err(e) => warn!(error = %e, "unable to read artist index"),
        }

        let prefix = format!("{nickname}-");
        let files = match store::child_files(&self.layout.artist_dir(&nickname)) {
            Ok(files) => files,
            Err(e) => {
                warn!(artist = %nickname, error = %e, "unable to scan artist directory");
                return None;
            }
        };

        let email = files.iter().find_map(|name| {
            name.strip_prefix(&prefix)?
                .strip_suffix(".txt")
                .filter(|email| email.contains('@'))
                .map(str::to_string)
        });
        if email.is_none() {
            warn!(artist = %nickname, "no email recorded for artist");
        }
        email
    }

    /// Every account registered under `role`, in index order.
    pub fn list_accounts(&self, role: Role) -> Result<Vec<Account>> {
        self.index_entries(role)?
            .iter()
            .map(|entry| self.read_account(role, entry))
            .collect()
    }

    pub fn list_artists(&self) -> Result<Vec<Account>> {
        self.list_accounts(Role::Artist)
    }

    fn index_entries(&self, role: Role) -> Result<Vec<IndexEntry>> {
        let path = self.layout.index_file(role);
        if !path.exists() {
            return Ok(vec![]);
        }

        let entries = store::read_record(&path)?
            .iter()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let entry = IndexEntry::parse(line);
                if entry.is_none() {
                    warn!(path = %path.display(), line = %line, "skipping malformed index line");
                }
                entry
            })
            .collect();
        Ok(entries)
    }

    fn locate_nickname(&self, nickname: &str) -> Result<Option<(Role, IndexEntry)>> {
        for role in Role::ALL {
            if let Some(entry) = self
                .index_entries(role)?
                .into_iter()
                .find(|e| e.nickname == nickname)
            {
                return Ok(Some((role, entry)));
            }
        }
        Ok(None)
    }

    fn read_account(&self, role: Role, entry: &IndexEntry) -> Result<Account> {
        let path = self.layout.account_file(role, &entry.nickname, &entry.email);
        let lines = store::read_record(&path)?;

        let credentials = Credentials {
            email: store::require_field(&lines, "Email", &path)?.to_string(),
            nickname: store::require_field(&lines, "Nickname", &path)?.to_string(),
            password: store::require_field(&lines, "Password", &path)?.to_string(),
        };

        if let Some(stored) = store::extract_field(&lines, "Role") {
            if stored.parse::<Role>().ok() != Some(role) {
                return Err(PlatformError::corrupt(
                    &path,
                    format!("role {stored} does not match index {role}"),
                ));
            }
        }

        let account = match role {
            Role::User => {
                let mut account = Account::user(credentials);
                if let Account::User(user) = &mut account {
                    user.followings = self.load_followings(&entry.nickname)?;
                }
                account
            }
            Role::Artist => {
                let approved = match store::require_field(&lines, "Approved", &path)?.trim() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(PlatformError::corrupt(&path, format!("Approved is {other}")));
                    }
                };
                Account::artist(credentials, approved)
            }
            Role::Admin => Account::admin(credentials),
        };

        Ok(account)
    }

    fn write_account(&self, account: &Account) -> Result<()> {
        let creds = account.credentials();
        let role = account.role();
        let path = self.layout.account_file(role, &creds.nickname, &creds.email);

        let mut lines = vec![
            store::format_field("Email", &creds.email),
            store::format_field("Nickname", &creds.nickname),
            store::format_field("Password", &creds.password),
            store::format_field("Role", role),
        ];
        if let Account::Artist(artist) = account {
            lines.push(store::format_field("Approved", artist.approved));
        }

        store::write_record(&path, &lines)
    }

    fn write_name_list(
        &self,
        path: &std::path::Path,
        key: &str,
        names: &BTreeSet<String>,
    ) -> Result<()> {
        let joined = names.iter().cloned().collect::<Vec<_>>().join(",");
        store::write_record(path, &[format!("{key}:{joined}")])
    }
}

fn read_name_list(lines: &[String], key: &str) -> BTreeSet<String> {
    store::extract_field(lines, key)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AccountStore) {
        let dir = TempDir::new().unwrap();
        let accounts = AccountStore::new(Layout::new(dir.path()));
        (dir, accounts)
    }

    #[test]
    fn saved_account_round_trips() {
        let (_dir, mut accounts) = store();
        accounts.register_user("Fan@X.com", "Fan1", "Passw0rd!").unwrap();

        let loaded = accounts.load_account_by_nickname("FAN1").unwrap();
        assert_eq!(loaded.email(), "fan@x.com");
        assert_eq!(loaded.nickname(), "fan1");
        assert_eq!(loaded.role(), Role::User);
        assert_eq!(loaded.credentials().password, "Passw0rd!");
    }

    #[test]
    fn duplicates_conflict_across_roles() {
        let (_dir, mut accounts) = store();
        accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();

        let artist = Account::artist(Credentials::new("other@x.com", "fan1", "Passw0rd!"), true);
        assert!(matches!(accounts.save_account(&artist), Err(PlatformError::Conflict(_))));

        let artist = Account::artist(Credentials::new("fan@x.com", "kdot", "Passw0rd!"), true);
        assert!(matches!(accounts.save_account(&artist), Err(PlatformError::Conflict(_))));
    }

    #[test]
    fn find_by_email_distinguishes_missing_from_corrupt() {
        let (dir, mut accounts) = store();
        assert!(accounts.find_by_email("nobody@x.com").unwrap().is_none());

        accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();
        std::fs::write(dir.path().join("users/fan1/fan1-fan@x.com.txt"), "Email: fan@x.com\n").unwrap();

        let err = accounts.find_by_email("fan@x.com").unwrap_err();
        assert!(matches!(err, PlatformError::CorruptData { .. }));
    }

    #[test]
    fn login_checks_password_and_approval() {
        let (_dir, mut accounts) = store();
        let artist = Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), false);
        accounts.save_account(&artist).unwrap();

        assert!(matches!(accounts.login("kdot", "wrong"), Err(PlatformError::InvalidCredentials)));
        assert!(matches!(accounts.login("k@x.com", "Kdot123!"), Err(PlatformError::NotApproved(_))));
        assert!(matches!(accounts.login("ghost", "x"), Err(PlatformError::NotFound { .. })));
    }

    #[test]
    fn following_updates_both_sides() {
        let (_dir, mut accounts) = store();
        accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();
        accounts
            .save_account(&Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), true))
            .unwrap();

        accounts.follow_artist("fan1", "kdot").unwrap();
        accounts.follow_artist("fan1", "kdot").unwrap();
        assert_eq!(accounts.load_followers("kdot").unwrap().len(), 1);

        let Account::User(user) = accounts.load_account_by_nickname("fan1").unwrap() else {
            panic!("expected a user");
        };
        assert!(user.followings.contains("kdot"));

        accounts.unfollow_artist("fan1", "kdot").unwrap();
        assert!(accounts.load_followings("fan1").unwrap().is_empty());
        assert!(accounts.load_followers("kdot").unwrap().is_empty());
    }

    #[test]
    fn only_artists_can_be_followed() {
        let (_dir, mut accounts) = store();
        accounts.register_user("a@x.com", "fan1", "Passw0rd!").unwrap();
        accounts.register_user("b@x.com", "fan2", "Passw0rd!").unwrap();
        assert!(matches!(
            accounts.follow_artist("fan1", "fan2"),
            Err(PlatformError::Validation { .. })
        ));
    }

    #[test]
    fn renaming_a_user_rewrites_index_and_followers() {
        let (dir, mut accounts) = store();
        accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();
        accounts
            .save_account(&Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), true))
            .unwrap();
        accounts.follow_artist("fan1", "kdot").unwrap();

        accounts.change_user_nickname("fan1", "fan_one").unwrap();

        assert!(matches!(
            accounts.load_account_by_nickname("fan1"),
            Err(PlatformError::NotFound { .. })
        ));
        let renamed = accounts.load_account_by_nickname("fan_one").unwrap();
        assert_eq!(renamed.email(), "fan@x.com");
        assert!(dir.path().join("users/fan_one/fan_one-fan@x.com.txt").is_file());
        assert!(!dir.path().join("users/fan_one/fan1-fan@x.com.txt").exists());
        assert!(accounts.load_followers("kdot").unwrap().contains("fan_one"));
    }

    #[test]
    fn change_password_requires_old_password() {
        let (_dir, mut accounts) = store();
        accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();

        assert!(matches!(
            accounts.change_password("fan1", "nope", "N3wPass!!"),
            Err(PlatformError::InvalidCredentials)
        ));
        accounts.change_password("fan1", "Passw0rd!", "N3wPass!!").unwrap();
        assert!(accounts.login("fan1", "N3wPass!!").is_ok());
    }

    #[test]
    fn artist_email_falls_back_to_directory_scan() {
        let (dir, mut accounts) = store();
        accounts
            .save_account(&Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), true))
            .unwrap();
        assert_eq!(accounts.artist_email("kdot").as_deref(), Some("k@x.com"));

        std::fs::write(dir.path().join("artists/index_artists.txt"), "").unwrap();
        assert_eq!(accounts.artist_email("kdot").as_deref(), Some("k@x.com"));
        assert_eq!(accounts.artist_email("ghost"), None);
    }

    #[test]
    fn ensure_admin_is_idempotent() {
        let (dir, mut accounts) = store();
        let config = AppConfig::with_data_dir(dir.path());

        let first = accounts.ensure_admin(&config).unwrap();
        let second = accounts.ensure_admin(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.role(), Role::Admin);
        assert_eq!(accounts.list_accounts(Role::Admin).unwrap().len(), 1);
    }
}
