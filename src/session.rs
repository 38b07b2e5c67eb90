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

//! The logged-in account and the current UI selection.
//!
//! A [`Session`] is owned by whoever drives the platform (normally
//! [`Platform`](crate::tasks::Platform)) and is passed around explicitly;
//! there is no process-wide current user.

use tracing::info;

use crate::{
    accounts::AccountStore,
    catalog::SongRef,
    error::{PlatformError, Result},
    model::{Account, Artist, Role},
};

#[derive(Debug, Clone, Default)]
pub struct Session {
    account: Option<Account>,
    selected_artist: Option<String>,
    selected_album: Option<String>,
    selected_song: Option<SongRef>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates and makes the account current, replacing any previous
    /// login and clearing the selection.
    pub fn login(&mut self, accounts: &AccountStore, username: &str, password: &str) -> Result<&Account> {
        let account = accounts.login(username, password)?;
        *self = Self::default();
        Ok(self.account.insert(account))
    }

    pub fn logout(&mut self) {
        if let Some(account) = self.account.take() {
            info!(nickname = %account.nickname(), "logged out");
        }
        *self = Self::default();
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.account.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.account.as_ref().map(Account::role)
    }

    pub fn nickname(&self) -> Option<&str> {
        self.account.as_ref().map(Account::nickname)
    }

    /// Swaps in a refreshed copy of the current account, e.g. after a
    /// password or nickname change.
    pub(crate) fn replace_account(&mut self, account: Account) {
        self.account = Some(account);
    }

    pub fn require_login(&self) -> Result<&Account> {
        self.account
            .as_ref()
            .ok_or_else(|| PlatformError::Forbidden("login required".into()))
    }

    pub fn require_role(&self, role: Role) -> Result<&Account> {
        let account = self.require_login()?;
        if account.role() != role {
            return Err(PlatformError::Forbidden(format!(
                "{} accounts cannot do this",
                account.role()
            )));
        }
        Ok(account)
    }

    pub fn require_artist(&self) -> Result<&Artist> {
        self.require_role(Role::Artist)?
            .as_artist()
            .ok_or_else(|| PlatformError::Forbidden("artist login required".into()))
    }

    // Selection

    pub fn select_artist(&mut self, artist: &str) {
        if self.selected_artist.as_deref() != Some(artist) {
            self.selected_album = None;
            self.selected_song = None;
        }
        self.selected_artist = Some(artist.to_string());
    }

    pub fn select_album(&mut self, album: Option<&str>) {
        self.selected_album = album.map(str::to_string);
        self.selected_song = None;
    }

    pub fn select_song(&mut self, song: SongRef) {
        self.selected_artist = Some(song.artist.clone());
        self.selected_album = song.album.clone();
        self.selected_song = Some(song);
    }

    pub fn selected_artist(&self) -> Option<&str> {
        self.selected_artist.as_deref()
    }

    pub fn selected_album(&self) -> Option<&str> {
        self.selected_album.as_deref()
    }

    pub fn selected_song(&self) -> Option<&SongRef> {
        self.selected_song.as_ref()
    }
}
