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

use std::{collections::BTreeSet, fmt, str::FromStr};

/// The three account roles, each persisted under its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    User,
    Artist,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Artist, Role::Admin];

    pub fn dir_name(self) -> &'static str {
        match self {
            Role::User => "users",
            Role::Artist => "artists",
            Role::Admin => "admin",
        }
    }

    pub fn index_file_name(self) -> &'static str {
        match self {
            Role::User => "index_users.txt",
            Role::Artist => "index_artists.txt",
            Role::Admin => "index_admins.txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Artist => "Artist",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "User" => Ok(Role::User),
            "Artist" => Ok(Role::Artist),
            "Admin" => Ok(Role::Admin),
            other => Err(format!("unknown role {other}")),
        }
    }
}

/// Identity shared by every role. Email and nickname are always lower-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, nickname: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            nickname: nickname.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub credentials: Credentials,
    pub followings: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub credentials: Credentials,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    User(User),
    Artist(Artist),
    Admin(Admin),
}

impl Account {
    pub fn user(credentials: Credentials) -> Self {
        Account::User(User {
            credentials,
            followings: BTreeSet::new(),
        })
    }

    pub fn artist(credentials: Credentials, approved: bool) -> Self {
        Account::Artist(Artist {
            credentials,
            approved,
        })
    }

    pub fn admin(credentials: Credentials) -> Self {
        Account::Admin(Admin { credentials })
    }

    pub fn role(&self) -> Role {
        match self {
            Account::User(_) => Role::User,
            Account::Artist(_) => Role::Artist,
            Account::Admin(_) => Role::Admin,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        match self {
            Account::User(u) => &u.credentials,
            Account::Artist(a) => &a.credentials,
            Account::Admin(a) => &a.credentials,
        }
    }

    pub(crate) fn credentials_mut(&mut self) -> &mut Credentials {
        match self {
            Account::User(u) => &mut u.credentials,
            Account::Artist(a) => &mut a.credentials,
            Account::Admin(a) => &mut a.credentials,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.credentials().nickname
    }

    pub fn email(&self) -> &str {
        &self.credentials().email
    }

    pub fn as_artist(&self) -> Option<&Artist> {
        match self {
            Account::Artist(artist) => Some(artist),
            _ => None,
        }
    }
}
