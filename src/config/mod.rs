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

//! Application configuration.
//!
//! This module manages the application configuration file: where the data
//! directory lives, the credentials of the seeded admin account, and the
//! upload limit for album art.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "lyricist";

/// 5 MiB.
const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

const DEFAULT_TOP_SONGS: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub data_dir: PathBuf,
    pub admin_email: String,
    pub admin_nickname: String,
    pub admin_password: String,
    /// Largest album art file accepted, in bytes.
    pub max_file_size: u64,
    pub top_songs: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            data_dir: PathBuf::from("data"),
            admin_email: "admin@lyricist.app".into(),
            admin_nickname: "admin".into(),
            admin_password: "Admin123!".into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            top_songs: DEFAULT_TOP_SONGS,
        }
    }
}

impl AppConfig {
    /// A default configuration rooted at `data_dir`, used by tests and tools.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
