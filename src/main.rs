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

//! # Lyricist bootstrap.
//!
//! Opens the configured data directory, seeds the admin account and reports
//! the current chart. Front ends embed [`lyricist::Platform`] directly.

use anyhow::{Context, Result};
use tracing::info;

use lyricist::{Platform, config, logging};

fn main() -> Result<()> {
    logging::init_logging();

    let config = config::load_config();
    let top = config.top_songs;
    info!(data_dir = %config.data_dir.display(), "starting");

    let platform = Platform::open(config).context("Failed to open data directory")?;

    let index = platform.search_index();
    info!(songs = index.songs().len(), "catalog scanned");
    for row in index.chart_rows(top) {
        info!("{row}");
    }

    Ok(())
}
