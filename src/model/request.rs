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

use std::{fmt, str::FromStr};

/// Moderation state of a request.
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != RequestStatus::Pending
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(RequestStatus::Pending),
            "Approved" => Ok(RequestStatus::Approved),
            "Rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("unknown request status {other}")),
        }
    }
}

/// A pending or moderated artist signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub timestamp: String,
    pub status: RequestStatus,
}

/// A suggested replacement for a song's lyrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsEditRequest {
    pub artist: String,
    pub song: String,
    /// `None` when the song is a single.
    pub album: Option<String>,
    pub suggested_lyrics: String,
    pub requester: String,
    pub timestamp: String,
    pub status: RequestStatus,
}

/// An artist's lyrics requests grouped by state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsRequestBuckets {
    pub pending: Vec<LyricsEditRequest>,
    pub approved: Vec<LyricsEditRequest>,
    pub rejected: Vec<LyricsEditRequest>,
}

impl LyricsRequestBuckets {
    pub fn bucket(&self, status: RequestStatus) -> &[LyricsEditRequest] {
        match status {
            RequestStatus::Pending => &self.pending,
            RequestStatus::Approved => &self.approved,
            RequestStatus::Rejected => &self.rejected,
        }
    }

    pub(crate) fn bucket_mut(&mut self, status: RequestStatus) -> &mut Vec<LyricsEditRequest> {
        match status {
            RequestStatus::Pending => &mut self.pending,
            RequestStatus::Approved => &mut self.approved,
            RequestStatus::Rejected => &mut self.rejected,
        }
    }
}
