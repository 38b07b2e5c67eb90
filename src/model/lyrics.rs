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

/// Working copy of a song's lyrics while an edit is being moderated.
///
/// Only the approved text is ever written back to the lyrics file; the edit
/// lists live for the duration of one moderation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lyrics {
    pub original_lyrics: String,
    pub suggested_edits: Vec<String>,
    pub approved_edits: Vec<String>,
}

impl Lyrics {
    pub fn new(original: &str) -> Self {
        Self {
            original_lyrics: original.to_string(),
            ..Self::default()
        }
    }

    pub fn suggest_edit(&mut self, text: &str) {
        self.suggested_edits.push(text.to_string());
    }

    /// Accepts `text` as the new current lyrics.
    pub fn approve_edit(&mut self, text: &str) {
        self.approved_edits.push(text.to_string());
        self.original_lyrics = text.to_string();
    }

    pub fn current(&self) -> &str {
        &self.original_lyrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approving_replaces_current_text() {
        let mut lyrics = Lyrics::new("old words");
        lyrics.suggest_edit("new words");
        lyrics.approve_edit("new words");

        assert_eq!(lyrics.current(), "new words");
        assert_eq!(lyrics.suggested_edits, vec!["new words"]);
        assert_eq!(lyrics.approved_edits, vec!["new words"]);
    }
}
