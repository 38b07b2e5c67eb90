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

/// Formats a view or like counter into a short human-readable string.
///
/// Counts below one thousand are shown as-is, larger counts are abbreviated
/// with one decimal place.
///
/// # Arguments
///
/// * `count` - The counter value to format.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1_240), "1.2K");
/// assert_eq!(format_count(3_400_000), "3.4M");
/// ```
pub(crate) fn format_count(count: u64) -> String {
    // 999_950 and up would round to "1000.0K".
    match count {
        0..=999 => count.to_string(),
        1_000..=999_949 => format!("{:.1}K", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}

/// Renders one chart row, e.g. `  1. HUMBLE - kdot (DAMN) 1.2K views`.
pub(crate) fn format_chart_row(rank: usize, title: &str, artist: &str, album: Option<&str>, views: u64) -> String {
    match album {
        Some(album) => format!("{rank:>3}. {title} - {artist} ({album}) {} views", format_count(views)),
        None => format!("{rank:>3}. {title} - {artist} {} views", format_count(views)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_240), "1.2K");
        assert_eq!(format_count(3_400_000), "3.4M");
    }

    #[test]
    fn rounding_up_to_a_thousand_switches_unit() {
        assert_eq!(format_count(999_949), "999.9K");
        assert_eq!(format_count(999_950), "1.0M");
        assert_eq!(format_count(999_999), "1.0M");
    }

    #[test]
    fn chart_row_mentions_album_when_present() {
        assert_eq!(format_chart_row(1, "DNA", "kdot", Some("DAMN"), 10), "  1. DNA - kdot (DAMN) 10 views");
        assert_eq!(format_chart_row(12, "HUMBLE", "kdot", None, 1_000), " 12. HUMBLE - kdot 1.0K views");
    }
}
