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

use tracing::debug;

use crate::{
    catalog::{ArtistCatalog, CatalogManager, CommentTarget, SongRef},
    error::{PlatformError, Result},
    model::{Account, RequestStatus, Role, Song},
    search::SearchIndex,
    tasks::{AppEvent, Platform},
};

// Accounts

pub(super) fn register(ctx: &mut Platform, email: &str, nickname: &str, password: &str) -> Result<AppEvent> {
    let account = ctx.accounts.register_user(email, nickname, password)?;
    Ok(AppEvent::Registered(account))
}

pub(super) fn login(ctx: &mut Platform, username: &str, password: &str) -> Result<AppEvent> {
    ctx.working = None;
    let account = ctx.session.login(&ctx.accounts, username, password)?.clone();
    Ok(AppEvent::LoggedIn(account))
}

pub(super) fn logout(ctx: &mut Platform) -> Result<AppEvent> {
    ctx.session.logout();
    ctx.working = None;
    Ok(AppEvent::LoggedOut)
}

pub(super) fn change_password(ctx: &mut Platform, old: &str, new: &str) -> Result<AppEvent> {
    let nickname = ctx.session.require_login()?.nickname().to_string();
    let account = ctx.accounts.change_password(&nickname, old, new)?;
    ctx.session.replace_account(account.clone());
    Ok(AppEvent::AccountUpdated(account))
}

pub(super) fn change_nickname(ctx: &mut Platform, new: &str) -> Result<AppEvent> {
    let nickname = ctx.session.require_role(Role::User)?.nickname().to_string();
    let account = ctx.accounts.change_user_nickname(&nickname, new)?;
    ctx.session.replace_account(account.clone());
    Ok(AppEvent::AccountUpdated(account))
}

// Artist signups

pub(super) fn submit_artist_request(
    ctx: &mut Platform,
    email: &str,
    nickname: &str,
    password: &str,
) -> Result<AppEvent> {
    let request = ctx
        .requests
        .submit_artist_request(&ctx.accounts, email, nickname, password)?;
    Ok(AppEvent::ArtistRequestSubmitted(request))
}

pub(super) fn list_artist_requests(ctx: &mut Platform, status: RequestStatus) -> Result<AppEvent> {
    ctx.session.require_role(Role::Admin)?;
    Ok(AppEvent::ArtistRequests(ctx.requests.load_artist_requests(status)?))
}

pub(super) fn approve_artist_request(ctx: &mut Platform, email: &str, nickname: &str) -> Result<AppEvent> {
    ctx.session.require_role(Role::Admin)?;
    let account = ctx
        .requests
        .approve_artist_request(&mut ctx.accounts, email, nickname)?;
    Ok(AppEvent::ArtistApproved(account))
}

pub(super) fn reject_artist_request(ctx: &mut Platform, email: &str, nickname: &str) -> Result<AppEvent> {
    ctx.session.require_role(Role::Admin)?;
    ctx.requests.reject_artist_request(email, nickname)?;
    Ok(AppEvent::RequestRejected)
}

// Lyrics requests

pub(super) fn submit_lyrics_edit(ctx: &mut Platform, song: &SongRef, lyrics: &str) -> Result<AppEvent> {
    let requester = ctx.session.require_login()?.nickname().to_string();
    let request = ctx
        .requests
        .submit_lyrics_edit_request(&ctx.catalog, song, lyrics, &requester)?;
    Ok(AppEvent::LyricsRequestSubmitted(request))
}

pub(super) fn list_lyrics_requests(ctx: &mut Platform, status: RequestStatus) -> Result<AppEvent> {
    ctx.session.require_role(Role::Admin)?;
    Ok(AppEvent::LyricsRequests(ctx.requests.load_lyrics_requests(status)?))
}

pub(super) fn list_lyrics_requests_for_artist(ctx: &mut Platform, artist: &str) -> Result<AppEvent> {
    require_moderator(ctx, artist)?;
    let buckets = ctx.requests.load_lyrics_edit_requests_for_artist(artist)?;
    Ok(AppEvent::LyricsRequestBuckets(buckets))
}

pub(super) fn approve_lyrics_request(
    ctx: &mut Platform,
    artist: &str,
    song: &str,
    timestamp: &str,
) -> Result<AppEvent> {
    require_moderator(ctx, artist)?;
    let request = ctx
        .requests
        .approve_lyrics_request(&mut ctx.catalog, artist, song, timestamp)?;

    // Keep an open editing session in step with the new lyrics file.
    if let Some(working) = ctx.working.as_mut().filter(|w| w.artist() == request.artist) {
        if let Some(track) = working.song_mut(&request.song, request.album.as_deref()) {
            track.lyrics = request.suggested_lyrics.clone();
        }
    }

    Ok(AppEvent::LyricsRequestApproved(request))
}

pub(super) fn reject_lyrics_request(
    ctx: &mut Platform,
    artist: &str,
    song: &str,
    timestamp: &str,
) -> Result<AppEvent> {
    require_moderator(ctx, artist)?;
    ctx.requests.reject_lyrics_request(artist, song, timestamp)?;
    Ok(AppEvent::RequestRejected)
}

/// Admins moderate every song, artists only their own.
fn require_moderator(ctx: &Platform, artist: &str) -> Result<()> {
    match ctx.session.require_login()? {
        Account::Admin(_) => Ok(()),
        Account::Artist(a) if a.credentials.nickname == artist.trim().to_lowercase() => Ok(()),
        account => Err(PlatformError::Forbidden(format!(
            "{} cannot moderate requests for {artist}",
            account.nickname()
        ))),
    }
}

// Catalog

/// The logged-in artist's catalog, loaded from disk on first use.
fn ensure_working(ctx: &mut Platform) -> Result<&mut ArtistCatalog> {
    let artist = ctx.session.require_artist()?.clone();
    let nickname = artist.credentials.nickname.clone();

    if ctx.working.as_ref().is_none_or(|w| w.artist() != nickname) {
        ctx.working = Some(ctx.catalog.load_songs_and_albums_for_artist(&artist)?);
        debug!(artist = %nickname, "working catalog loaded");
    }

    ctx.working
        .as_mut()
        .ok_or_else(|| PlatformError::not_found("catalog", nickname))
}

pub(super) fn load_catalog(ctx: &mut Platform) -> Result<AppEvent> {
    Ok(AppEvent::CatalogLoaded(ensure_working(ctx)?.clone()))
}

/// Applies an in-memory change; nothing is written until the catalog is
/// saved.
pub(super) fn edit_catalog(
    ctx: &mut Platform,
    edit: impl FnOnce(&mut ArtistCatalog) -> Result<()>,
) -> Result<AppEvent> {
    edit(ensure_working(ctx)?)?;
    Ok(AppEvent::CatalogChanged)
}

/// Runs an operation that touches both disk and the working catalog.
pub(super) fn with_catalog(
    ctx: &mut Platform,
    op: impl FnOnce(&mut CatalogManager, &mut ArtistCatalog) -> Result<AppEvent>,
) -> Result<AppEvent> {
    let nickname = ensure_working(ctx)?.artist().to_string();

    let Platform { catalog, working, .. } = ctx;
    let working = working
        .as_mut()
        .ok_or_else(|| PlatformError::not_found("catalog", nickname))?;
    op(catalog, working)
}

pub(super) fn save_catalog(ctx: &mut Platform) -> Result<AppEvent> {
    with_catalog(ctx, |manager, catalog| {
        let report = manager.save_songs_and_albums_for_artist(catalog)?;
        Ok(AppEvent::CatalogSaved(report))
    })
}

// Following

pub(super) fn follow(ctx: &mut Platform, artist: &str, follow: bool) -> Result<AppEvent> {
    let user = ctx.session.require_role(Role::User)?.nickname().to_string();
    if follow {
        ctx.accounts.follow_artist(&user, artist)?;
    } else {
        ctx.accounts.unfollow_artist(&user, artist)?;
    }

    let refreshed = ctx.accounts.load_account_by_nickname(&user)?;
    ctx.session.replace_account(refreshed);
    Ok(AppEvent::Followings(ctx.accounts.load_followings(&user)?))
}

pub(super) fn list_followings(ctx: &mut Platform) -> Result<AppEvent> {
    let user = ctx.session.require_role(Role::User)?.nickname().to_string();
    Ok(AppEvent::Followings(ctx.accounts.load_followings(&user)?))
}

// Songs

pub(super) fn add_comment(ctx: &mut Platform, target: &CommentTarget, text: &str) -> Result<AppEvent> {
    let user = ctx.session.require_login()?.nickname().to_string();
    Ok(AppEvent::CommentAdded(ctx.catalog.add_comment(target, &user, text)?))
}

pub(super) fn load_comments(ctx: &mut Platform, target: &CommentTarget) -> Result<AppEvent> {
    Ok(AppEvent::Comments(ctx.catalog.load_comments(target)?))
}

/// Opens a song: counts the view, returns its lyrics and selects it.
pub(super) fn view_song(ctx: &mut Platform, song: SongRef) -> Result<AppEvent> {
    let views = ctx.catalog.record_view(&song)?;
    if let Some(track) = working_song(ctx, &song) {
        track.views = views;
    }
    let lyrics = ctx.catalog.load_lyrics(&song)?;
    ctx.session.select_song(song);
    Ok(AppEvent::SongViewed { lyrics, views })
}

pub(super) fn like_song(ctx: &mut Platform, song: &SongRef) -> Result<AppEvent> {
    ctx.session.require_login()?;
    let likes = ctx.catalog.record_like(song)?;
    if let Some(track) = working_song(ctx, song) {
        track.likes = likes;
    }
    Ok(AppEvent::SongLiked(likes))
}

/// The open editing session's copy of `song`, if it has one. Counter updates
/// through it do not dirty the song.
fn working_song<'a>(ctx: &'a mut Platform, song: &SongRef) -> Option<&'a mut Song> {
    ctx.working
        .as_mut()
        .filter(|w| w.artist() == song.artist)
        .and_then(|w| w.song_mut(&song.title, song.album()))
}

// Search

pub(super) fn search(ctx: &mut Platform, query: &str) -> Result<AppEvent> {
    Ok(AppEvent::SearchResults(ctx.search.search(query)))
}

pub(super) fn top_songs(ctx: &mut Platform, n: usize) -> Result<AppEvent> {
    let songs = ctx.search.top_songs(n).into_iter().cloned().collect();
    Ok(AppEvent::TopSongs(songs))
}

pub(super) fn refresh_search(ctx: &mut Platform) -> Result<AppEvent> {
    ctx.search = SearchIndex::build(&ctx.layout);
    Ok(AppEvent::SearchRefreshed)
}
