use serde::Serialize;

use super::movie_detail::{Episode, MovieDetail, Server};
use crate::shared::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No movie loaded
    Empty,
    /// Movie and server list present
    Loaded,
}

/// Server/episode selection for one movie and the stream URL it resolves to.
///
/// Indices always point inside `servers`; the episode index points inside the
/// selected server's list whenever that list is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSession {
    player_url: String,
    movie: Option<MovieDetail>,
    servers: Vec<Server>,
    server_index: usize,
    episode_index: usize,
    stream_url: Option<String>,
}

impl WatchSession {
    pub fn new(player_url: impl Into<String>) -> Self {
        Self {
            player_url: player_url.into(),
            movie: None,
            servers: Vec::new(),
            server_index: 0,
            episode_index: 0,
            stream_url: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.movie.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    /// Replace whatever was loaded and select `(0, 0)`
    pub fn load(&mut self, movie: MovieDetail, servers: Vec<Server>) {
        self.reset();
        self.movie = Some(movie);
        self.servers = servers;
        self.stream_url = self.derive_stream_url();
    }

    pub fn reset(&mut self) {
        self.movie = None;
        self.servers.clear();
        self.server_index = 0;
        self.episode_index = 0;
        self.stream_url = None;
    }

    /// Select an episode. Out-of-range indices are rejected and leave the
    /// session untouched; episode 0 of an empty server is allowed.
    pub fn set_current_episode(&mut self, server_index: usize, episode_index: usize) -> AppResult<()> {
        let server = self.servers.get(server_index).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "server {} out of range ({} servers)",
                server_index,
                self.servers.len()
            ))
        })?;

        let episodes = server.episodes.len();
        if episode_index >= episodes && !(episodes == 0 && episode_index == 0) {
            return Err(AppError::InvalidInput(format!(
                "episode {} out of range ({} episodes on server {})",
                episode_index, episodes, server_index
            )));
        }

        self.server_index = server_index;
        self.episode_index = episode_index;
        self.stream_url = self.derive_stream_url();
        Ok(())
    }

    /// Next episode on this server, else the first of the next server.
    /// Returns false, without changing anything, at the end of the last server.
    pub fn next_episode(&mut self) -> bool {
        let Some(server) = self.current_server() else {
            return false;
        };

        let target = if self.episode_index + 1 < server.episodes.len() {
            (self.server_index, self.episode_index + 1)
        } else if self.server_index + 1 < self.servers.len() {
            (self.server_index + 1, 0)
        } else {
            return false;
        };

        self.set_current_episode(target.0, target.1).is_ok()
    }

    /// Previous episode on this server, else the last of the previous server.
    /// Returns false, without changing anything, when there is none.
    pub fn previous_episode(&mut self) -> bool {
        if self.current_server().is_none() {
            return false;
        }

        let target = if self.episode_index > 0 {
            (self.server_index, self.episode_index - 1)
        } else {
            match self.server_index.checked_sub(1) {
                Some(previous) => match self.servers[previous].episodes.len() {
                    0 => return false,
                    len => (previous, len - 1),
                },
                None => return false,
            }
        };

        self.set_current_episode(target.0, target.1).is_ok()
    }

    pub fn movie(&self) -> Option<&MovieDetail> {
        self.movie.as_ref()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn current_server(&self) -> Option<&Server> {
        self.servers.get(self.server_index)
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.current_server()
            .and_then(|server| server.episodes.get(self.episode_index))
    }

    pub fn server_index(&self) -> usize {
        self.server_index
    }

    pub fn episode_index(&self) -> usize {
        self.episode_index
    }

    pub fn position(&self) -> (usize, usize) {
        (self.server_index, self.episode_index)
    }

    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }

    /// `{player}?url={encoded m3u8}`, or `None` when the episode has no stream
    fn derive_stream_url(&self) -> Option<String> {
        let episode = self.current_episode().filter(|episode| episode.has_stream())?;
        Some(format!(
            "{}?url={}",
            self.player_url,
            urlencoding::encode(episode.link_m3u8.trim())
        ))
    }
}
