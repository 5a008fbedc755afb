mod movie_detail;
mod watch_session;

pub use movie_detail::{parse_movie_detail, Episode, MovieDetail, Server};
pub use watch_session::{SessionState, WatchSession};
