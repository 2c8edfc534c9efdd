//! HTTP API handlers for recordify-server

pub mod buildinfo;
pub mod health;
pub mod playback;
pub mod tags;

pub use buildinfo::{get_build_info, BuildInfo};
pub use health::health_routes;
pub use playback::{now_playing, play_tag, playback_routes};
pub use tags::{get_tag, list_tags, save_tag, tag_routes};
