// Asynchronous character loading. Requests run on the tokio runtime and
// report back over a channel that the render loop drains once per tick.

pub mod rig;

use std::sync::mpsc::Sender;

use log::debug;

use crate::avatar::Character;
use crate::error::AvatarError;

pub use rig::{RigBone, RigDescription};

/// Monotonically increasing per controller; newer loads carry larger tickets.
pub type Ticket = u64;

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: Ticket,
    pub locator: String,
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: Ticket,
    pub locator: String,
    pub result: Result<Character, AvatarError>,
}

/// Turns a locator into a character, off the render loop.
///
/// Implementations must eventually send exactly one completion per request,
/// tagged with the request's ticket.
pub trait AssetLoader {
    fn request(&mut self, request: LoadRequest, completions: Sender<LoadCompletion>);
}

/// Loads [`RigDescription`] JSON from disk or over http(s).
pub struct RigLoader {
    runtime: tokio::runtime::Handle,
}

impl RigLoader {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

impl AssetLoader for RigLoader {
    fn request(&mut self, request: LoadRequest, completions: Sender<LoadCompletion>) {
        self.runtime.spawn(async move {
            let LoadRequest { ticket, locator } = request;
            debug!("Loading character #{} from {}", ticket, locator);

            let result = load_character(&locator).await.map_err(|e| {
                AvatarError::new("load-failed")
                    .with_arg("locator", &locator)
                    .push_avatar(e)
            });

            // The controller may already be gone; nothing left to notify then.
            let _ = completions.send(LoadCompletion {
                ticket,
                locator,
                result,
            });
        });
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

async fn load_character(locator: &str) -> Result<Character, AvatarError> {
    let bytes = if is_remote(locator) {
        download(locator).await?
    } else {
        tokio::fs::read(locator)
            .await
            .map_err(|e| AvatarError::new("read-failed").with_arg("path", locator).push_std(e))?
    };
    RigDescription::from_slice(&bytes)?.into_character(locator)
}

async fn download(url: &str) -> Result<Vec<u8>, AvatarError> {
    let mut response = reqwest::get(url).await?;

    if !response.status().is_success() {
        return Err(AvatarError::new("http-status")
            .with_arg("url", url)
            .with_arg("status", response.status()));
    }

    let total = response.content_length().filter(|t| *t > 0);
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if let Some(total) = total {
            debug!("{}: {}% loaded", url, body.len() as u64 * 100 / total);
        }
    }
    Ok(body)
}
