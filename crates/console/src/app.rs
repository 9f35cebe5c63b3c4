//! Console loop pieces: background operator actions and frame tracking.

use staffdesk_client::Session;
use staffdesk_core::{CoreError, View};
use tokio::task::JoinHandle;

use crate::commands::Command;
use crate::render::render;

/// Run a session action on its own task so the console keeps reading input
/// and drawing frames while the API call is in flight.
///
/// Returns `None` for commands that do not act on the session.
pub fn spawn_action(session: &Session, command: Command) -> Option<JoinHandle<()>> {
    let session = session.clone();
    let handle = match command {
        Command::Approve(request_id) => {
            tokio::spawn(async move { report(session.approve(request_id).await) })
        }
        Command::Assign(artist_id) => {
            tokio::spawn(async move { report(session.assign(artist_id).await) })
        }
        Command::ViewOtherRequests => {
            tokio::spawn(async move { report(session.view_other_requests().await) })
        }
        Command::Show | Command::Help | Command::Quit => return None,
    };
    Some(handle)
}

fn report(outcome: Result<(), CoreError>) {
    if let Err(e) = outcome {
        println!("Not possible right now: {e}");
    }
}

/// Last rendered frame, so unchanged state is not printed twice.
#[derive(Debug, Default)]
pub struct Screen {
    last: String,
}

impl Screen {
    /// Render the session's current state. Returns `None` when nothing
    /// changed since the last frame, unless `force` is set.
    pub async fn frame(&mut self, session: &Session, force: bool) -> Option<String> {
        let workflow = session.snapshot().await;
        let frame = render(&View::derive(&workflow));
        if !force && frame == self.last {
            return None;
        }
        self.last.clone_from(&frame);
        Some(frame)
    }
}
