//! Background forecast lookups
//!
//! Runs resolutions on tokio tasks so the UI loop never waits on the network,
//! and reports progress to the main application over a channel.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::data::ForecastResult;
use crate::resolver::{ForecastResolver, ResolveError};

/// Messages sent from lookup tasks to the main app
#[derive(Debug, Clone)]
pub enum LookupMessage {
    /// A lookup was started for this city text
    Started { city: String },
    /// The forecast for `city` is ready
    Resolved {
        city: String,
        forecast: Arc<ForecastResult>,
    },
    /// The lookup for `city` failed
    Failed { city: String, error: ResolveError },
}

impl LookupMessage {
    /// The city text the message refers to, as it was requested
    pub fn city(&self) -> &str {
        match self {
            LookupMessage::Started { city }
            | LookupMessage::Resolved { city, .. }
            | LookupMessage::Failed { city, .. } => city,
        }
    }
}

/// Handle for issuing lookups and receiving their outcomes
pub struct LookupHandle {
    /// Channel for receiving lookup messages
    pub receiver: mpsc::Receiver<LookupMessage>,
    sender: mpsc::Sender<LookupMessage>,
    resolver: ForecastResolver,
}

impl LookupHandle {
    pub fn new(resolver: ForecastResolver) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            receiver,
            sender,
            resolver,
        }
    }

    /// Starts a lookup for `city` in the background
    ///
    /// Duplicate requests are cheap: the resolver answers from its cache or
    /// joins the lookup already in flight.
    pub fn request(&self, city: String) {
        let tx = self.sender.clone();
        let resolver = self.resolver.clone();

        tokio::spawn(async move {
            let _ = tx.send(LookupMessage::Started { city: city.clone() }).await;

            let message = match resolver.resolve(&city).await {
                Ok(forecast) => LookupMessage::Resolved { city, forecast },
                Err(error) => LookupMessage::Failed { city, error },
            };
            let _ = tx.send(message).await;
        });
    }

    pub fn resolver(&self) -> &ForecastResolver {
        &self.resolver
    }
}

/// Checks for pending lookup messages without blocking
pub fn try_recv(handle: &mut LookupHandle) -> Option<LookupMessage> {
    handle.receiver.try_recv().ok()
}
