//! Lifecycle events and the dispatch table

use super::{ActivateReport, InstallReport, Interception, OfflineAgent};
use crate::error::AgentResult;
use crate::http::Request;
use crate::notification::NotificationOptions;
use std::fmt;
use tracing::debug;
use url::Url;

/// An event delivered by the hosting runtime
#[derive(Debug, Clone)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
    Sync { tag: String },
    Push { payload: Option<String> },
    NotificationClick { tag: String, action: Option<String> },
    Message(serde_json::Value),
}

/// Discriminant of an [`Event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Activate,
    Fetch,
    Sync,
    Push,
    NotificationClick,
    Message,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Fetch => "fetch",
            Self::Sync => "sync",
            Self::Push => "push",
            Self::NotificationClick => "notificationclick",
            Self::Message => "message",
        };
        write!(f, "{}", name)
    }
}

impl Event {
    /// Kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Install => EventKind::Install,
            Self::Activate => EventKind::Activate,
            Self::Fetch(_) => EventKind::Fetch,
            Self::Sync { .. } => EventKind::Sync,
            Self::Push { .. } => EventKind::Push,
            Self::NotificationClick { .. } => EventKind::NotificationClick,
            Self::Message(_) => EventKind::Message,
        }
    }
}

/// What handling an event produced
#[derive(Debug, Clone)]
pub enum Outcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    Fetched(Interception),
    Synced { recognized: bool },
    Notified(NotificationOptions),
    Clicked { opened: Option<Url> },
    Messaged { recognized: bool },
}

impl OfflineAgent {
    /// Route an event to its handler
    pub async fn dispatch(&self, event: Event) -> AgentResult<Outcome> {
        debug!("Dispatching {} event", event.kind());

        match event {
            Event::Install => self.install().await.map(Outcome::Installed),
            Event::Activate => self.activate().await.map(Outcome::Activated),
            Event::Fetch(request) => Ok(Outcome::Fetched(self.handle_fetch(request).await)),
            Event::Sync { tag } => Ok(Outcome::Synced {
                recognized: self.sync(&tag),
            }),
            Event::Push { payload } => self.push(payload.as_deref()).await.map(Outcome::Notified),
            Event::NotificationClick { tag, action } => self
                .notification_click(&tag, action.as_deref())
                .await
                .map(|opened| Outcome::Clicked { opened }),
            Event::Message(payload) => self
                .message(&payload)
                .await
                .map(|recognized| Outcome::Messaged { recognized }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{precache_network, Fixture};
    use super::super::ResponseSource;
    use super::*;
    use crate::cache::CacheStorage;
    use crate::fetch::ScriptedFetcher;

    #[test]
    fn kinds_display() {
        assert_eq!(Event::Install.kind().to_string(), "install");
        assert_eq!(
            Event::NotificationClick {
                tag: "t".to_string(),
                action: None
            }
            .kind()
            .to_string(),
            "notificationclick"
        );
    }

    #[tokio::test]
    async fn lifecycle_through_dispatch() {
        let fx = Fixture::new(precache_network());
        fx.storage.open("memaster-v1.3.0").await.unwrap();

        let installed = fx.agent.dispatch(Event::Install).await.unwrap();
        assert!(matches!(installed, Outcome::Installed(ref r) if r.cached.len() == 6));

        let activated = fx.agent.dispatch(Event::Activate).await.unwrap();
        match activated {
            Outcome::Activated(report) => assert_eq!(report.deleted, vec!["memaster-v1.3.0"]),
            other => panic!("expected Activated, got {other:?}"),
        }

        let fetched = fx
            .agent
            .dispatch(Event::Fetch(Request::navigate(fx.url("./"))))
            .await
            .unwrap();
        match fetched {
            Outcome::Fetched(interception) => {
                assert_eq!(interception.source(), Some(ResponseSource::Cache))
            }
            other => panic!("expected Fetched, got {other:?}"),
        }

        // Everything above came from install; interception made no extra calls
        assert_eq!(fx.fetcher.call_count(), 6);
    }

    #[tokio::test]
    async fn passive_events_dispatch() {
        let fx = Fixture::new(ScriptedFetcher::offline());

        let synced = fx
            .agent
            .dispatch(Event::Sync {
                tag: "background-sync-tasks".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(synced, Outcome::Synced { recognized: true }));

        let notified = fx
            .agent
            .dispatch(Event::Push { payload: None })
            .await
            .unwrap();
        let Outcome::Notified(options) = notified else {
            panic!("expected Notified");
        };

        let clicked = fx
            .agent
            .dispatch(Event::NotificationClick {
                tag: options.tag,
                action: Some("view".to_string()),
            })
            .await
            .unwrap();
        assert!(matches!(clicked, Outcome::Clicked { opened: Some(_) }));

        let messaged = fx
            .agent
            .dispatch(Event::Message(serde_json::json!({"type": "SKIP_WAITING"})))
            .await
            .unwrap();
        assert!(matches!(messaged, Outcome::Messaged { recognized: true }));
    }
}
