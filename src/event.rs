use crate::api::types::{FilterOptions, Incident, IncidentCounts, IncidentPage};
use crate::error::ApiError;
use crate::query::{Generation, Ticket};
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    IncidentsFetched {
        generation: Generation,
        result: Result<IncidentPage, ApiError>,
    },
    CountsFetched {
        generation: Generation,
        result: Result<IncidentCounts, ApiError>,
    },
    SearchSettled(Ticket),
    FilterOptionsFetched(Result<FilterOptions, ApiError>),
    IncidentFetched(String, Result<Incident, ApiError>), // (Incident ID, Result)
    IncidentCreated(Result<Incident, ApiError>),
    IncidentUpdated(String, Result<Incident, ApiError>),
    IncidentDeleted(String, Result<(), ApiError>),
}

#[derive(Debug)]
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: std::time::Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task_tx = tx.clone();
        let _task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                let tick_delay = interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    _ = tick_delay => Some(Event::Tick),
                    Some(Ok(evt)) = crossterm_event => match evt {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                        _ => None,
                    },
                };
                // Receiver gone means the app is shutting down.
                if let Some(event) = event {
                    if task_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });
        Self { tx, rx, _task }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Unable to get event"))
    }
}
