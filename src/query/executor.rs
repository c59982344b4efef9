use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::{IncidentsApi, IncidentsClient};
use crate::event::Event;
use crate::query::debounce::Ticket;
use crate::query::state::FetchRequest;

/// Runs list queries off the UI loop and reports back through the event
/// channel. Each dispatch is one list fetch plus one counts fetch, tagged
/// with the request's generation.
#[derive(Clone, Debug)]
pub struct QueryExecutor {
    client: IncidentsClient,
    tx: UnboundedSender<Event>,
}

impl QueryExecutor {
    pub fn new(client: IncidentsClient, tx: UnboundedSender<Event>) -> Self {
        Self { client, tx }
    }

    pub fn client(&self) -> &IncidentsClient {
        &self.client
    }

    pub fn dispatch(&self, request: FetchRequest) {
        let FetchRequest {
            generation,
            list,
            counts,
        } = request;
        debug!(generation, ?list, "dispatching incident query");

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_incidents(&list).await;
            // The app may have quit while the request was in flight.
            let _ = tx.send(Event::IncidentsFetched { generation, result });
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.incident_counts(&counts).await;
            let _ = tx.send(Event::CountsFetched { generation, result });
        });
    }

    /// Arms a one-shot timer that reports `ticket` after `delay`.
    pub fn arm_debounce(&self, ticket: Ticket, delay: Duration) {
        arm_timer(self.tx.clone(), ticket, delay);
    }
}

pub(crate) fn arm_timer(tx: UnboundedSender<Event>, ticket: Ticket, delay: Duration) {
    // Deadline is fixed now, not when the task first gets polled.
    let deadline = tokio::time::Instant::now() + delay;
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let _ = tx.send(Event::SearchSettled(ticket));
    });
}
