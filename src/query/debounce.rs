use std::time::Duration;

/// Identifies one armed timer. Only the most recent ticket can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Single-shot, restartable delayed hand-off of the latest value.
///
/// `push` stores a value and returns a ticket for a timer the caller arms
/// for `delay()`. When a timer elapses the caller passes its ticket to
/// `fire`, which yields the value only if no newer push happened since.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    issued: u64,
    pending: Option<(Ticket, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            issued: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn push(&mut self, value: T) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some((ticket, value));
        ticket
    }

    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        match &self.pending {
            Some((latest, _)) if *latest == ticket => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value; any armed timer will fire into nothing.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }
}
