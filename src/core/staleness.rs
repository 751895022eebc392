use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

/// Identifies a request in the order it was issued.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets to concurrent requests.
#[derive(Debug, Default)]
pub struct RequestSequence(AtomicU64);

impl RequestSequence {
    pub fn issue(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Last applied result of out-of-order requests.
///
/// A result is applied only if no result of a later request has been applied before it,
/// so responses which arrive late never overwrite fresher ones.
#[derive(Debug)]
pub struct Latest<T>(Mutex<Option<(Ticket, T)>>);

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self(Mutex::new(None))
    }
}

impl<T: Clone> Latest<T> {
    /// Offer the result of the request, returns whether it was applied.
    pub fn offer(&self, ticket: Ticket, value: T) -> bool {
        let mut latest = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match &*latest {
            Some((applied, _)) if *applied >= ticket => false,
            _ => {
                *latest = Some((ticket, value));
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<T> {
        let latest = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        latest.as_ref().map(|(_, value)| value.clone())
    }

    #[must_use]
    pub fn ticket(&self) -> Option<Ticket> {
        let latest = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        latest.as_ref().map(|(ticket, _)| *ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();
        assert!(first < second);
    }

    #[test]
    fn test_late_response_is_discarded() {
        let sequence = RequestSequence::default();
        let older = sequence.issue();
        let newer = sequence.issue();

        let latest = Latest::default();
        assert!(latest.offer(newer, "newer"));
        assert!(!latest.offer(older, "older"));
        assert_eq!(latest.get(), Some("newer"));
        assert_eq!(latest.ticket(), Some(newer));
    }

    #[test]
    fn test_in_order_responses_are_applied() {
        let sequence = RequestSequence::default();
        let older = sequence.issue();
        let newer = sequence.issue();

        let latest = Latest::default();
        assert_eq!(latest.get(), None::<u32>);
        assert!(latest.offer(older, 1));
        assert!(latest.offer(newer, 2));
        assert_eq!(latest.get(), Some(2));
    }

    #[test]
    fn test_same_ticket_is_applied_once() {
        let ticket = RequestSequence::default().issue();
        let latest = Latest::default();
        assert!(latest.offer(ticket, 1));
        assert!(!latest.offer(ticket, 2));
        assert_eq!(latest.get(), Some(1));
    }
}
