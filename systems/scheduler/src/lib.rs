#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that fires scheduled turn hand-offs once their delay elapses.

use std::time::Duration;

use grid_tactics_core::{Command, Event, HandOffTicket};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending {
    ticket: HandOffTicket,
    remaining: Duration,
}

/// Tracks hand-off tickets announced by the world and replays them as
/// [`Command::FireHandOff`] when enough host time has passed.
#[derive(Debug, Default)]
pub struct HandOffScheduler {
    pending: Vec<Pending>,
}

impl HandOffScheduler {
    /// Creates a scheduler with no pending hand-offs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events in order and emits hand-offs that became due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::HandOffScheduled { ticket, delay, .. } => {
                    if delay.is_zero() {
                        out.push(Command::FireHandOff { ticket: *ticket });
                        continue;
                    }
                    self.pending.push(Pending {
                        ticket: *ticket,
                        remaining: *delay,
                    });
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::StaleHandOffIgnored { ticket } => {
                    self.pending.retain(|pending| pending.ticket != *ticket);
                }
                Event::GameOver { .. } => {
                    if !self.pending.is_empty() {
                        debug!(dropped = self.pending.len(), "match over, pending hand-offs dropped");
                    }
                    self.pending.clear();
                }
                _ => {}
            }
        }
    }

    /// Shortest remaining delay among pending hand-offs.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|pending| pending.remaining).min()
    }

    /// Number of hand-offs waiting for their delay.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        for pending in &mut self.pending {
            pending.remaining = pending.remaining.saturating_sub(dt);
        }

        let mut due: Vec<HandOffTicket> = self
            .pending
            .iter()
            .filter(|pending| pending.remaining.is_zero())
            .map(|pending| pending.ticket)
            .collect();
        if due.is_empty() {
            return;
        }
        due.sort();

        self.pending.retain(|pending| !pending.remaining.is_zero());
        for ticket in due {
            debug!(ticket = ticket.get(), "hand-off due");
            out.push(Command::FireHandOff { ticket });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::Team;

    fn scheduled(ticket: u64, millis: u64) -> Event {
        Event::HandOffScheduled {
            ticket: HandOffTicket::new(ticket),
            to: Team::Ai,
            delay: Duration::from_millis(millis),
        }
    }

    fn tick(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn fires_once_the_delay_has_elapsed() {
        let mut scheduler = HandOffScheduler::new();
        let mut commands = Vec::new();

        scheduler.handle(&[scheduled(1, 1_000), tick(400)], &mut commands);
        assert!(commands.is_empty());
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(600)));

        scheduler.handle(&[tick(600)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::FireHandOff {
                ticket: HandOffTicket::new(1)
            }]
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn zero_delay_fires_immediately() {
        let mut scheduler = HandOffScheduler::new();
        let mut commands = Vec::new();
        scheduler.handle(&[scheduled(4, 0)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::FireHandOff {
                ticket: HandOffTicket::new(4)
            }]
        );
    }

    #[test]
    fn game_over_drops_pending_tickets() {
        let mut scheduler = HandOffScheduler::new();
        let mut commands = Vec::new();
        scheduler.handle(
            &[scheduled(2, 500), Event::GameOver { winner: Team::Player }, tick(5_000)],
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn due_tickets_fire_in_ticket_order() {
        let mut scheduler = HandOffScheduler::new();
        let mut commands = Vec::new();
        scheduler.handle(&[scheduled(7, 300), scheduled(3, 200), tick(300)], &mut commands);
        assert_eq!(
            commands,
            vec![
                Command::FireHandOff {
                    ticket: HandOffTicket::new(3)
                },
                Command::FireHandOff {
                    ticket: HandOffTicket::new(7)
                },
            ]
        );
    }
}
