//! Destructible-shape lifecycle.
//!
//! Every crumbling shape walks `Dormant → Contacted → Crumbled` and is then
//! retired out of the registry. The manager never sleeps; it is polled once
//! per simulation step with the caller's clock and answers with the
//! requests the outside world should act on.

use terrain_compiler::{CrumbleTiming, CrumblingShape};
use tracing::trace;
use util::{Number, TagIndex};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CrumbleState {
    Dormant,
    Contacted,
    Crumbled,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CrumbleEntry {
    grid: (i32, i32),
    shape: TagIndex,
    timing: CrumbleTiming,
    state: CrumbleState,
    contact_time: Number,
}

/// What the room should do about a destructible shape this step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CrumbleEvent {
    /// Swap the visual tile to empty and spawn the break-up effect.
    Crumbled {
        grid: (i32, i32),
        piece_size: Number,
    },
    /// Ask the physics engine to drop the shape.
    Retired { shape: TagIndex },
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CrumbleManager {
    /// Kept in tag order: seeds arrive in emission order and entries are
    /// only ever removed.
    entries: Vec<CrumbleEntry>,
}

impl CrumbleManager {
    pub fn new(seeds: &[CrumblingShape]) -> Self {
        let entries = seeds
            .iter()
            .map(|seed| CrumbleEntry {
                grid: seed.grid,
                shape: seed.shape,
                timing: seed.timing,
                state: CrumbleState::Dormant,
                contact_time: Number::new(0),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A qualifying dynamic body touched `shape` at `now`. Only the first
    /// contact matters; anything after that is a no-op. Contacts against
    /// shapes this manager does not track are ignored.
    pub fn notify_contact(&mut self, shape: TagIndex, now: Number) {
        let Ok(index) = self.entries.binary_search_by_key(&shape, |e| e.shape) else {
            return;
        };

        let entry = &mut self.entries[index];
        if entry.state != CrumbleState::Dormant {
            return;
        }

        trace!(shape = shape.0, "crumbling shape contacted");
        entry.state = CrumbleState::Contacted;
        entry.contact_time = now;
    }

    /// Advances every contacted entry against the supplied clock, emitting
    /// requests in tag order. Retired entries leave the registry.
    pub fn step(&mut self, now: Number, events: &mut Vec<CrumbleEvent>) {
        self.entries.retain_mut(|entry| {
            if entry.state == CrumbleState::Dormant {
                return true;
            }

            let elapsed = now - entry.contact_time;

            if entry.state == CrumbleState::Contacted && elapsed >= entry.timing.wait {
                trace!(shape = entry.shape.0, "crumbling shape broke apart");
                entry.state = CrumbleState::Crumbled;
                events.push(CrumbleEvent::Crumbled {
                    grid: entry.grid,
                    piece_size: entry.timing.piece_size,
                });
            }

            if entry.state == CrumbleState::Crumbled
                && elapsed >= entry.timing.wait + entry.timing.crumble
            {
                trace!(shape = entry.shape.0, "crumbling shape retired");
                events.push(CrumbleEvent::Retired { shape: entry.shape });
                return false;
            }

            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(tag: u32) -> CrumblingShape {
        CrumblingShape {
            grid: (tag as i32, 0),
            shape: TagIndex(tag),
            timing: CrumbleTiming {
                wait: Number::new(1),
                crumble: Number::new(2),
                piece_size: Number::new(4),
            },
        }
    }

    fn step(manager: &mut CrumbleManager, now: i32) -> Vec<CrumbleEvent> {
        let mut events = Vec::new();
        manager.step(Number::new(now), &mut events);
        events
    }

    #[test]
    fn follows_the_timed_sequence() {
        let mut manager = CrumbleManager::new(&[seed(7)]);

        manager.notify_contact(TagIndex(7), Number::new(10));

        // still waiting
        assert!(step(&mut manager, 10).is_empty());

        // wait elapsed: the tile breaks
        assert_eq!(
            step(&mut manager, 11),
            vec![CrumbleEvent::Crumbled {
                grid: (7, 0),
                piece_size: Number::new(4),
            }]
        );

        // crumble still running
        assert!(step(&mut manager, 12).is_empty());

        // and then the shape goes away for good
        assert_eq!(
            step(&mut manager, 13),
            vec![CrumbleEvent::Retired { shape: TagIndex(7) }]
        );
        assert!(manager.is_empty());

        assert!(step(&mut manager, 20).is_empty());
    }

    #[test]
    fn repeated_contacts_are_no_ops() {
        let mut manager = CrumbleManager::new(&[seed(0)]);

        manager.notify_contact(TagIndex(0), Number::new(5));
        manager.notify_contact(TagIndex(0), Number::new(50));

        // timing still counts from the first contact
        assert_eq!(step(&mut manager, 6).len(), 1);
    }

    #[test]
    fn dormant_entries_never_advance() {
        let mut manager = CrumbleManager::new(&[seed(0)]);

        assert!(step(&mut manager, 1000).is_empty());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn contacts_on_untracked_shapes_are_ignored() {
        let mut manager = CrumbleManager::new(&[seed(3)]);

        manager.notify_contact(TagIndex(99), Number::new(1));

        assert!(step(&mut manager, 100).is_empty());
    }

    #[test]
    fn a_late_poll_can_run_the_whole_sequence() {
        let mut manager = CrumbleManager::new(&[seed(0)]);

        manager.notify_contact(TagIndex(0), Number::new(0));
        let events = step(&mut manager, 10);

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CrumbleEvent::Crumbled { .. }));
        assert!(matches!(events[1], CrumbleEvent::Retired { .. }));
    }

    #[test]
    fn entries_retire_independently() {
        let mut manager = CrumbleManager::new(&[seed(0), seed(1), seed(2)]);

        manager.notify_contact(TagIndex(1), Number::new(0));
        let events = step(&mut manager, 10);

        assert_eq!(
            events,
            vec![
                CrumbleEvent::Crumbled {
                    grid: (1, 0),
                    piece_size: Number::new(4),
                },
                CrumbleEvent::Retired { shape: TagIndex(1) },
            ]
        );
        assert_eq!(manager.len(), 2);

        // the survivors can still be contacted
        manager.notify_contact(TagIndex(2), Number::new(10));
        assert_eq!(step(&mut manager, 11).len(), 1);
    }
}
