//! Draw engine — selects, schedules and removes the winner.

use crate::calendar::{ScheduleSlot, next_assignment_date};
use chrono::{Local, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use ruleta_core::error::{Result, RuletaError};
use ruleta_core::{DrawOutcome, HistoryEntry};
use ruleta_store::{HistoryStore, ParticipantStore};
use std::sync::Arc;

/// Pick an index in `0..len` with probability `1/len` each.
///
/// The index space is shuffled first and a position is then drawn from the
/// shuffled list, so insertion order never correlates with the result.
/// `len` must be non-zero.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices[rng.gen_range(0..len)]
}

/// Runs draws against the roster and history stores.
#[derive(Clone)]
pub struct DrawEngine {
    roster: Arc<ParticipantStore>,
    history: Arc<HistoryStore>,
}

impl DrawEngine {
    pub fn new(roster: Arc<ParticipantStore>, history: Arc<HistoryStore>) -> Self {
        Self { roster, history }
    }

    /// Draw a winner using the thread RNG and today's local date.
    pub fn draw(&self) -> Result<DrawOutcome> {
        self.draw_with(&mut rand::thread_rng(), Local::now().date_naive())
    }

    /// Draw a winner with an explicit RNG and fallback date.
    ///
    /// Holds the roster lock for the whole operation and the history lock
    /// while scheduling, always in that order. On an empty roster nothing
    /// is written. Roster elements that are not valid participants are
    /// never drawn and stay in the file.
    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> Result<DrawOutcome> {
        self.roster.modify(|people| {
            let mut candidates = people.parsed();
            if candidates.is_empty() {
                return Err(RuletaError::NoParticipants);
            }

            // `index` addresses the roster as listed to clients; `position` is the file slot.
            let index = pick_index(rng, candidates.len());
            let (position, winner) = candidates.swap_remove(index);
            let left = candidates.len();

            let slot = self.history.modify(|history| {
                let last = history.str_field(0, "date");
                let slot = ScheduleSlot::for_date(next_assignment_date(last, today));
                history.insert(
                    0,
                    &HistoryEntry {
                        name: winner.name.clone(),
                        date: slot.date.clone(),
                        month: slot.month.clone(),
                        week: slot.week.clone(),
                    },
                )?;
                Ok(slot)
            })?;

            // Positional removal: with duplicate names only the drawn entry goes.
            people.remove(position);

            tracing::info!(
                "🎡 {} drawn for {} ({}, {}), {left} left",
                winner.name,
                slot.date,
                slot.month,
                slot.week,
            );

            Ok(DrawOutcome {
                selected_person: winner,
                target_index: index,
                month: slot.month,
                week: slot.week,
                date: slot.date,
                participants_left: left,
            })
        })
    }
}
