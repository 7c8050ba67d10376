//! Film-number issuance: a persistent, per-location monotone sequence.
//!
//! See spec §4.7. The sequence of record lives in the `Rolls` table, not
//! in memory: the first number issued in a call is always `1 +
//! MAX(integer_value(film_number[1..]))` over every roll already
//! persisted under that location code. But a single call can issue many
//! numbers before any of them are persisted (every roll in a batch
//! allocation shares one location-code sequence, per §4.7), so the
//! issuer seeds a local counter from one store query and then advances
//! it in-process for the rest of the batch, rather than re-querying the
//! store per roll (which would hand out the same number to every roll in
//! an unsaved batch).

use rusqlite::params;

use crate::model::Project;
use crate::{MicrofilmError, Result};

use super::Store;

const SEQUENCE_WIDTH: usize = 7;

/// Assigns a film number to every roll in `project.film_allocation` that
/// doesn't already have one, 16mm rolls first then 35mm, in allocation
/// order. Must run after allocation and before [`Store::save_project`]
/// so the newly issued numbers persist together with the rolls.
///
/// The issuer reads the current persisted MAX once per call and then
/// advances an in-process counter for every roll it assigns in this
/// batch, so two rolls allocated together (e.g. a split document's
/// rolls, or a document's 16mm and mirrored 35mm rolls) never collide
/// even though neither is in the store yet. Callers embedding this in a
/// concurrent context must serialize access to the store themselves
/// (spec §5).
pub fn allocate_film_numbers(project: &mut Project, store: &Store) -> Result<()> {
    let location_code = project.location_code();

    let Some(allocation) = project.film_allocation.as_mut() else {
        return Err(MicrofilmError::FilmNumber(
            "project has no film allocation to number".to_string(),
        ));
    };

    let mut sequence = next_sequence(store, location_code)?;

    for roll in allocation.rolls_16mm.iter_mut().chain(allocation.rolls_35mm.iter_mut()) {
        if roll.film_number.is_empty() {
            roll.film_number = format_film_number(location_code, sequence);
            tracing::info!(film_number = %roll.film_number, roll_id = roll.roll_id, "film number assigned");
            sequence += 1;
        }
    }

    Ok(())
}

fn next_sequence(store: &Store, location_code: &str) -> Result<i64> {
    let pattern = format!("{location_code}%");
    let max: Option<i64> = store.connection().query_row(
        "SELECT MAX(CAST(SUBSTR(film_number, 2) AS INTEGER)) FROM Rolls WHERE film_number LIKE ?1",
        params![pattern],
        |row| row.get(0),
    )?;

    Ok(max.unwrap_or(0) + 1)
}

fn format_film_number(location_code: &str, sequence: i64) -> String {
    format!("{location_code}{sequence:0width$}", width = SEQUENCE_WIDTH)
}
