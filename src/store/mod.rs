//! The durable relational store: schema creation and transactional
//! project save/load. See spec §4.8.
//!
//! Bit-compatible with the original schema so an existing database file
//! remains readable: four tables (`Projects`, `Rolls`, `TempRolls`,
//! `Documents`), created idempotently on open.

pub mod filmnumber;

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{DocumentSegment, FilmAllocation, FilmRoll, FilmType, PageRange, Project, RollStatus};
use crate::{MicrofilmError, Result};

/// A handle on the durable SQLite store, opened once and reused across
/// the film-number issuer and project save/load.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (creating if absent) the database at `path` and ensures its
    /// schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// Opens an in-memory database, primarily for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS Projects (
                    project_id INTEGER PRIMARY KEY,
                    archive_id TEXT NOT NULL,
                    location TEXT,
                    doc_type TEXT,
                    path TEXT,
                    folderName TEXT,
                    oversized BOOLEAN,
                    total_pages INTEGER,
                    total_pages_with_refs INTEGER,
                    date_created TEXT,
                    data_dir TEXT,
                    index_path TEXT
                );

                CREATE TABLE IF NOT EXISTS Rolls (
                    roll_id INTEGER PRIMARY KEY,
                    film_number TEXT,
                    film_type TEXT,
                    capacity INTEGER,
                    pages_used INTEGER,
                    pages_remaining INTEGER,
                    status TEXT,
                    project_id INTEGER,
                    creation_date TEXT,
                    source_temp_roll_id INTEGER NULL,
                    created_temp_roll_id INTEGER NULL,
                    film_number_source TEXT NULL DEFAULT 'new',
                    FOREIGN KEY (project_id) REFERENCES Projects(project_id)
                );

                CREATE TABLE IF NOT EXISTS TempRolls (
                    temp_roll_id INTEGER PRIMARY KEY,
                    film_type TEXT,
                    capacity INTEGER,
                    usable_capacity INTEGER,
                    status TEXT,
                    creation_date TEXT,
                    source_roll_id INTEGER,
                    used_by_roll_id INTEGER NULL,
                    FOREIGN KEY (source_roll_id) REFERENCES Rolls(roll_id),
                    FOREIGN KEY (used_by_roll_id) REFERENCES Rolls(roll_id)
                );

                CREATE TABLE IF NOT EXISTS Documents (
                    document_id INTEGER PRIMARY KEY,
                    document_name TEXT,
                    com_id TEXT,
                    roll_id INTEGER,
                    page_range_start INTEGER,
                    page_range_end INTEGER,
                    is_oversized BOOLEAN,
                    filepath TEXT,
                    blip TEXT,
                    blipend TEXT,
                    blip_type TEXT DEFAULT '16mm',
                    FOREIGN KEY (roll_id) REFERENCES Rolls(roll_id)
                );

                CREATE INDEX IF NOT EXISTS idx_documents_blip_type ON Documents (blip_type);
                ",
            )
            .map_err(|e| MicrofilmError::Schema(e.to_string()))?;

        Ok(())
    }

    /// Returns the raw connection, for the film-number issuer which
    /// needs to run its own query/update under the same handle.
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Saves `project` and its allocation transactionally: inserts the
    /// Projects row, then every roll (16mm first, then 35mm) each
    /// followed by its segments as Documents rows. Rolls back on any
    /// error, commits on success (spec §4.8).
    pub fn save_project(&mut self, project: &Project) -> Result<i64> {
        let tx = self.conn.transaction()?;

        let project_id = {
            tx.execute(
                "INSERT INTO Projects (
                    archive_id, location, doc_type, path, folderName,
                    oversized, total_pages, total_pages_with_refs, date_created,
                    data_dir, index_path
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    project.archive_id,
                    project.location,
                    project.doc_type,
                    project.project_path.to_string_lossy(),
                    project.project_folder_name,
                    project.has_oversized,
                    project.total_pages,
                    project.total_pages_with_refs,
                    crate::util::current_timestamp(),
                    data_dir(project).to_string_lossy().into_owned(),
                    Option::<String>::None,
                ],
            )?;
            tx.last_insert_rowid()
        };

        if let Some(allocation) = &project.film_allocation {
            save_rolls_and_documents(&tx, &allocation.rolls_16mm, FilmType::Mm16, project_id)?;
            save_rolls_and_documents(&tx, &allocation.rolls_35mm, FilmType::Mm35, project_id)?;
        }

        tx.commit()?;

        tracing::info!(archive_id = %project.archive_id, project_id, "project saved");

        Ok(project_id)
    }

    /// Loads the most recently saved project row for `archive_id`,
    /// together with its rolls and documents, rebuilding a [`Project`].
    /// Returns `None` if no matching project exists.
    ///
    /// Spec invariant 9 requires only structural equality modulo
    /// database-assigned primary keys; this reconstructs every field the
    /// export writer and allocators observe, but document-level oversize
    /// detail (`dimensions`, `ranges`, `reference_pages`) is not
    /// persisted by the schema and so is not restored — callers needing
    /// it should keep the in-memory `Project` from the allocation run.
    pub fn load_project(&self, archive_id: &str) -> Result<Option<Project>> {
        let row = self
            .conn
            .query_row(
                "SELECT project_id, location, doc_type, path, folderName,
                        oversized, total_pages, total_pages_with_refs
                 FROM Projects WHERE archive_id = ?1
                 ORDER BY project_id DESC LIMIT 1",
                params![archive_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, bool>(5)?,
                        row.get::<_, i64>(6)?,
                        row.get::<_, i64>(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((project_id, location, doc_type, path, folder_name, oversized, total_pages, total_pages_with_refs)) =
            row
        else {
            return Ok(None);
        };

        let mut project = Project::new(archive_id, location, doc_type);
        project.project_path = path.into();
        project.project_folder_name = folder_name;
        project.has_oversized = oversized;
        project.total_pages = total_pages;
        project.total_pages_with_refs = total_pages_with_refs;

        let mut allocation = FilmAllocation::new(project.archive_id.clone(), project.project_folder_name.clone());
        allocation.rolls_16mm = self.load_rolls(project_id, FilmType::Mm16)?;
        allocation.rolls_35mm = self.load_rolls(project_id, FilmType::Mm35)?;
        project.film_allocation = Some(allocation);

        Ok(Some(project))
    }

    fn load_rolls(&self, project_id: i64, film_type: FilmType) -> Result<Vec<FilmRoll>> {
        let mut stmt = self.conn.prepare(
            "SELECT roll_id, film_number, capacity, pages_used, pages_remaining, status, creation_date
             FROM Rolls WHERE project_id = ?1 AND film_type = ?2 ORDER BY roll_id",
        )?;

        let rows = stmt.query_map(params![project_id, film_type.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut rolls = Vec::new();
        for (index, row) in rows.enumerate() {
            let (db_roll_id, film_number, capacity, pages_used, pages_remaining, status, creation_date) = row?;

            let mut roll = FilmRoll::new(index as i64 + 1, film_type);
            roll.film_number = film_number;
            roll.capacity = capacity;
            roll.pages_used = pages_used;
            roll.pages_remaining = pages_remaining;
            roll.status = match status.as_str() {
                "partial" => RollStatus::Partial,
                "full" => RollStatus::Full,
                _ => RollStatus::Active,
            };
            roll.is_partial = roll.status == RollStatus::Partial;
            roll.creation_date = creation_date;
            roll.segments = self.load_segments(db_roll_id, film_type)?;

            rolls.push(roll);
        }

        // `has_split_documents` isn't a stored column: the allocator (see
        // `allocate::pack`) only ever sets it on the roll a split
        // document's overflow is *leaving*, so a single roll's own
        // segment list never contains the same doc_id twice. Reconstruct
        // it by checking whether a roll's last segment's `doc_id`
        // reappears as the following roll's first segment — the split
        // continuation the allocator produces.
        for i in 0..rolls.len().saturating_sub(1) {
            let continues = match (rolls[i].segments.last(), rolls[i + 1].segments.first()) {
                (Some(last), Some(next)) => last.doc_id == next.doc_id,
                _ => false,
            };
            if continues {
                rolls[i].has_split_documents = true;
            }
        }

        Ok(rolls)
    }

    fn load_segments(&self, db_roll_id: i64, film_type: FilmType) -> Result<Vec<DocumentSegment>> {
        let mut stmt = self.conn.prepare(
            "SELECT document_name, page_range_start, page_range_end, is_oversized, filepath
             FROM Documents WHERE roll_id = ?1 AND blip_type = ?2 ORDER BY document_id",
        )?;

        let rows = stmt.query_map(params![db_roll_id, film_type.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut segments = Vec::new();
        for (index, row) in rows.enumerate() {
            let (doc_id, start, end, has_oversized, path) = row?;
            let page_range = PageRange::new(start, end);
            segments.push(DocumentSegment {
                doc_id,
                path: path.into(),
                pages: page_range.len(),
                page_range,
                frame_range: page_range,
                document_index: index as i64 + 1,
                has_oversized,
            });
        }

        Ok(segments)
    }
}

fn data_dir(project: &Project) -> std::path::PathBuf {
    project.project_path.join(".data")
}

fn save_rolls_and_documents(
    tx: &rusqlite::Transaction<'_>,
    rolls: &[FilmRoll],
    film_type: FilmType,
    project_id: i64,
) -> Result<()> {
    for roll in rolls {
        tx.execute(
            "INSERT INTO Rolls (
                film_number, film_type, capacity, pages_used, pages_remaining,
                status, project_id, creation_date, film_number_source
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'new')",
            params![
                roll.film_number,
                film_type.as_str(),
                roll.capacity,
                roll.pages_used,
                roll.pages_remaining,
                roll.status.as_str(),
                project_id,
                roll.creation_date,
            ],
        )?;
        let db_roll_id = tx.last_insert_rowid();

        for segment in &roll.segments {
            tx.execute(
                "INSERT INTO Documents (
                    document_name, com_id, roll_id, page_range_start, page_range_end,
                    is_oversized, filepath, blip_type
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    segment.doc_id,
                    Option::<i64>::None,
                    db_roll_id,
                    segment.page_range.start,
                    segment.page_range.end,
                    segment.has_oversized,
                    segment.path.to_string_lossy(),
                    film_type.as_str(),
                ],
            )?;
        }
    }

    Ok(())
}
