//! # Microfilm Allocation Engine
//!
//! A batch engine that partitions scanned document PDFs across physical
//! microfilm rolls of two formats (16mm and 35mm), assigns globally unique
//! film numbers from a persistent per-location sequence, and records the
//! resulting document/roll/segment graph in a durable SQLite store.
//!
//! ## Quick start
//!
//! ```no_run
//! use microfilm::{init, detect, allocate, store};
//!
//! # fn run() -> microfilm::Result<()> {
//! let mut project = init::initialize("RRD123-4567_OU_Invoices")?;
//! detect::process_documents(&mut project, &detect::RandomOracle::default())?;
//! detect::compute_references(&mut project)?;
//! allocate::allocate_film(&mut project)?;
//!
//! let db = store::Store::open("microfilm.db")?;
//! store::filmnumber::allocate_film_numbers(&mut project, &db)?;
//! db.save_project(&project)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The engine runs as a single-threaded batch pipeline:
//!
//! 1. **Project Initializer** ([`init`]) parses the archive folder naming
//!    convention and locates the document subfolder.
//! 2. **Oversized Detector** ([`detect`]) probes each document's page
//!    dimensions and groups oversized pages into ranges.
//! 3. **Reference Planner** ([`detect::compute_references`]) inserts one
//!    reference page per oversized range.
//! 4. **16mm / 35mm Allocators** ([`allocate`]) pack documents into film
//!    rolls under capacity, padding, and splitting rules.
//! 5. **Film-Number Issuer** ([`store::filmnumber`]) draws the next number
//!    from a persistent per-location sequence.
//! 6. **Durable Store** ([`store`]) commits the project/roll/segment graph
//!    transactionally.
//! 7. **Export Writer** ([`export`]) emits the canonical JSON triple.

pub mod allocate;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod init;
pub mod logging;
pub mod model;
pub mod store;
pub mod util;

pub use crate::config::Config;
pub use crate::error::{MicrofilmError, Result};
pub use crate::model::{
    Document, FilmAllocation, FilmRoll, FilmType, PageDimension, PageRange, Project,
};
