//! The state of one teaching session: the class name, the roster and the
//! imports in flight.

use log::{debug, info};

use crate::{
    export_rows, extract_class_name, normalize_class_name, parse_roster, Cell, ExportRow, Roster,
    RosterError, DEFAULT_CLASS_NAME,
};

/// Handed out when an import starts. Only the ticket of the latest import
/// can update the roster.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ImportTicket {
    generation: u64,
    pub file_name: String,
    /// The class name guessed from the file name, applied once the import succeeds.
    pub class_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ImportOutcome {
    /// The roster was replaced. `students` is the number of valid rows.
    Applied { students: usize },
    /// A more recent import was started in the meantime. Nothing was changed.
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    roster: Roster,
    class_name_input: String,
    generation: u64,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The roster, for the scoring actions.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Updates the class name as the teacher types it. Returns the rewritten value.
    pub fn set_class_name_input(&mut self, input: &str) -> &str {
        self.class_name_input = normalize_class_name(input);
        &self.class_name_input
    }

    /// The class name, or a placeholder if none was given.
    pub fn class_name(&self) -> &str {
        if self.class_name_input.is_empty() {
            DEFAULT_CLASS_NAME
        } else {
            &self.class_name_input
        }
    }

    /// Starts a new import. Any import started before is superseded.
    ///
    /// If the file name looks like a class name, it replaces the current class name
    /// when the import succeeds.
    pub fn begin_import(&mut self, file_name: &str) -> ImportTicket {
        self.generation += 1;
        let class_name = extract_class_name(file_name);
        debug!("begin_import: class name {:?} from {:?}", class_name, file_name);
        ImportTicket {
            generation: self.generation,
            file_name: file_name.to_string(),
            class_name,
        }
    }

    /// Finishes an import with the rows read from the file.
    ///
    /// On error, the current roster and class name are kept as is.
    pub fn complete_import(
        &mut self,
        ticket: &ImportTicket,
        rows: &[Vec<Cell>],
    ) -> Result<ImportOutcome, RosterError> {
        if ticket.generation != self.generation {
            info!(
                "complete_import: ignoring stale import of {:?} (generation {} < {})",
                ticket.file_name, ticket.generation, self.generation
            );
            return Ok(ImportOutcome::Superseded);
        }
        let parsed = parse_roster(rows)?;
        self.roster.replace(parsed.roster);
        if let Some(class_name) = &ticket.class_name {
            self.class_name_input = class_name.clone();
        }
        info!(
            "Imported {} students into {}",
            parsed.valid_rows,
            self.class_name()
        );
        Ok(ImportOutcome::Applied {
            students: parsed.valid_rows,
        })
    }

    pub fn export_rows(&self) -> Result<Vec<ExportRow>, RosterError> {
        export_rows(&self.roster, self.class_name())
    }
}
