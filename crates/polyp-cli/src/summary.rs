use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use polyp_model::{CategoryCounts, PatientId, PatientRecord, SessionSnapshot, SessionState};

/// End-of-session table: one row per patient with findings, then totals.
pub fn summary_table(state: &SessionState) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Serrated"),
        header_cell("Adenomatous"),
        header_cell("Total"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut reviewed = 0usize;
    for (patient, record) in state.cohort.iter().filter(|(_, record)| !record.is_zero()) {
        reviewed += 1;
        table.add_row(patient_row(patient, record, patient == state.current));
    }
    if reviewed == 0 {
        table.add_row(vec![
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    let totals = state.cohort.totals();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.serrated).add_attribute(Attribute::Bold),
        Cell::new(totals.adenomatous).add_attribute(Attribute::Bold),
        Cell::new(totals.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_summary(state: &SessionState) {
    println!("Current: {}", state.current);
    println!("{}", summary_table(state));
}

/// Counts for a single report, as printed by `count`.
pub fn counts_table(counts: CategoryCounts) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Serrated"), count_cell(counts.serrated)]);
    table.add_row(vec![Cell::new("Adenomatous"), count_cell(counts.adenomatous)]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(counts.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

#[derive(Debug, Serialize)]
pub struct CountsExport {
    pub serrated: u32,
    pub adenomatous: u32,
    pub total: u32,
}

impl From<CategoryCounts> for CountsExport {
    fn from(counts: CategoryCounts) -> Self {
        Self {
            serrated: counts.serrated,
            adenomatous: counts.adenomatous,
            total: counts.total(),
        }
    }
}

/// JSON shape of a finished session.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    pub generated_at: String,
    pub totals: CountsExport,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

impl SessionExport {
    pub fn new(state: &SessionState) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            totals: state.cohort.totals().into(),
            session: state.snapshot(),
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn patient_row(patient: PatientId, record: &PatientRecord, is_current: bool) -> Vec<Cell> {
    let label = if is_current {
        Cell::new(format!("> {}", patient.get())).add_attribute(Attribute::Bold)
    } else {
        Cell::new(patient.get())
    };
    vec![
        label,
        count_cell(record.serrated()),
        count_cell(record.adenomatous()),
        Cell::new(record.total()),
    ]
}

fn count_cell(count: u32) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
