use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::error::LoadError;
use super::model::{CellValue, Dataset, RawTable, Record};

/// Columns every upload must carry, matched after trimming the header cells.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "State",
    "Number in Poverty",
    "Number of Millionaires",
    "State Population",
];

/// Extensions offered by the upload control.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// How the bytes of an upload are parsed, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadsheetFormat {
    /// Any workbook calamine can sniff: xlsx, xlsm, xlsb, xls, ods.
    Workbook,
    Csv,
}

impl SpreadsheetFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Some(SpreadsheetFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SpreadsheetFormat::Workbook),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadsheetFormat::Workbook => "workbook",
            SpreadsheetFormat::Csv => "csv",
        }
    }
}

/// A file handed over by the upload control: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Upload {
            name: name.into(),
            bytes,
        }
    }

    /// Read a picked file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Upload::new(name, bytes))
    }

    pub fn format(&self) -> Option<SpreadsheetFormat> {
        SpreadsheetFormat::from_file_name(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse, validate and enrich an upload.
///
/// Pipeline:
/// 1. parse the first sheet (or the CSV) into a [`RawTable`]
/// 2. trim header names
/// 3. require [`REQUIRED_COLUMNS`], failing on the first absent one
/// 4. coerce the three count columns to numbers
/// 5. drop every row with a missing cell in any column
/// 6. derive millionaire density and poverty rate
pub fn load_upload(upload: &Upload) -> Result<Dataset, LoadError> {
    let format = upload.format().ok_or_else(|| {
        LoadError::parse(
            &upload.name,
            format!(
                "unsupported file type (expected one of: {})",
                ACCEPTED_EXTENSIONS.join(", ")
            ),
        )
    })?;

    let table = parse_table(format, &upload.bytes)
        .map_err(|e| LoadError::parse(&upload.name, format!("{e:#}")))?;

    log::debug!(
        "Parsed {} ({}): headers {:?}, {} rows",
        upload.name,
        format.as_str(),
        table.headers,
        table.rows.len()
    );

    build_dataset(&upload.name, &table)
}

/// Parse raw bytes into a header row plus data rows.
pub fn parse_table(format: SpreadsheetFormat, bytes: &[u8]) -> Result<RawTable> {
    match format {
        SpreadsheetFormat::Workbook => parse_workbook(bytes),
        SpreadsheetFormat::Csv => parse_csv(bytes),
    }
}

// ---------------------------------------------------------------------------
// Workbook parser
// ---------------------------------------------------------------------------

/// First worksheet, first row as header. An empty sheet gives an empty table.
fn parse_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("not a readable spreadsheet")?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.context("reading first worksheet")?,
        None => bail!("workbook contains no worksheets"),
    };

    Ok(table_from_range(&range))
}

/// First row of the sheet is the header; an empty sheet gives an empty table.
fn table_from_range(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return RawTable::default();
    };

    RawTable {
        headers: header.iter().map(header_name).collect(),
        rows: rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect(),
    }
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Missing,
        other => CellValue::Other(other.to_string()),
    }
}

fn header_name(cell: &Data) -> String {
    match cell_from_data(cell) {
        CellValue::Missing => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// Header row with column names; every cell is kept as text and coerced later.
fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .map(|v| CellValue::Text(v.to_string()))
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Validation and derived metrics
// ---------------------------------------------------------------------------

/// Turn a parsed table into a [`Dataset`]. The table itself is left untouched.
pub fn build_dataset(source: &str, table: &RawTable) -> Result<Dataset, LoadError> {
    let headers: Vec<&str> = table.headers.iter().map(|h| h.trim()).collect();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })?;
    }
    let [state_col, poverty_col, millionaires_col, population_col] = columns;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in 0..table.rows.len() {
        let any_missing = (0..headers.len()).any(|col| table.cell(row, col).is_missing());
        let number = |col: usize| table.cell(row, col).to_number();

        match (number(poverty_col), number(millionaires_col), number(population_col)) {
            (Some(poverty), Some(millionaires), Some(population)) if !any_missing => {
                let state = table.cell(row, state_col).to_string().trim().to_string();
                records.push(Record::new(state, poverty, millionaires, population));
            }
            _ => dropped_rows += 1,
        }
    }

    let dataset = Dataset::new(source, records, dropped_rows);

    if dropped_rows > 0 {
        log::warn!("{source}: dropped {dropped_rows} row(s) with missing or non-numeric values");
    }
    let zero = dataset.zero_population_states();
    if !zero.is_empty() {
        log::warn!("{source}: zero population for {zero:?}, ratios are undefined");
    }
    log::info!("Loaded {} states from {source}", dataset.len());

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "State,Number in Poverty,Number of Millionaires,State Population";

    fn csv_upload(text: &str) -> Upload {
        Upload::new("povertymillionaires.csv", text.as_bytes().to_vec())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn loads_rows_and_derives_ratios() {
        let upload = csv_upload(&format!("{HEADER}\nAlabama,100,10,1000\nAlaska,50,5,500\n"));
        let ds = load_upload(&upload).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 0);
        assert_eq!(ds.source, "povertymillionaires.csv");
        for r in &ds.records {
            assert!(close(r.millionaire_density, 0.01));
            assert!(close(r.poverty_rate, 0.1));
        }
        assert_eq!(ds.records[0].state, "Alabama");
        assert_eq!(ds.records[1].state, "Alaska");
    }

    #[test]
    fn ratios_match_counts_over_population() {
        let upload = csv_upload(&format!(
            "{HEADER}\nTexas,3900000,570000,29500000\nVermont,60000,22000,645000\n"
        ));
        let ds = load_upload(&upload).unwrap();
        for r in &ds.records {
            assert!(close(r.millionaire_density, r.number_of_millionaires / r.state_population));
            assert!(close(r.poverty_rate, r.number_in_poverty / r.state_population));
        }
    }

    #[test]
    fn extra_columns_and_padded_headers_are_accepted() {
        let upload = csv_upload(
            " State ,Region,  Number in Poverty,Number of Millionaires ,State Population\n\
             Ohio,Midwest,1500000,300000,11800000\n",
        );
        let ds = load_upload(&upload).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].number_in_poverty, 1_500_000.0);
    }

    #[test]
    fn each_missing_column_is_named() {
        for missing in REQUIRED_COLUMNS {
            let header: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|c| *c != missing)
                .collect();
            let upload = csv_upload(&format!("{}\nx,1,2\n", header.join(",")));
            assert_eq!(
                load_upload(&upload),
                Err(LoadError::MissingColumn {
                    column: missing.to_string()
                })
            );
        }
    }

    #[test]
    fn first_missing_column_wins() {
        let upload = csv_upload("Number in Poverty,Number of Millionaires\n1,2\n");
        let err = load_upload(&upload).unwrap_err();
        assert_eq!(err.to_string(), "Missing required column: State");
    }

    #[test]
    fn non_numeric_rows_are_dropped() {
        let upload = csv_upload(&format!(
            "{HEADER}\n\
             Alabama,100,10,1000\n\
             Alaska,lots,5,500\n\
             Arizona,100,ten,1000\n\
             Arkansas,100,10,unknown\n\
             California,200,20,2000\n"
        ));
        let ds = load_upload(&upload).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 3);
        assert_eq!(ds.state_names(), vec!["Alabama", "California"]);
    }

    #[test]
    fn missing_cells_in_any_column_drop_the_row() {
        let upload = csv_upload(
            "State,Note,Number in Poverty,Number of Millionaires,State Population\n\
             Alabama,ok,100,10,1000\n\
             Alaska,,50,5,500\n\
             ,ok,50,5,500\n\
             Arizona,ok,100,10\n\
             Oregon,N/A,100,10,1000\n",
        );
        let ds = load_upload(&upload).unwrap();
        assert_eq!(ds.state_names(), vec!["Alabama"]);
        assert_eq!(ds.dropped_rows, 4);
    }

    #[test]
    fn zero_population_is_kept_with_undefined_ratios() {
        let upload = csv_upload(&format!("{HEADER}\nGhost,0,0,0\nIowa,10,1,100\n"));
        let ds = load_upload(&upload).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.records[0].poverty_rate.is_nan());
        assert_eq!(ds.zero_population_states(), vec!["Ghost"]);
    }

    #[test]
    fn empty_csv_reports_state_column() {
        let err = load_upload(&csv_upload("")).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingColumn {
                column: "State".into()
            }
        );
    }

    #[test]
    fn unreadable_workbook_is_a_parse_error() {
        let upload = Upload::new("povertymillionaires.xlsx", b"definitely not a zip".to_vec());
        match load_upload(&upload) {
            Err(LoadError::Parse { file, .. }) => assert_eq!(file, "povertymillionaires.xlsx"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension_is_a_parse_error() {
        let upload = Upload::new("notes.txt", HEADER.as_bytes().to_vec());
        assert!(matches!(load_upload(&upload), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SpreadsheetFormat::from_file_name("a.XLSX"),
            Some(SpreadsheetFormat::Workbook)
        );
        assert_eq!(SpreadsheetFormat::from_file_name("a.xls"), Some(SpreadsheetFormat::Workbook));
        assert_eq!(SpreadsheetFormat::from_file_name("a.csv"), Some(SpreadsheetFormat::Csv));
        assert_eq!(SpreadsheetFormat::from_file_name("a"), None);
    }

    #[test]
    fn build_dataset_does_not_touch_the_table() {
        let table = RawTable {
            headers: REQUIRED_COLUMNS.iter().map(|h| format!(" {h} ")).collect(),
            rows: vec![vec![
                CellValue::Text("Utah".into()),
                CellValue::Number(300.0),
                CellValue::Number(30.0),
                CellValue::Number(3000.0),
            ]],
        };
        let before = table.clone();
        let ds = build_dataset("mem", &table).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(table, before);
    }

    #[test]
    fn numeric_state_cells_become_text() {
        let table = RawTable {
            headers: REQUIRED_COLUMNS.iter().map(|h| h.to_string()).collect(),
            rows: vec![vec![
                CellValue::Number(42.0),
                CellValue::Number(1.0),
                CellValue::Number(1.0),
                CellValue::Number(10.0),
            ]],
        };
        let ds = build_dataset("mem", &table).unwrap();
        assert_eq!(ds.records[0].state, "42");
    }

    #[test]
    fn workbook_cells_map_to_cell_values() {
        use calamine::CellErrorType;

        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_from_data(&Data::String("Ohio".into())),
            CellValue::Text("Ohio".into())
        );
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Missing);
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::NA)),
            CellValue::Missing
        );
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-01-01T00:00:00".into())),
            CellValue::Other("2024-01-01T00:00:00".into())
        );
    }

    #[test]
    fn workbook_header_names() {
        assert_eq!(header_name(&Data::String(" State ".into())), " State ");
        assert_eq!(header_name(&Data::Int(2020)), "2020");
        assert_eq!(header_name(&Data::Empty), "");
    }

    #[test]
    fn worksheet_rows_load_into_a_dataset() {
        let mut range: Range<Data> = Range::new((0, 0), (5, 3));
        let header = [" State ", "Number in Poverty", "Number of Millionaires", "State Population "];
        for (col, name) in header.iter().enumerate() {
            range.set_value((0, col as u32), Data::String(name.to_string()));
        }
        let rows = [
            [Data::String("Alabama".into()), Data::Int(100), Data::Float(10.0), Data::Int(1000)],
            [Data::String("Alaska".into()), Data::Float(50.0), Data::Int(5), Data::Int(500)],
            [Data::String("Arizona".into()), Data::String("n/a".into()), Data::Int(30), Data::Int(1000)],
            [Data::String("Arkansas".into()), Data::Int(20), Data::Empty, Data::Int(1000)],
            [Data::Int(42), Data::Int(1), Data::Int(1), Data::Int(10)],
        ];
        for (r, row) in rows.into_iter().enumerate() {
            for (col, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32 + 1, col as u32), cell);
            }
        }

        let table = table_from_range(&range);
        assert_eq!(table.headers[0], " State ");
        assert_eq!(table.rows.len(), 5);

        let ds = build_dataset("book.xlsx", &table).unwrap();
        assert_eq!(ds.state_names(), ["Alabama", "Alaska", "42"]);
        assert_eq!(ds.dropped_rows, 2);
        assert!(close(ds.records[0].millionaire_density, 0.01));
        assert!(close(ds.records[1].poverty_rate, 0.1));
    }

    #[test]
    fn empty_worksheet_is_an_empty_table() {
        let range: Range<Data> = Range::empty();
        assert_eq!(table_from_range(&range), RawTable::default());
        assert_eq!(
            build_dataset("empty.xlsx", &RawTable::default()).unwrap_err(),
            LoadError::MissingColumn {
                column: "State".into()
            }
        );
    }

    #[test]
    fn blank_state_drops_the_row_and_names_are_trimmed() {
        let upload = csv_upload(&format!("{HEADER}\n   ,1,2,100\n  Ohio  ,1,2,100\n"));
        let ds = load_upload(&upload).unwrap();
        assert_eq!(ds.state_names(), ["Ohio"]);
        assert_eq!(ds.dropped_rows, 1);
    }
}
