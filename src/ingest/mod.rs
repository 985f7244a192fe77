//! CSV ingest adapter for the three input tables
//!
//! Loads the asset registry, the maintenance log and the reference table
//! from CSV exports and hands the engine typed records.
//!
//! # Column names
//!
//! Headers are matched case-insensitively against English names and the
//! Spanish names used by the source spreadsheets (`id_activo`,
//! `horometro_actual`, `costo_repuestos`, ...). Spaces and dashes in a header
//! count as underscores.
//!
//! # Cell handling
//!
//! - Blank, `nan`, `null`, `-` cells are absent
//! - Money cells may carry `$`, currency codes and either grouping convention
//! - A cell that does not parse is absent and counted in `LoadReport::invalid_cells`
//! - A purchase year before 1900 or after the year following the as-of year
//!   is counted the same way
//! - A meter reading that does not parse becomes NaN so the fleet pass rejects the row
//!
//! Records are line-based: a quoted field that spans several lines is not
//! joined, so each physical line is read as its own row.
//!
//! Only a missing key column (asset id, equipment type) fails a load.

pub mod parse;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{AssetRecord, MaintenanceEvent, MaintenanceKind, ReferenceEntry};
use parse::{csv_split, is_blank, normalize_header, parse_date, parse_number, Cell};

// ============================================================================
// Errors and Reports
// ============================================================================

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to read {input}: {error}")]
    Read { input: String, error: std::io::Error },

    #[error("Empty file: {0}")]
    EmptyInput(String),

    #[error("{input}: missing required column '{column}' (accepted names: {aliases})")]
    MissingColumn {
        input: String,
        column: &'static str,
        aliases: String,
    },
}

/// What a load did with its input.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoadReport {
    pub input: String,
    /// Data lines read (header excluded, blank lines excluded)
    pub rows: usize,
    pub loaded: usize,
    /// Rows without a key value
    pub skipped: usize,
    /// Lines that could not be read
    pub read_errors: usize,
    pub invalid_cells: usize,
}

/// Records of one table and the report of how they were read.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

// ============================================================================
// Column Aliases
// ============================================================================

const ASSET_ID: &[&str] = &["id_activo", "asset_id", "id", "identifier"];
const EQUIPMENT_TYPE: &[&str] = &["tipo_equipo", "equipment_type", "type"];
const BRAND: &[&str] = &["marca", "brand", "make"];
const MODEL: &[&str] = &["modelo", "model"];
const PURCHASE_YEAR: &[&str] = &["ano_compra", "año_compra", "purchase_year", "year"];
const CURRENT_HOURS: &[&str] = &["horometro_actual", "current_hours", "hours", "meter_hours"];
const PURCHASE_VALUE: &[&str] = &["valor_compra", "purchase_value"];
const RESIDUAL_VALUE: &[&str] = &["valor_residual_estimado", "valor_residual", "residual_value"];
const AGE_YEARS: &[&str] = &["edad_anos", "edad_años", "age_years", "age"];

const DATE: &[&str] = &["fecha", "date"];
const KIND: &[&str] = &["tipo_mantenimiento", "maintenance_type", "kind"];
const PARTS_COST: &[&str] = &["costo_repuestos", "parts_cost"];
const LABOR_COST: &[&str] = &["costo_mano_obra", "labor_cost", "labour_cost"];
const TOTAL_COST: &[&str] = &["costo_mantenimiento", "costo_total", "total_cost"];
const DOWNTIME_HOURS: &[&str] = &["horas_parada", "downtime_hours"];
const DESCRIPTION: &[&str] = &["descripcion", "descripción", "description"];

const SERVICE_LIFE: &[&str] = &["vida_util_esperada_horas", "expected_service_life_hours", "service_life_hours"];
const DEPRECIATION: &[&str] = &["tasa_depreciacion_anual", "annual_depreciation_rate", "depreciation_rate"];
const HOURLY_COST: &[&str] = &["costo_hora_operacion", "hourly_operating_cost"];
const DOWNTIME_DAY_COST: &[&str] = &["costo_dia_parada", "downtime_cost_per_day"];

/// Oldest purchase year accepted at ingest.
const EARLIEST_YEAR: i32 = 1900;

/// Header lookup for one table.
struct ColumnMap {
    headers: Vec<String>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        Self {
            headers: csv_split(header).iter().map(|h| normalize_header(h)).collect(),
        }
    }

    fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h == alias))
    }

    fn require(&self, aliases: &[&'static str], column: &'static str, input: &str) -> Result<usize, IngestError> {
        self.find(aliases).ok_or_else(|| IngestError::MissingColumn {
            input: input.to_string(),
            column,
            aliases: aliases.join(", "),
        })
    }
}

/// One data line, split.
struct Row<'r> {
    fields: &'r [String],
    invalid_cells: usize,
}

impl Row<'_> {
    fn text(&self, idx: Option<usize>) -> String {
        idx.and_then(|i| self.fields.get(i))
            .map(|s| s.trim())
            .filter(|s| !is_blank(s))
            .unwrap_or_default()
            .to_string()
    }

    fn number(&mut self, idx: Option<usize>) -> Cell {
        let cell = idx
            .and_then(|i| self.fields.get(i))
            .map_or(Cell::Blank, |s| parse_number(s));
        if cell == Cell::Invalid {
            self.invalid_cells += 1;
        }
        cell
    }

    fn opt_f64(&mut self, idx: Option<usize>) -> Option<f64> {
        self.number(idx).value()
    }

    /// A calendar year in `EARLIEST_YEAR..=latest`. Anything else is invalid.
    fn year(&mut self, idx: Option<usize>, latest: i32) -> Option<i32> {
        let value = self.opt_f64(idx)?.round();
        if (f64::from(EARLIEST_YEAR)..=f64::from(latest)).contains(&value) {
            Some(value as i32)
        } else {
            self.invalid_cells += 1;
            None
        }
    }

    fn date(&mut self, idx: Option<usize>) -> Option<chrono::NaiveDate> {
        let raw = self.text(idx);
        if raw.is_empty() {
            return None;
        }
        let date = parse_date(&raw);
        if date.is_none() {
            self.invalid_cells += 1;
        }
        date
    }
}

// ============================================================================
// Generic Line Reader
// ============================================================================

fn read_table<R, T>(
    reader: R,
    input: &str,
    build: impl Fn(&ColumnMap) -> Result<Box<dyn Fn(&mut Row<'_>) -> Option<T>>, IngestError>,
) -> Result<Loaded<T>, IngestError>
where
    R: BufRead,
{
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| IngestError::EmptyInput(input.to_string()))?
        .map_err(|error| IngestError::Read { input: input.to_string(), error })?;

    let columns = ColumnMap::from_header(&header);
    let parse_row = build(&columns)?;

    let mut report = LoadReport {
        input: input.to_string(),
        ..LoadReport::default()
    };
    let mut records = Vec::new();

    for (line_num, line_result) in lines.enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                warn!(input, line = line_num + 2, error = %e, "Error reading line");
                report.read_errors += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        report.rows += 1;
        let fields = csv_split(&line);
        let mut row = Row { fields: &fields, invalid_cells: 0 };
        match parse_row(&mut row) {
            Some(record) => records.push(record),
            None => report.skipped += 1,
        }
        report.invalid_cells += row.invalid_cells;
    }

    report.loaded = records.len();
    if report.invalid_cells > 0 || report.skipped > 0 {
        warn!(
            input,
            skipped = report.skipped,
            invalid_cells = report.invalid_cells,
            "Some cells could not be parsed"
        );
    }
    info!(input, rows = report.rows, loaded = report.loaded, "Table loaded");

    Ok(Loaded { records, report })
}

fn open(path: &Path) -> Result<BufReader<File>, IngestError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| IngestError::Io(path.to_path_buf(), e))
}

// ============================================================================
// Assets
// ============================================================================

/// Load the asset registry. `as_of_year` derives `age_years` from the purchase year.
pub fn load_assets(path: impl AsRef<Path>, as_of_year: i32) -> Result<Loaded<AssetRecord>, IngestError> {
    let path = path.as_ref();
    read_assets(open(path)?, &path.display().to_string(), as_of_year)
}

pub fn read_assets(reader: impl BufRead, input: &str, as_of_year: i32) -> Result<Loaded<AssetRecord>, IngestError> {
    read_table(reader, input, |cols| {
        let id = cols.require(ASSET_ID, "asset id", input)?;
        let equipment_type = cols.find(EQUIPMENT_TYPE);
        let brand = cols.find(BRAND);
        let model = cols.find(MODEL);
        let purchase_year = cols.find(PURCHASE_YEAR);
        let hours = cols.find(CURRENT_HOURS);
        let purchase_value = cols.find(PURCHASE_VALUE);
        let residual_value = cols.find(RESIDUAL_VALUE);
        let age = cols.find(AGE_YEARS);

        Ok(Box::new(move |row: &mut Row<'_>| {
            // Blank ids are kept so the fleet pass can report them
            let current_hours = match row.number(hours) {
                Cell::Value(v) => v,
                Cell::Blank => 0.0,
                Cell::Invalid => f64::NAN,
            };
            let mut asset = AssetRecord::new(row.text(Some(id)), row.text(equipment_type), current_hours);
            asset.brand = row.text(brand);
            asset.model = row.text(model);
            asset.purchase_year = row.year(purchase_year, as_of_year.saturating_add(1));
            asset.purchase_value = row.opt_f64(purchase_value).unwrap_or(0.0);
            asset.residual_value = row.opt_f64(residual_value).unwrap_or(0.0);
            asset.age_years = row.opt_f64(age).unwrap_or(0.0);
            asset.derive_age(as_of_year);
            Some(asset)
        }))
    })
}

// ============================================================================
// Maintenance
// ============================================================================

pub fn load_maintenance(path: impl AsRef<Path>) -> Result<Loaded<MaintenanceEvent>, IngestError> {
    let path = path.as_ref();
    read_maintenance(open(path)?, &path.display().to_string())
}

pub fn read_maintenance(reader: impl BufRead, input: &str) -> Result<Loaded<MaintenanceEvent>, IngestError> {
    read_table(reader, input, |cols| {
        let asset_id = cols.require(ASSET_ID, "asset id", input)?;
        let date = cols.find(DATE);
        let kind = cols.find(KIND);
        let parts = cols.find(PARTS_COST);
        let labor = cols.find(LABOR_COST);
        let total = cols.find(TOTAL_COST);
        let downtime = cols.find(DOWNTIME_HOURS);
        let description = cols.find(DESCRIPTION);

        Ok(Box::new(move |row: &mut Row<'_>| {
            let id = row.text(Some(asset_id));
            if id.is_empty() {
                return None;
            }
            let mut event = MaintenanceEvent::new(id, MaintenanceKind::from_label(&row.text(kind)));
            event.date = row.date(date);
            event.parts_cost = row.opt_f64(parts);
            event.labor_cost = row.opt_f64(labor);
            event.recorded_total = row.opt_f64(total);
            event.downtime_hours = row.opt_f64(downtime);
            event.description = row.text(description);
            Some(event)
        }))
    })
}

// ============================================================================
// Reference
// ============================================================================

pub fn load_reference(path: impl AsRef<Path>) -> Result<Loaded<ReferenceEntry>, IngestError> {
    let path = path.as_ref();
    read_reference(open(path)?, &path.display().to_string())
}

pub fn read_reference(reader: impl BufRead, input: &str) -> Result<Loaded<ReferenceEntry>, IngestError> {
    read_table(reader, input, |cols| {
        let equipment_type = cols.require(EQUIPMENT_TYPE, "equipment type", input)?;
        let life = cols.find(SERVICE_LIFE);
        let depreciation = cols.find(DEPRECIATION);
        let hourly = cols.find(HOURLY_COST);
        let downtime_day = cols.find(DOWNTIME_DAY_COST);

        Ok(Box::new(move |row: &mut Row<'_>| {
            let kind = row.text(Some(equipment_type));
            if kind.is_empty() {
                return None;
            }
            Some(ReferenceEntry {
                equipment_type: kind,
                expected_service_life_hours: row.opt_f64(life),
                annual_depreciation_rate: row.opt_f64(depreciation),
                hourly_operating_cost: row.opt_f64(hourly),
                downtime_cost_per_day: row.opt_f64(downtime_day),
            })
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_assets_spanish_headers() {
        let csv = "\
id_activo,tipo_equipo,marca,modelo,ano_compra,horometro_actual,valor_compra,valor_residual_estimado
EX-01,Excavadora,CAT,320D,2018,\"12,500\",$85.000.000,$32.000.000
EX-02,Excavadora,Komatsu,PC200,2024,,nan,
";
        let loaded = read_assets(csv.as_bytes(), "activos.csv", 2026).unwrap();
        assert_eq!(loaded.report.rows, 2);
        assert_eq!(loaded.report.loaded, 2);
        let ex1 = &loaded.records[0];
        assert_eq!(ex1.id, "EX-01");
        assert_eq!(ex1.brand, "CAT");
        assert_eq!(ex1.current_hours, 12_500.0);
        assert_eq!(ex1.purchase_value, 85_000_000.0);
        assert_eq!(ex1.residual_value, 32_000_000.0);
        assert_eq!(ex1.age_years, 8.0);
        let ex2 = &loaded.records[1];
        assert_eq!(ex2.current_hours, 0.0);
        assert_eq!(ex2.purchase_value, 0.0);
        assert_eq!(ex2.age_years, 2.0);
    }

    #[test]
    fn test_read_assets_english_headers_and_bad_hours() {
        let csv = "Asset ID,Equipment Type,Current Hours,Age Years\nL-1,Loader,lots,4\n";
        let loaded = read_assets(csv.as_bytes(), "assets.csv", 2026).unwrap();
        let asset = &loaded.records[0];
        assert!(asset.current_hours.is_nan());
        assert_eq!(asset.age_years, 4.0);
        assert_eq!(loaded.report.invalid_cells, 1);
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        let csv = "tipo_equipo,horometro_actual\nLoader,10\n";
        let err = read_assets(csv.as_bytes(), "bad.csv", 2026).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column: "asset id", .. }), "got {err}");
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = read_reference("".as_bytes(), "empty.csv").unwrap_err();
        assert!(matches!(err, IngestError::EmptyInput(_)));
    }

    #[test]
    fn test_read_maintenance() {
        let csv = "\
id_activo,fecha,tipo_mantenimiento,costo_repuestos,costo_mano_obra,horas_parada,descripcion
EX-01,14/03/2025,Correctivo,\"1.200.000\",300000,16,\"Cambio bomba, sellos\"
EX-01,2025-01-10,Preventivo,,,,Servicio 500h
,2025-01-10,Preventivo,1,1,0,orphan
";
        let loaded = read_maintenance(csv.as_bytes(), "mant.csv").unwrap();
        assert_eq!(loaded.report.rows, 3);
        assert_eq!(loaded.report.loaded, 2);
        assert_eq!(loaded.report.skipped, 1);
        let first = &loaded.records[0];
        assert_eq!(first.kind, MaintenanceKind::Corrective);
        assert_eq!(first.date, chrono::NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(first.total_cost(), 1_500_000.0);
        assert_eq!(first.downtime(), 16.0);
        assert_eq!(first.description, "Cambio bomba, sellos");
        assert_eq!(loaded.records[1].total_cost(), 0.0);
    }

    #[test]
    fn test_out_of_range_purchase_year_is_invalid() {
        let csv = "\
id_activo,tipo_equipo,ano_compra,horometro_actual,edad_anos
A-1,Cargador,-3000000000,10,4
A-2,Cargador,1850,10,
A-3,Cargador,2027,10,
A-4,Cargador,2031,10,
";
        let loaded = read_assets(csv.as_bytes(), "activos.csv", 2026).unwrap();
        assert_eq!(loaded.report.loaded, 4);
        assert_eq!(loaded.report.invalid_cells, 3);
        let a1 = &loaded.records[0];
        assert_eq!(a1.purchase_year, None);
        // Age column is used when the year is rejected
        assert_eq!(a1.age_years, 4.0);
        assert_eq!(loaded.records[1].purchase_year, None);
        // Next year's delivery is accepted and clamps to age 0
        assert_eq!(loaded.records[2].purchase_year, Some(2027));
        assert_eq!(loaded.records[2].age_years, 0.0);
        assert_eq!(loaded.records[3].purchase_year, None);
    }

    #[test]
    fn test_quoted_field_spanning_lines_splits_the_row() {
        let csv = "id_activo,fecha,descripcion\nEX-01,2025-01-10,\"Cambio\nde bomba\"\n";
        let loaded = read_maintenance(csv.as_bytes(), "mant.csv").unwrap();
        assert_eq!(loaded.report.rows, 2);
        assert_eq!(loaded.records[0].description, "Cambio");
        // The continuation line is read as a row of its own
        assert_eq!(loaded.records[1].asset_id, "de bomba");
    }

    #[test]
    fn test_read_reference_partial_columns() {
        let csv = "tipo_equipo,vida_util_esperada_horas,tasa_depreciacion_anual\nExcavadora,12000,\"0,12\"\nGrua,,\n";
        let loaded = read_reference(csv.as_bytes(), "ref.csv").unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].expected_service_life_hours, Some(12_000.0));
        assert_eq!(loaded.records[0].annual_depreciation_rate, Some(0.12));
        assert_eq!(loaded.records[1].expected_service_life_hours, None);
        assert_eq!(loaded.records[1].downtime_cost_per_day, None);
    }
}
