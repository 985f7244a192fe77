//! CSV Ingest Integration Tests
//!
//! Writes CSV exports to temporary files and loads them through the public
//! ingest API: header aliases, BOM and CRLF handling, lenient cells and the
//! error cases that fail a load.

use std::io::Write;

use fleet_health::config::EngineConfig;
use fleet_health::fleet::FleetEvaluator;
use fleet_health::ingest::{self, IngestError};
use fleet_health::MaintenanceKind;
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn english_export_with_bom_and_crlf() {
    let file = write_csv(
        "\u{feff}Asset ID,Equipment Type,Brand,Purchase Year,Current Hours,Purchase Value,Residual Value\r\n\
         L-01,Loader,Volvo,2020,\"8,250\",\"$70,000\",\"$21,500.50\"\r\n\
         \r\n\
         L-02,Loader,CAT,2027,0,,\r\n",
    );

    let loaded = ingest::load_assets(file.path(), 2026).unwrap();
    assert_eq!(loaded.report.rows, 2);
    assert_eq!(loaded.report.loaded, 2);
    assert_eq!(loaded.report.invalid_cells, 0);

    let l01 = &loaded.records[0];
    assert_eq!(l01.id, "L-01");
    assert_eq!(l01.current_hours, 8_250.0);
    assert_eq!(l01.purchase_value, 70_000.0);
    assert_eq!(l01.residual_value, 21_500.5);
    assert_eq!(l01.age_years, 6.0);

    // Purchase year after the as-of year clamps to 0
    assert_eq!(loaded.records[1].age_years, 0.0);
}

#[test]
fn maintenance_log_kinds_and_totals() {
    let file = write_csv(
        "id_activo,fecha,tipo_mantenimiento,costo_repuestos,costo_mano_obra,costo_total,horas_parada,descripcion\n\
         EX-01,2026-01-15,Preventivo,100000,50000,,2,Servicio 250 h\n\
         EX-01,15/02/2026,CORRECTIVO,,,\"$1.250.000\",30,\"Cilindro, sellos\"\n\
         ,2026-03-01,Correctivo,1,1,,,sin equipo\n\
         EX-02,fecha mala,Inspeccion,10,10,,,\n",
    );

    let loaded = ingest::load_maintenance(file.path()).unwrap();
    assert_eq!(loaded.report.rows, 4);
    assert_eq!(loaded.report.loaded, 3);
    assert_eq!(loaded.report.skipped, 1, "blank asset id is skipped");
    assert_eq!(loaded.report.invalid_cells, 1, "unparseable date is counted");

    let events = &loaded.records;
    assert_eq!(events[0].kind, MaintenanceKind::Preventive);
    assert_eq!(events[0].total_cost(), 150_000.0);
    assert_eq!(events[1].kind, MaintenanceKind::Corrective);
    assert_eq!(events[1].total_cost(), 1_250_000.0);
    assert_eq!(events[1].description, "Cilindro, sellos");
    assert_eq!(events[2].kind, MaintenanceKind::Other("Inspeccion".to_string()));
    assert!(events[2].date.is_none());
}

#[test]
fn reference_table_partial_rows() {
    let file = write_csv(
        "tipo_equipo,vida_util_esperada_horas,tasa_depreciacion_anual,costo_dia_parada\n\
         Excavadora,15000,0.12,1200000\n\
         Grua,,0.20,\n\
         ,9000,0.1,\n",
    );

    let loaded = ingest::load_reference(file.path()).unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.report.skipped, 1);

    let grua = &loaded.records[1];
    assert_eq!(grua.equipment_type, "Grua");
    assert!(grua.expected_service_life_hours.is_none());
    assert_eq!(grua.annual_depreciation_rate, Some(0.2));
    assert!(grua.hourly_operating_cost.is_none());
}

#[test]
fn loaded_tables_feed_the_fleet_pass() {
    let assets = write_csv(
        "id_activo,tipo_equipo,horometro_actual,edad_anos\n\
         G-1,Grua,6000,3\n\
         G-1,Grua,100,1\n\
         G-2,Grua,-5,1\n",
    );
    let reference = write_csv("tipo_equipo,vida_util_esperada_horas\nGrua,,\n");

    let assets = ingest::load_assets(assets.path(), 2026).unwrap().records;
    let reference = ingest::load_reference(reference.path()).unwrap().records;
    let config = EngineConfig::default();
    let evaluation = FleetEvaluator::new(&config).evaluate_fleet(&assets, &[], &reference);

    assert_eq!(evaluation.assets.len(), 1);
    assert_eq!(evaluation.rejected.len(), 2, "duplicate id and negative meter reading");
    let g1 = &evaluation.assets[0];
    assert_eq!(g1.asset.current_hours, 6_000.0, "first occurrence wins");
    // Blank service life in a matched row falls back to the default
    assert!(g1.reference_matched);
    assert_eq!(g1.rul_hours, 9_000.0);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest::load_assets(dir.path().join("nope.csv"), 2026).unwrap_err();
    assert!(matches!(err, IngestError::Io(..)), "got {err}");
}

#[test]
fn empty_file_is_rejected() {
    let file = write_csv("");
    let err = ingest::load_maintenance(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput(_)), "got {err}");
}

#[test]
fn missing_key_column_names_the_aliases() {
    let file = write_csv("vida_util_esperada_horas\n15000\n");
    let err = ingest::load_reference(file.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("equipment type"), "{message}");
    assert!(message.contains("tipo_equipo"), "{message}");
}
