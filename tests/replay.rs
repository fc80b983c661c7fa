//! Action replay against a seeded store

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use chrono::Utc;
use tempfile::NamedTempFile;

use metadesk::{
    AppStore, DashboardStats, FieldValue, IdSource, Outcome, SchemaId, SchemaRegistry, Session,
    StoreError, Theme,
};

fn fixture(name: &str) -> BufReader<File> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    BufReader::new(File::open(path).unwrap())
}

fn seeded_store() -> AppStore {
    AppStore::with_registry(
        SchemaRegistry::seeded(Utc::now()).unwrap(),
        IdSource::sequential(),
    )
}

#[test]
fn test_replay_project_session() {
    let mut store = seeded_store();

    let outcomes = store.replay(fixture("project_session.jsonl")).unwrap();

    assert_eq!(outcomes.len(), 7);
    assert_eq!(outcomes[0], Outcome::SchemaCreated(SchemaId::from("g5")));
    assert_eq!(outcomes[6], Outcome::Applied);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.schemas.len(), 5);
    assert_eq!(snapshot.configured_schemas, vec![SchemaId::from("g1")]);
    assert_eq!(snapshot.selected_schema_id, Some(SchemaId::from("g1")));
    assert_eq!(snapshot.theme, Theme::Dark);
    assert!(!snapshot.project_data.contains_key(&SchemaId::from("g3")));

    let rows = &snapshot.project_data[&SchemaId::from("g1")];
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("category"), Some(&FieldValue::from("Home Goods")));
    assert_eq!(rows[0].get("price"), Some(&FieldValue::Number(24.5)));
    assert_eq!(rows[0].get("inStock"), Some(&FieldValue::Bool(true)));

    let stats = DashboardStats::collect(&store);
    assert_eq!(stats.total_data_entries, 1);
    assert_eq!(stats.configured_schemas, 1);
}

#[test]
fn test_replay_from_temp_file_stops_at_bad_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"action":"addSchemasToProject","ids":["g2"]}}"#).unwrap();
    writeln!(file, r#"{{"action":"addDataRow","schemaId":"g2","data":{{"fullName":"Ada"}}}}"#)
        .unwrap();
    writeln!(file, r#"{{"action":"addDataRow","schemaId":"g2","data":["Ada"]}}"#).unwrap();
    writeln!(file, r#"{{"action":"setTheme","theme":"light"}}"#).unwrap();

    let mut store = seeded_store();
    let reader = BufReader::new(File::open(file.path()).unwrap());
    let err = store.replay(reader).unwrap_err();

    assert!(matches!(err, StoreError::MalformedAction { line: 3, .. }));
    let rows = store.project().rows(&SchemaId::from("g2"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("fullName"), Some(&FieldValue::from("Ada")));
    assert_eq!(store.ui().theme(), Theme::System);
}

#[test]
fn test_session_and_dispatch_share_state() {
    let mut store = seeded_store();
    store
        .replay(r#"{"action":"addSchemasToProject","ids":["g4"]}"#.as_bytes())
        .unwrap();

    let g4 = SchemaId::from("g4");
    let form = {
        let schema = store.registry().get(&g4).unwrap();
        let mut form = metadesk::validate::new_row_form(schema);
        form.insert("contractId".into(), FieldValue::from("C-77"));
        form
    };
    let row = Session::new(&mut store).save_row(&g4, None, form).unwrap();

    let stored = &store.project().rows(&g4)[0];
    assert_eq!(stored.row_id, row);
    assert_eq!(stored.get("totalValue"), Some(&FieldValue::Number(0.0)));
    assert_eq!(stored.get("startDate"), Some(&FieldValue::from("")));
}

#[test]
fn test_replay_detach_of_unknown_schema_is_ignored() {
    let mut store = seeded_store();
    let script = concat!(
        r#"{"action":"addSchemasToProject","ids":["g1"]}"#,
        "\n",
        r#"{"action":"removeSchemaFromProject","id":"g2"}"#,
        "\n",
    );

    let outcomes = store.replay(script.as_bytes()).unwrap();

    assert_eq!(outcomes[1], Outcome::Ignored);
    assert_eq!(store.project().configured_schemas(), &[SchemaId::from("g1")]);
}
