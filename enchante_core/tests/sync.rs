//! End-to-end tests for the synchronization engine against real entity
//! directories on disk.

use enchante_core::schemasync::{Schemasync, SyncOptions};
use enchante_core::EnchanteError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_entity(tables: &Path, entity: &str, model: &str, schema: &str) {
    let dir = tables.join(entity);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("model.py"), model).unwrap();
    fs::write(dir.join("schema.py"), schema).unwrap();
}

fn read_schema(tables: &Path, entity: &str) -> String {
    fs::read_to_string(tables.join(entity).join("schema.py")).unwrap()
}

fn run_sync(tables: &Path) -> enchante_core::SyncReport {
    Schemasync::new()
        .with_options(SyncOptions::new(tables))
        .run()
        .unwrap()
}

#[test]
fn sync_unwraps_mapped_annotations_into_schema() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "users",
        "from sqlalchemy.orm import Mapped, mapped_column\n\n\nclass User(Base):\n    __tablename__ = \"users\"\n\n    uid: Mapped[UUID] = mapped_column(primary_key=True)\n    name: Mapped[str] = mapped_column()\n",
        "from pydantic import BaseModel\n\n\nclass User(BaseModel):\n    uid: UUID\n",
    );

    let report = run_sync(tmp.path());
    assert_eq!(report.synced, vec!["users".to_string()]);
    assert!(!report.has_failures());

    let schema = read_schema(tmp.path(), "users");
    assert!(schema.contains("uid: UUID\n"));
    assert!(schema.contains("name: str\n"));
    // imports survive untouched
    assert!(schema.contains("from pydantic import BaseModel\n"));
}

#[test]
fn sync_appends_missing_fields_at_end_in_model_order() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "posts",
        "class Post(Base):\n    uid: Mapped[int]\n    title: Mapped[str]\n    tags: List[str]\n",
        "class Post(BaseModel):\n    uid: int\n",
    );

    run_sync(tmp.path());

    let schema = read_schema(tmp.path(), "posts");
    assert_eq!(
        schema,
        "class Post(BaseModel):\n    uid: int\n    title: str\n    tags: str\n"
    );
}

#[test]
fn sync_removes_fields_absent_from_model() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "users",
        "class User(Base):\n    name: Mapped[str]\n",
        "class User(BaseModel):\n    name: str\n    legacy_flag: bool\n",
    );

    run_sync(tmp.path());

    let schema = read_schema(tmp.path(), "users");
    assert!(schema.contains("name: str"));
    assert!(!schema.contains("legacy_flag"));
}

#[test]
fn sync_preserves_schema_defaults_on_update() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "scores",
        "class Score(Base):\n    value: Optional[int]\n",
        "class Score(BaseModel):\n    value: int = 0\n",
    );

    run_sync(tmp.path());

    let schema = read_schema(tmp.path(), "scores");
    assert!(schema.contains("value: int = 0"));
}

#[test]
fn sync_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "users",
        "class User(Base):\n    uid: Mapped[UUID]\n    name: Mapped[str]\n",
        "class User(BaseModel):\n    uid: UUID\n    stale: bool\n\n    class Config:\n        from_attributes = True\n",
    );

    run_sync(tmp.path());
    let first = read_schema(tmp.path(), "users");
    run_sync(tmp.path());
    let second = read_schema(tmp.path(), "users");
    assert_eq!(first, second);
    assert!(first.contains("class Config:"));
}

#[test]
fn sync_sees_fields_of_inline_schema_class_body() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        tmp.path(),
        "users",
        "class User(Base):\n    uid: Mapped[UUID]\n",
        "class User(BaseModel): uid: int\n",
    );

    run_sync(tmp.path());
    let first = read_schema(tmp.path(), "users");
    // the inline field is updated in place, never duplicated
    assert_eq!(first.matches("uid:").count(), 1);
    assert!(first.contains("uid: UUID"));

    run_sync(tmp.path());
    assert_eq!(read_schema(tmp.path(), "users"), first);
}

#[test]
fn sync_reports_entity_mismatch_and_continues() {
    let tmp = TempDir::new().unwrap();
    // Declaration should be called Widget; the model declares Gadget.
    write_entity(
        tmp.path(),
        "widgets",
        "class Gadget(Base):\n    uid: Mapped[int]\n",
        "class Widget(BaseModel):\n    uid: int\n",
    );
    write_entity(
        tmp.path(),
        "users",
        "class User(Base):\n    uid: Mapped[int]\n",
        "class User(BaseModel):\n    uid: int\n",
    );

    let report = run_sync(tmp.path());
    assert_eq!(report.synced, vec!["users".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, "widgets");
    assert!(matches!(
        report.failures[0].error,
        EnchanteError::EntityMismatch { .. }
    ));

    // the failed entity's schema file is untouched
    let schema = read_schema(tmp.path(), "widgets");
    assert_eq!(schema, "class Widget(BaseModel):\n    uid: int\n");
}

#[test]
fn sync_leaves_schema_unmodified_on_parse_error() {
    let tmp = TempDir::new().unwrap();
    let broken_schema = "class User(BaseModel):\n    name: str = \"unterminated\n";
    write_entity(
        tmp.path(),
        "users",
        "class User(Base):\n    name: Mapped[str]\n",
        broken_schema,
    );

    let report = run_sync(tmp.path());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        EnchanteError::ParseError { .. }
    ));
    assert_eq!(read_schema(tmp.path(), "users"), broken_schema);
}

#[test]
fn sync_reports_io_error_for_missing_schema_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("users");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("model.py"), "class User(Base):\n    uid: Mapped[int]\n").unwrap();

    let report = run_sync(tmp.path());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        EnchanteError::Io(_)
    ));
}
