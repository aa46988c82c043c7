//! Integration tests for `CsvStore` against a temporary directory.

use roster_core::{
  Error as CoreError,
  campaign::DEFAULT_CAMPAIGN,
  dataset,
  record::{NewRecord, Record, Status},
  store::{CampaignStore, StoreError},
};
use tempfile::TempDir;
use tokio::time::{Duration, sleep};

use crate::{CsvStore, Error, REGISTRY_FILE};

async fn store() -> (TempDir, CsvStore) {
  let dir = TempDir::new().expect("temp dir");
  let store = CsvStore::open(dir.path()).await.expect("open store");
  (dir, store)
}

/// A store with `Ventas` registered alongside the default campaign.
async fn store_with_ventas() -> (TempDir, CsvStore) {
  let (dir, store) = store().await;
  store.add_campaign("Ventas").await.expect("add campaign");
  (dir, store)
}

fn temp_files(dir: &TempDir) -> Vec<String> {
  std::fs::read_dir(dir.path())
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .filter(|n| n.ends_with(".tmp"))
    .collect()
}

fn new_record(name: &str, id: &str, phone: &str) -> NewRecord {
  NewRecord {
    name:        name.into(),
    national_id: id.into(),
    phone:       phone.into(),
    phone2:      String::new(),
  }
}

fn validation(err: &Error) -> Option<&CoreError> { err.validation() }

// ─── Registry ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_registry_is_seeded_and_persisted() {
  let (dir, s) = store().await;

  let names = s.list_campaigns().await.unwrap();
  assert_eq!(names, [DEFAULT_CAMPAIGN]);

  let text = std::fs::read_to_string(dir.path().join(REGISTRY_FILE)).unwrap();
  assert_eq!(text, format!("{DEFAULT_CAMPAIGN}\n"));
}

#[tokio::test]
async fn custom_default_campaign() {
  let dir = TempDir::new().unwrap();
  let s = CsvStore::open(dir.path())
    .await
    .unwrap()
    .with_default_campaign("Inicio");
  assert_eq!(s.list_campaigns().await.unwrap(), ["Inicio"]);
}

#[tokio::test]
async fn add_campaign_registers_once_and_creates_empty_file() {
  let (_dir, s) = store().await;

  let stored = s.add_campaign("  Ventas Norte ").await.unwrap();
  assert_eq!(stored, "Ventas Norte");

  let names = s.list_campaigns().await.unwrap();
  assert_eq!(names.iter().filter(|n| *n == "Ventas Norte").count(), 1);
  assert_eq!(names, [DEFAULT_CAMPAIGN, "Ventas Norte"]);

  let path = s.campaign_path("Ventas Norte");
  assert!(path.ends_with("Ventas_Norte.csv"));
  let text = std::fs::read_to_string(&path).unwrap();
  assert_eq!(text.lines().count(), 1, "header only: {text}");
  assert!(s.load("Ventas Norte").await.unwrap().records.is_empty());
}

#[tokio::test]
async fn add_duplicate_campaign_fails() {
  let (_dir, s) = store().await;
  s.add_campaign("Ventas").await.unwrap();

  let err = s.add_campaign("Ventas").await.unwrap_err();
  assert_eq!(
    validation(&err),
    Some(&CoreError::DuplicateCampaign("Ventas".into()))
  );
  assert_eq!(s.list_campaigns().await.unwrap().len(), 2);
}

#[tokio::test]
async fn add_blank_campaign_fails() {
  let (_dir, s) = store().await;
  let err = s.add_campaign("   ").await.unwrap_err();
  assert!(matches!(validation(&err), Some(CoreError::InvalidName(_))));
}

#[tokio::test]
async fn remove_last_campaign_fails_and_leaves_registry() {
  let dir = TempDir::new().unwrap();
  let s = CsvStore::open(dir.path())
    .await
    .unwrap()
    .with_default_campaign("OnlyCampaign");
  s.list_campaigns().await.unwrap();

  let err = s.remove_campaign("OnlyCampaign").await.unwrap_err();
  assert_eq!(
    validation(&err),
    Some(&CoreError::LastCampaign("OnlyCampaign".into()))
  );
  assert_eq!(s.list_campaigns().await.unwrap(), ["OnlyCampaign"]);
}

#[tokio::test]
async fn remove_campaign_deletes_its_file() {
  let (_dir, s) = store().await;
  s.add_campaign("Ventas").await.unwrap();
  let path = s.campaign_path("Ventas");
  assert!(path.exists());

  s.remove_campaign("Ventas").await.unwrap();
  assert!(!path.exists());
  assert_eq!(s.list_campaigns().await.unwrap(), [DEFAULT_CAMPAIGN]);
}

#[tokio::test]
async fn remove_campaign_without_file_succeeds() {
  let (_dir, s) = store().await;
  s.add_campaign("Ventas").await.unwrap();
  std::fs::remove_file(s.campaign_path("Ventas")).unwrap();

  s.remove_campaign("Ventas").await.unwrap();
  assert_eq!(s.list_campaigns().await.unwrap(), [DEFAULT_CAMPAIGN]);
}

#[tokio::test]
async fn remove_unknown_campaign_fails() {
  let (_dir, s) = store().await;
  let err = s.remove_campaign("Nada").await.unwrap_err();
  assert_eq!(
    validation(&err),
    Some(&CoreError::UnknownCampaign("Nada".into()))
  );
}

// ─── Datasets ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_missing_dataset_creates_header_only_file() {
  let (_dir, s) = store().await;
  let path = s.campaign_path(DEFAULT_CAMPAIGN);
  assert!(!path.exists());

  let snapshot = s.load(DEFAULT_CAMPAIGN).await.unwrap();
  assert!(snapshot.records.is_empty());
  let text = std::fs::read_to_string(&path).unwrap();
  assert!(text.starts_with("Nombre,Cedula,Telefono,Telefono2,Estatus,Comentario,FechaActualizacion"));
}

#[tokio::test]
async fn save_then_load_round_trips() {
  let (_dir, s) = store().await;
  let records = vec![
    Record {
      name:         "Peña, Ana \"la jefa\"".into(),
      national_id:  "V-1".into(),
      phone:        "555".into(),
      phone2:       String::new(),
      status:       Status::NoMessagingApp,
      comment:      "línea uno\nlínea dos".into(),
      last_updated: "2024-03-01 10:00:00".into(),
    },
    Record {
      name:         "Luis".into(),
      national_id:  "V-2".into(),
      phone:        "777".into(),
      phone2:       "0414".into(),
      status:       Status::from("Estado viejo"),
      comment:      String::new(),
      last_updated: String::new(),
    },
  ];

  let version = s.save("Ventas", records.clone()).await.unwrap();
  let snapshot = s.load("Ventas").await.unwrap();
  assert_eq!(snapshot.records, records);
  assert_eq!(snapshot.version, version);
}

#[tokio::test]
async fn load_backfills_in_memory_only() {
  let (_dir, s) = store().await;
  let path = s.campaign_path("Vieja");
  let original = "Nombre,Cedula,Telefono\nAna,1,555\n";
  std::fs::write(&path, original).unwrap();

  let snapshot = s.load("Vieja").await.unwrap();
  let r = &snapshot.records[0];
  assert_eq!(r.phone2, "");
  assert_eq!(r.comment, "");
  assert!(!r.last_updated.is_empty());

  assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[tokio::test]
async fn version_of_backfilled_file_is_stable_across_loads() {
  let (_dir, s) = store().await;
  s.add_campaign("Vieja").await.unwrap();
  std::fs::write(s.campaign_path("Vieja"), "Nombre,Cedula,Telefono\nAna,1,555\n").unwrap();

  let seen = s.load("Vieja").await.unwrap().version;
  // Long enough for a backfilled timestamp to tick over.
  sleep(Duration::from_millis(1100)).await;
  assert_eq!(s.load("Vieja").await.unwrap().version, seen);

  let modified = s
    .modify("Vieja", Some(&seen), |records| {
      Ok((dataset::update(records, "1", Status::Called, "")?, ()))
    })
    .await
    .unwrap();
  assert_ne!(modified.version, seen);
  let after = s.load("Vieja").await.unwrap();
  assert_eq!(after.version, modified.version);
  assert_eq!(after.records[0].status, Status::Called);
}

#[tokio::test]
async fn storage_failures_are_reported_not_fatal() {
  let (dir, s) = store().await;
  // A directory where the dataset file should be makes reads fail.
  std::fs::create_dir(s.campaign_path("Rota")).unwrap();

  let err = s.load("Rota").await.unwrap_err();
  assert!(matches!(err, Error::StorageRead { .. }), "{err}");
  assert!(validation(&err).is_none());

  let err = s.save("Rota", Vec::new()).await.unwrap_err();
  assert!(matches!(err, Error::StorageWrite { .. }), "{err}");
  assert!(temp_files(&dir).is_empty(), "left behind: {:?}", temp_files(&dir));
}

// ─── Modify ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn modify_inserts_and_returns_new_version() {
  let (_dir, s) = store_with_ventas().await;
  let before = s.load("Ventas").await.unwrap();

  let modified = s
    .modify("Ventas", None, |records| {
      Ok((dataset::insert(records, new_record("Ana", "1", "555"))?, ()))
    })
    .await
    .unwrap();

  let after = s.load("Ventas").await.unwrap();
  assert_eq!(after.records.len(), 1);
  assert_eq!(after.version, modified.version);
  assert_ne!(after.version, before.version);
}

#[tokio::test]
async fn rejected_modification_leaves_file_untouched() {
  let (_dir, s) = store_with_ventas().await;
  s.modify("Ventas", None, |records| {
    Ok((dataset::insert(records, new_record("Ana", "1", "555"))?, ()))
  })
  .await
  .unwrap();
  let path = s.campaign_path("Ventas");
  let bytes_before = std::fs::read(&path).unwrap();

  let err = s
    .modify("Ventas", None, |records| {
      Ok((dataset::insert(records, new_record("Otra", "1", "999"))?, ()))
    })
    .await
    .unwrap_err();
  assert_eq!(validation(&err), Some(&CoreError::DuplicateKey("1".into())));
  assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
}

#[tokio::test]
async fn modify_with_stale_version_conflicts() {
  let (_dir, s) = store_with_ventas().await;
  let stale = s.load("Ventas").await.unwrap().version;
  s.modify("Ventas", None, |records| {
    Ok((dataset::insert(records, new_record("Ana", "1", "555"))?, ()))
  })
  .await
  .unwrap();

  let err = s
    .modify("Ventas", Some(&stale), |records| {
      Ok((dataset::delete(records, "1")?, ()))
    })
    .await
    .unwrap_err();
  assert!(matches!(
    validation(&err),
    Some(CoreError::VersionConflict { .. })
  ));

  let current = s.load("Ventas").await.unwrap().version;
  let quoted = format!("\"{current}\"");
  s.modify("Ventas", Some(&quoted), |records| {
    Ok((dataset::delete(records, "1")?, ()))
  })
  .await
  .unwrap();
  assert!(s.load("Ventas").await.unwrap().records.is_empty());
}

#[tokio::test]
async fn concurrent_modifications_are_not_lost() {
  let (_dir, s) = store_with_ventas().await;

  let mut handles = Vec::new();
  for i in 0..16 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.modify("Ventas", None, move |records| {
        let id = i.to_string();
        Ok((dataset::insert(records, new_record("X", &id, "1"))?, ()))
      })
      .await
      .map(|_| ())
    }));
  }
  for h in handles {
    h.await.unwrap().unwrap();
  }

  assert_eq!(s.load("Ventas").await.unwrap().records.len(), 16);
}

#[tokio::test]
async fn modify_of_unregistered_campaign_fails_without_creating_a_file() {
  let (_dir, s) = store_with_ventas().await;
  s.remove_campaign("Ventas").await.unwrap();

  let err = s
    .modify("Ventas", None, |records| {
      Ok((dataset::insert(records, new_record("Ana", "1", "555"))?, ()))
    })
    .await
    .unwrap_err();
  assert_eq!(
    validation(&err),
    Some(&CoreError::UnknownCampaign("Ventas".into()))
  );
  assert!(!s.campaign_path("Ventas").exists());
}
