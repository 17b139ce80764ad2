//! Tests for draft restore and the debounced writer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use geolab_model::{FormKind, GradationReport, SandEquivalentReport};
use geolab_persistence::{
    DraftConfig, DraftKey, DraftStore, DraftWriter, FileStore, LocalStore, MemoryStore, Result,
    SharedStore,
};
use tempfile::tempdir;

/// Counts writes on top of a memory store.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl LocalStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

fn sample(code: &str) -> SandEquivalentReport {
    SandEquivalentReport {
        sample_code: code.to_string(),
        ..Default::default()
    }
}

#[test]
fn draft_round_trip_through_files() {
    let dir = tempdir().unwrap();
    let drafts = DraftStore::new(Arc::new(FileStore::new(dir.path())));
    let key = DraftKey::new(FormKind::SandEquivalent, Some(7));

    drafts.save(key, &sample("12-SU-26")).unwrap();
    let restored: SandEquivalentReport = drafts.load(key).unwrap();
    assert_eq!(restored, sample("12-SU-26"));

    drafts.delete(key).unwrap();
    assert!(drafts.load::<SandEquivalentReport>(key).is_none());
}

#[test]
fn drafts_are_partitioned_by_report_id() {
    let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
    let new_key = DraftKey::unsaved(FormKind::SandEquivalent);
    let existing = DraftKey::new(FormKind::SandEquivalent, Some(3));

    drafts.save(new_key, &sample("1-SU-26")).unwrap();
    assert!(drafts.load::<SandEquivalentReport>(existing).is_none());
}

#[test]
fn corrupt_draft_is_ignored() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let key = DraftKey::unsaved(FormKind::Gradation);
    store.set(&key.storage_key(), "{\"muestra\": ").unwrap();
    assert!(DraftStore::new(store).load::<GradationReport>(key).is_none());
}

#[test]
fn short_stored_arrays_are_padded_on_restore() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let key = DraftKey::unsaved(FormKind::SandEquivalent);
    store
        .set(&key.storage_key(), r#"{"lectura_arcilla_in": [4.1, 4.0]}"#)
        .unwrap();
    let restored: SandEquivalentReport = DraftStore::new(store).load(key).unwrap();
    assert_eq!(restored.clay_reading_in.as_slice(), &[Some(4.1), Some(4.0), None]);
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_produce_one_write_with_final_state() {
    let counting = Arc::new(CountingStore::default());
    let store: SharedStore = counting.clone();
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
    let key = DraftKey::unsaved(FormKind::SandEquivalent);

    for i in 0..5 {
        writer.schedule(key, format!("{{\"muestra\": \"{i}\"}}"));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(counting.writes.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(counting.writes.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.get(&key.storage_key()).unwrap().as_deref(),
        Some("{\"muestra\": \"4\"}")
    );
    assert!(!writer.has_pending(key));
}

#[tokio::test(start_paused = true)]
async fn cancelled_write_never_lands() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
    let key = DraftKey::unsaved(FormKind::Gradation);

    writer.schedule(key, "{}".to_string());
    assert!(writer.cancel(key));
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.get(&key.storage_key()).unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn pending_write_survives_writer_drop() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let key = DraftKey::new(FormKind::Gradation, Some(9));
    {
        let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
        writer.schedule(key, "{}".to_string());
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.get(&key.storage_key()).unwrap().as_deref(), Some("{}"));
}

#[tokio::test(start_paused = true)]
async fn flush_writes_immediately() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
    let key = DraftKey::unsaved(FormKind::SandEquivalent);

    writer.schedule(key, "{\"a\":1}".to_string());
    writer.flush(key);
    assert_eq!(
        store.get(&key.storage_key()).unwrap().as_deref(),
        Some("{\"a\":1}")
    );
    assert!(!writer.has_pending(key));
}

#[tokio::test(start_paused = true)]
async fn disabled_writer_does_nothing() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::disabled());
    writer.schedule(DraftKey::unsaved(FormKind::Gradation), "{}".to_string());
    assert_eq!(writer.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn pending_writes_are_kept_per_key() {
    let counting = Arc::new(CountingStore::default());
    let store: SharedStore = counting.clone();
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
    let sand = DraftKey::unsaved(FormKind::SandEquivalent);
    let gradation = DraftKey::unsaved(FormKind::Gradation);
    let edited = DraftKey::new(FormKind::SandEquivalent, Some(3));

    writer.schedule(sand, "{\"muestra\": \"1\"}".to_string());
    tokio::time::sleep(Duration::from_millis(200)).await;
    writer.clone().schedule(gradation, "{\"muestra\": \"2\"}".to_string());
    writer.schedule(edited, "{\"muestra\": \"3\"}".to_string());
    assert_eq!(writer.pending_count(), 3);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(counting.writes.load(Ordering::SeqCst), 3);
    assert_eq!(
        store.get(&sand.storage_key()).unwrap().as_deref(),
        Some("{\"muestra\": \"1\"}")
    );
    assert_eq!(
        store.get(&gradation.storage_key()).unwrap().as_deref(),
        Some("{\"muestra\": \"2\"}")
    );
    assert_eq!(
        store.get(&edited.storage_key()).unwrap().as_deref(),
        Some("{\"muestra\": \"3\"}")
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_and_discard_only_touch_their_key() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let writer = DraftWriter::new(DraftStore::new(store.clone()), DraftConfig::default());
    let sand = DraftKey::unsaved(FormKind::SandEquivalent);
    let gradation = DraftKey::unsaved(FormKind::Gradation);

    writer.schedule(sand, "{}".to_string());
    writer.schedule(gradation, "{}".to_string());
    assert!(writer.cancel(gradation));
    assert!(!writer.cancel(gradation));
    writer.discard(gradation).unwrap();
    assert!(writer.has_pending(sand));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.get(&sand.storage_key()).unwrap().as_deref(), Some("{}"));
    assert_eq!(store.get(&gradation.storage_key()).unwrap(), None);
}

/// Memory store whose writes block until released.
struct GatedStore {
    inner: MemoryStore,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl LocalStore for GatedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn discard_waits_for_a_write_in_progress() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let store: SharedStore = Arc::new(GatedStore {
        inner: MemoryStore::new(),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });
    let config = DraftConfig {
        enabled: true,
        debounce_ms: 0,
    };
    let writer = DraftWriter::new(DraftStore::new(store.clone()), config);
    let key = DraftKey::unsaved(FormKind::SandEquivalent);

    writer.schedule(key, "{}".to_string());
    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    let discarding = {
        let writer = writer.clone();
        std::thread::spawn(move || writer.discard(key))
    };
    std::thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();
    discarding.join().unwrap().unwrap();

    assert_eq!(store.get(&key.storage_key()).unwrap(), None);
    assert_eq!(writer.pending_count(), 0);
}
