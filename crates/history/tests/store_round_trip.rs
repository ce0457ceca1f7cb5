//! Integration tests for the history store: durability, ordering, and
//! resilience to a damaged store file.

use neoai_core::inputs::GenerationInputs;
use neoai_core::job::{Job, JobStatus};
use neoai_core::result::GenerationResult;
use neoai_core::tool::ToolId;
use neoai_history::{HistoryEntry, HistoryStore, RecordedStatus};

fn completed_entry(url: &str) -> HistoryEntry {
    let mut job = Job::new(ToolId::BriefToImages, None, GenerationInputs::empty());
    job.advance(JobStatus::Submitting).unwrap();
    job.complete(GenerationResult::Image { url: url.into() })
        .unwrap();
    HistoryEntry::from_job(&job, None).unwrap()
}

fn failed_entry(message: &str) -> HistoryEntry {
    let mut job = Job::new(ToolId::TextToSpeech, None, GenerationInputs::empty());
    job.advance(JobStatus::Submitting).unwrap();
    job.fail("provider-reported-failure", message.into()).unwrap();
    HistoryEntry::from_job(&job, None).unwrap()
}

#[tokio::test]
async fn appended_entries_survive_reopen_most_recent_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generation_history.json");

    {
        let store = HistoryStore::open(&path).await.unwrap();
        store.append(completed_entry("https://x/1.png")).await.unwrap();
        store.append(completed_entry("https://x/2.png")).await.unwrap();
        store.append(failed_entry("nsfw content detected")).await.unwrap();
    }

    let reopened = HistoryStore::open(&path).await.unwrap();
    let entries = reopened.entries().await;
    assert_eq!(entries.len(), 3);

    // Most recent first: the failure was appended last.
    assert_eq!(entries[0].status, RecordedStatus::Failed);
    assert!(matches!(
        &entries[0].result,
        GenerationResult::Error { message, .. } if message == "nsfw content detected"
    ));
    assert_eq!(
        entries[1].result.media_url(),
        Some("https://x/2.png")
    );
    assert_eq!(
        entries[2].result.media_url(),
        Some("https://x/1.png")
    );
}

#[tokio::test]
async fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open(dir.path().join("nope.json")).await.unwrap();
    assert!(store.entries().await.is_empty());
}

#[tokio::test]
async fn damaged_file_opens_empty_and_recovers_on_append() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generation_history.json");
    tokio::fs::write(&path, b"{not json").await.unwrap();

    let store = HistoryStore::open(&path).await.unwrap();
    assert!(store.entries().await.is_empty());

    store.append(completed_entry("https://x/1.png")).await.unwrap();

    let reopened = HistoryStore::open(&path).await.unwrap();
    assert_eq!(reopened.entries().await.len(), 1);
}

#[tokio::test]
async fn on_disk_format_is_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generation_history.json");

    let store = HistoryStore::open(&path).await.unwrap();
    let entry = completed_entry("https://x/1.png");
    let id = entry.id;
    store.append(entry).await.unwrap();

    let raw = tokio::fs::read(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let array = value.as_array().expect("store file should hold an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["id"], serde_json::json!(id));
    assert_eq!(array[0]["tool_id"], "brief-to-images");

    assert!(store.find(id).await.is_some());
}
