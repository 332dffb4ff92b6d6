//! End-to-end harvest runs against a scripted surface

mod common;

use common::{
    FakeDom, FakeElement, FakeSession, FakeSessionBuilder, item_url, profile_url, search_page,
    test_config,
};
use kodegen_tools_listscrape::config::HarvestConfig;
use kodegen_tools_listscrape::content_saver::{CsvRecordStore, RecordStore};
use kodegen_tools_listscrape::{IdentityPolicy, NoOpProgress, harvest_with};
use tempfile::TempDir;

fn detail(title: &str) -> FakeDom {
    FakeDom::new()
        .with("h1", FakeElement::text(title))
        .with("a[href*='/users/show/']", FakeElement::link("/users/show/9", "Omar"))
        .body("License DXB-HOM-2024")
}

fn surface() -> FakeSessionBuilder {
    FakeSession::builder()
        .page(search_page(0, 0), FakeDom::search_results(&["A", "B"]))
        .page(search_page(20, 0), FakeDom::search_results(&["B", "C"]))
        .page(item_url("A"), detail("Alpha"))
        .page(item_url("B"), detail("Bravo"))
        .page(item_url("C"), detail("Charlie"))
        .page(
            profile_url("9"),
            FakeDom::new().body("4.95 out of 5").with(
                "span",
                FakeElement::text("Joined in 2018"),
            ),
        )
}

fn master_ids(config: &HarvestConfig) -> Vec<String> {
    CsvRecordStore::new(config.master_path())
        .load()
        .unwrap()
        .into_iter()
        .map(|r| r.identifier.to_string())
        .collect()
}

#[tokio::test]
async fn first_run_collects_everything_and_second_run_adds_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 10);
    let session = surface().build();

    let first = harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(first.discovered, 3);
    assert_eq!(first.extracted, 3);
    assert_eq!(first.appended, 3);
    assert_eq!(
        master_ids(&config),
        vec![item_url("A"), item_url("B"), item_url("C")]
    );

    let master_before = std::fs::read(config.master_path()).unwrap();

    let second = harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(second.discovered, 0);
    assert_eq!(second.appended, 0);
    assert_eq!(std::fs::read(config.master_path()).unwrap(), master_before);

    let run_rows = CsvRecordStore::new(config.run_path()).load().unwrap();
    assert!(run_rows.is_empty(), "second run file holds only the header");
}

#[tokio::test]
async fn records_carry_every_field() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 1);
    let session = surface().build();

    harvest_with(&session, &config, &NoOpProgress).await.unwrap();

    let rows = CsvRecordStore::new(config.run_path()).load().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.identifier.as_str(), item_url("A"));
    assert_eq!(row.title, "Alpha");
    assert_eq!(row.license_code, "DXB-HOM-2024");
    assert_eq!(row.host_name, "Omar");
    assert_eq!(row.host_profile_ref, profile_url("9"));
    assert_eq!(row.host_rating, "4.95");
    assert_eq!(row.host_joined_date, "Joined in 2018");
}

#[tokio::test]
async fn quota_spreads_over_runs() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 2);
    let session = surface().build();

    harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(master_ids(&config), vec![item_url("A"), item_url("B")]);

    harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(
        master_ids(&config),
        vec![item_url("A"), item_url("B"), item_url("C")]
    );
}

#[tokio::test]
async fn failed_item_is_not_retried_by_default() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 10);
    let session = surface().failing(item_url("B")).build();

    let summary = harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(summary.extracted, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(master_ids(&config), vec![item_url("A"), item_url("C")]);

    let retry = harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    assert_eq!(retry.discovered, 0, "B is remembered in the skip ledger");
    assert_eq!(
        std::fs::read_to_string(config.ledger_path()).unwrap(),
        format!("{}\n", item_url("B"))
    );
}

#[tokio::test]
async fn failed_item_is_retried_under_extraction_policy() {
    let dir = TempDir::new().unwrap();
    let config = HarvestConfig::builder()
        .output_dir(dir.path())
        .search_url(common::SEARCH_URL)
        .max_offset(40)
        .variants(vec![0, 1])
        .pacing_ms(0, 0)
        .scroll_pacing_ms(0, 0)
        .identity_policy(IdentityPolicy::MarkOnExtraction)
        .build()
        .unwrap();
    let session = surface().failing(item_url("B")).build();

    harvest_with(&session, &config, &NoOpProgress).await.unwrap();
    let retry = harvest_with(&session, &config, &NoOpProgress).await.unwrap();

    assert_eq!(retry.discovered, 1);
    assert!(!config.ledger_path().exists());
}

#[tokio::test]
async fn primary_page_is_closed_after_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 10);
    let session = surface().build();

    harvest_with(&session, &config, &NoOpProgress).await.unwrap();

    assert_eq!(session.pages_opened(), session.pages_closed());
}
