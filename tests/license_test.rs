//! Tests for the license cascade on scripted detail pages

mod common;

use common::{FakeDom, FakeElement, FakeSession};
use kodegen_tools_listscrape::page_extractor::classify_license;
use kodegen_tools_listscrape::{ExtractionMiss, RenderPage, RenderSession};
use std::time::Duration;

const PERMIT_SPANS: &str = "div[data-testid='listing-permit-license-number'] span";
const URL: &str = "https://listings.test/rooms/1";

async fn classify(dom: FakeDom) -> Result<String, ExtractionMiss> {
    let session = FakeSession::builder().page(URL, dom).build();
    let page = session.new_page().await.unwrap();
    page.navigate(URL, Duration::from_secs(1)).await.unwrap();
    classify_license(&page).await
}

#[tokio::test]
async fn permit_number_text_yields_code() {
    let dom = FakeDom::new().with("div", FakeElement::text("Permit number: DXB-XYZ-1234"));
    assert_eq!(classify(dom).await.unwrap(), "DXB-XYZ-1234");
}

#[tokio::test]
async fn primary_code_wins_over_fallback_keyword_in_same_text() {
    let dom = FakeDom::new().with(
        "div",
        FakeElement::text("DTCM 556677 and permit ABC-DEF-1234"),
    );
    assert_eq!(classify(dom).await.unwrap(), "ABC-DEF-1234");
}

#[tokio::test]
async fn structured_block_wins_over_everything_else() {
    let dom = FakeDom::new()
        .with(PERMIT_SPANS, FakeElement::text("Permit number"))
        .with(PERMIT_SPANS, FakeElement::text("abc-def-0001"))
        .with("div", FakeElement::text("Permit number: DXB-XYZ-1234"))
        .body("License LIC-BOD-9999");

    assert_eq!(classify(dom).await.unwrap(), "ABC-DEF-0001");
}

#[tokio::test]
async fn structured_block_falls_back_to_label_text() {
    let dom = FakeDom::new()
        .with(PERMIT_SPANS, FakeElement::text("Registration"))
        .with(PERMIT_SPANS, FakeElement::text("  pending approval "))
        .body("DTCM 556677");

    assert_eq!(classify(dom).await.unwrap(), "PENDING APPROVAL");
}

#[tokio::test]
async fn single_segment_block_is_not_trusted() {
    let dom = FakeDom::new()
        .with(PERMIT_SPANS, FakeElement::text("AAA-BBB-1111"))
        .body("Registration No. 77-2020");

    assert_eq!(classify(dom).await.unwrap(), "77-2020");
}

#[tokio::test]
async fn empty_last_segment_moves_on() {
    let dom = FakeDom::new()
        .with(PERMIT_SPANS, FakeElement::text("Permit number"))
        .with(PERMIT_SPANS, FakeElement::text("   "))
        .body("Permit: BUR-STU-12345");

    assert_eq!(classify(dom).await.unwrap(), "BUR-STU-12345");
}

#[tokio::test]
async fn description_section_beats_body() {
    let dom = FakeDom::new()
        .with(
            "div[data-section-id='DESCRIPTION_DEFAULT']",
            FakeElement::text("Cozy flat. Licence 4455/B"),
        )
        .body("Cozy flat. Licence 4455/B. Footer: DTCM 000001");

    assert_eq!(classify(dom).await.unwrap(), "4455/B");
}

#[tokio::test]
async fn heuristic_scopes_apply_in_order() {
    // The "Registration" div is consulted before the "License" one
    let dom = FakeDom::new()
        .with("div", FakeElement::text("License: LIC-AAA-0001"))
        .with("div", FakeElement::text("Registration REG-BBB-0002"));

    assert_eq!(classify(dom).await.unwrap(), "REG-BBB-0002");
}

#[tokio::test]
async fn nothing_found_is_a_miss() {
    let dom = FakeDom::new().body("A lovely apartment with sea view");

    assert_eq!(
        classify(dom).await,
        Err(ExtractionMiss::NoPatternMatch {
            field: "licenseCode"
        })
    );
}
