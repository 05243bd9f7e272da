//! Unit tests for page arithmetic and link building.

use super::*;
use rstest::rstest;

fn request(page: i64, per_page: u32) -> PageRequest {
    PageRequest::new(page, per_page).expect("valid page size")
}

#[rstest]
#[case(0)]
#[case(MAX_PER_PAGE + 1)]
fn rejects_out_of_bounds_page_sizes(#[case] per_page: u32) {
    let err = PageRequest::new(1, per_page).expect_err("size must be rejected");
    assert_eq!(
        err,
        PageRequestError::InvalidPageSize {
            per_page,
            max: MAX_PER_PAGE
        }
    );
}

#[rstest]
#[case(1, Some(0))]
#[case(2, Some(10))]
#[case(0, None)]
#[case(-4, None)]
fn offset_follows_one_indexed_pages(#[case] page: i64, #[case] expected: Option<u64>) {
    assert_eq!(request(page, 10).offset(), expected);
}

#[rstest]
#[case(1, 25, true)]
#[case(3, 25, true)]
#[case(4, 25, false)]
#[case(0, 25, false)]
#[case(1, 0, false)]
fn is_within_checks_against_page_count(
    #[case] page: i64,
    #[case] total: u64,
    #[case] expected: bool,
) {
    assert_eq!(request(page, 10).is_within(total), expected);
}

#[rstest]
fn navigation_on_middle_page() {
    let page = Page::new(vec![1, 2], request(2, 2), 5);
    assert_eq!(page.pages(), 3);
    assert!(page.has_prev());
    assert!(page.has_next());
    assert_eq!(page.prev_page(), Some(1));
    assert_eq!(page.next_page(), Some(3));
}

#[rstest]
fn navigation_on_last_page() {
    let page = Page::new(vec![5], request(3, 2), 5);
    assert!(!page.has_next());
    assert_eq!(page.next_page(), None);
}

#[rstest]
fn out_of_range_page_is_empty_but_keeps_total() {
    let page: Page<u8> = Page::empty(request(9, 10), 12);
    assert!(page.items().is_empty());
    assert_eq!(page.total(), 12);
    assert_eq!(page.pages(), 2);
    assert_eq!(page.prev_page(), Some(8));
    assert_eq!(page.next_page(), None);
}

#[rstest]
fn map_preserves_metadata() {
    let page = Page::new(vec![1, 2, 3], request(1, 3), 7).map(|value| value * 10);
    assert_eq!(page.items(), &[10, 20, 30]);
    assert_eq!(page.total(), 7);
    assert_eq!(page.per_page(), 3);
}

#[rstest]
fn envelope_links_keep_filters_and_replace_page() {
    let base = Url::parse("http://localhost/?keyword=crash&status=Open&page=2")
        .expect("valid url");
    let envelope = Page::new(vec!["a"], request(2, 1), 3).into_envelope(&base);

    assert_eq!(
        envelope.links.current,
        "/?keyword=crash&status=Open&page=2"
    );
    assert_eq!(
        envelope.links.prev.as_deref(),
        Some("/?keyword=crash&status=Open&page=1")
    );
    assert_eq!(
        envelope.links.next.as_deref(),
        Some("/?keyword=crash&status=Open&page=3")
    );
    assert_eq!(envelope.pages, 3);
    assert_eq!(envelope.items, vec!["a"]);
}

#[rstest]
fn envelope_serialises_camel_case_fields() {
    let base = Url::parse("http://localhost/").expect("valid url");
    let envelope = Page::new(vec![1_u8], request(1, 10), 1).into_envelope(&base);
    let value = serde_json::to_value(&envelope).expect("serialise envelope");

    assert_eq!(value["perPage"], 10);
    assert_eq!(value["hasNext"], false);
    assert_eq!(value["links"]["self"], "/?page=1");
    assert!(value["links"].get("next").is_none());
}
