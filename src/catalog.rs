//! Store listing: which issues exist, filtered to the magazine family this
//! tool tracks.

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::proto::{browser_device, BookStorePageRequest, BookStorePageResponse};
use crate::api::FuzClient;

/// One store entry. Doubles as the persisted update record, so the snapshot
/// file is exactly the catalog listing at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: u32,
    pub date: String,
    pub name: String,
}

/// Fetch the top-level store listing and keep entries whose magazine name
/// contains `filter`, in source order.
pub async fn list_issues(
    client: &FuzClient,
    filter: &str,
) -> Result<Vec<IssueSummary>, ApiError> {
    let request = BookStorePageRequest {
        device_info: Some(browser_device()),
    };
    let response: BookStorePageResponse = client.call("/v1/store_3", &request).await?;
    Ok(filter_listing(response, filter))
}

fn filter_listing(response: BookStorePageResponse, filter: &str) -> Vec<IssueSummary> {
    let shelves = response.info.map(|i| i.magazine_shelves).unwrap_or_default();
    let mut issues = Vec::new();
    // The magazine listing is the first shelf group on the store page.
    if let Some(shelf) = shelves.into_iter().next() {
        for detail in shelf.details {
            if !detail.magazine_name.contains(filter) {
                continue;
            }
            issues.push(IssueSummary {
                id: detail.id,
                date: short_date(&detail.update_date).to_string(),
                name: detail.magazine_name,
            });
        }
    }
    issues
}

/// The store reports update timestamps with a trailing seconds component the
/// site itself never displays; drop the last three characters to match.
fn short_date(s: &str) -> &str {
    match s.char_indices().rev().nth(2) {
        Some((idx, _)) => &s[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::proto::{MagazineShelf, StoreIssueDetail, StoreInfo};

    #[test]
    fn short_date_drops_three_trailing_chars() {
        assert_eq!(short_date("2024/09/12 00:00"), "2024/09/12 00");
        assert_eq!(short_date("abc"), "");
        assert_eq!(short_date("ab"), "");
        assert_eq!(short_date(""), "");
    }

    fn listing(details: Vec<StoreIssueDetail>) -> BookStorePageResponse {
        BookStorePageResponse {
            info: Some(StoreInfo {
                magazine_shelves: vec![MagazineShelf { details }],
            }),
        }
    }

    fn detail(id: u32, name: &str, date: &str) -> StoreIssueDetail {
        StoreIssueDetail {
            id,
            magazine_name: name.into(),
            update_date: date.into(),
        }
    }

    #[test]
    fn filters_by_magazine_name_substring() {
        let response = listing(vec![
            detail(4120, "まんがタイムきらら", "2024/09/12 00:00"),
            detail(9001, "別の雑誌", "2024/09/01 00:00"),
            detail(4121, "まんがタイムきららMAX", "2024/09/19 00:00"),
        ]);

        let issues = filter_listing(response, "まんがタイムきらら");
        assert_eq!(issues.len(), 2);
        // Source order preserved, no sorting imposed.
        assert_eq!(issues[0].id, 4120);
        assert_eq!(issues[1].id, 4121);
        assert_eq!(issues[0].date, "2024/09/12 00");
    }

    #[test]
    fn only_the_first_shelf_group_is_read() {
        let response = BookStorePageResponse {
            info: Some(StoreInfo {
                magazine_shelves: vec![
                    MagazineShelf {
                        details: vec![detail(1, "まんがタイムきらら", "2024/09/12 00:00")],
                    },
                    MagazineShelf {
                        details: vec![detail(2, "まんがタイムきらら", "2024/09/12 00:00")],
                    },
                ],
            }),
        };
        let issues = filter_listing(response, "きらら");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, 1);
    }

    #[test]
    fn empty_listing_yields_no_issues() {
        let response = BookStorePageResponse { info: None };
        assert!(filter_listing(response, "きらら").is_empty());
    }
}
