//! DTOs exposed by the member search API endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::member::MemberTeam;
use crate::domain::search::{Page, PageRequest, SearchFilter, SortKey};
use crate::domain::types::TypeConstraintError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query parameters accepted by the `/api/v*/members` endpoints.
///
/// `sort` may be repeated, e.g. `sort=age,desc&sort=username,asc,nulls_last`.
#[derive(Debug, Default, Deserialize)]
pub struct MemberSearchParams {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    /// Zero-based page number.
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl MemberSearchParams {
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            username: self.username.clone(),
            team_name: self.team_name.clone(),
            age_goe: self.age_goe,
            age_loe: self.age_loe,
        }
    }

    pub fn page_request(&self) -> Result<PageRequest, TypeConstraintError> {
        let mut request = PageRequest::of(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        for sort in &self.sort {
            request = request.sort_by(sort.parse::<SortKey>()?);
        }
        Ok(request)
    }
}

/// JSON body returned by the paged endpoints.
#[derive(Debug, Serialize)]
pub struct MemberPageResponse {
    pub content: Vec<MemberTeam>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub number: usize,
    pub size: usize,
    pub has_next: bool,
}

impl From<Page<MemberTeam>> for MemberPageResponse {
    fn from(page: Page<MemberTeam>) -> Self {
        Self {
            total_elements: page.total_elements,
            total_pages: page.total_pages(),
            number: page.number(),
            size: page.limit,
            has_next: page.has_next(),
            content: page.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::SortField;

    #[test]
    fn parses_repeated_sort_parameters() {
        let params: MemberSearchParams = serde_html_form::from_str(
            "team_name=teamB&page=1&size=2&sort=age,desc&sort=username,asc,nulls_first",
        )
        .unwrap();

        assert_eq!(params.filter(), SearchFilter::new().team_name("teamB"));

        let request = params.page_request().unwrap();
        assert_eq!(request.offset, 2);
        assert_eq!(request.limit, 2);
        assert_eq!(
            request.sort,
            vec![
                SortKey::desc(SortField::Age),
                SortKey::asc(SortField::Username).nulls_first(),
            ]
        );
    }

    #[test]
    fn defaults_to_first_page() {
        let params: MemberSearchParams = serde_html_form::from_str("").unwrap();
        let request = params.page_request().unwrap();
        assert_eq!(request.offset, 0);
        assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
        assert!(request.sort.is_empty());
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let params: MemberSearchParams = serde_html_form::from_str("sort=height,asc").unwrap();
        assert!(params.page_request().is_err());
    }
}
