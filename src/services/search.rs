//! Member search: unpaged listing and two paging strategies.

use crate::domain::member::MemberTeam;
use crate::domain::predicate::compile;
use crate::domain::search::{Page, PageRequest, SearchFilter, Window};
use crate::repository::MemberTeamReader;
use crate::services::{ServiceError, ServiceResult};

/// How the total of a paged search is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMode {
    /// Content and total are loaded by one combined store call.
    Simple,
    /// Content first; the count query runs only when the content cannot
    /// determine the total.
    Optimized,
}

/// Returns every member matching `filter`, ordered by member id.
pub fn search_members<R>(repo: &R, filter: &SearchFilter) -> ServiceResult<Vec<MemberTeam>>
where
    R: MemberTeamReader + ?Sized,
{
    let expr = compile(filter);
    Ok(repo.fetch_member_teams(&expr, &[], None)?)
}

/// Returns one page of members matching `filter` along with the total count.
pub fn search_members_page<R>(
    repo: &R,
    filter: &SearchFilter,
    page: &PageRequest,
    mode: PageMode,
) -> ServiceResult<Page<MemberTeam>>
where
    R: MemberTeamReader + ?Sized,
{
    let window = page.window().ok_or_else(|| {
        ServiceError::InvalidPageRequest(format!(
            "offset must be >= 0 and limit > 0, got offset {} and limit {}",
            page.offset, page.limit
        ))
    })?;

    let expr = compile(filter);

    let (total, content) = match mode {
        PageMode::Simple => repo.fetch_member_teams_with_count(&expr, &page.sort, window)?,
        PageMode::Optimized => {
            let content = repo.fetch_member_teams(&expr, &page.sort, Some(window))?;
            let total = resolve_total(window, content.len(), || {
                repo.count_member_teams(&expr).map_err(ServiceError::from)
            })?;
            (total, content)
        }
    };

    Ok(Page::new(content, window, total))
}

/// Derives the total from the fetched content when possible, otherwise calls
/// `count`.
///
/// A short page proves it is the last one, so the total is
/// `offset + content_len`. At a non-zero offset an empty page proves nothing:
/// the offset may lie past the end of the result set.
pub fn resolve_total<F>(window: Window, content_len: usize, count: F) -> ServiceResult<usize>
where
    F: FnOnce() -> ServiceResult<usize>,
{
    let short_page = content_len < window.limit;
    if short_page && (window.offset == 0 || content_len > 0) {
        log::debug!(
            "Count query elided: offset {}, {content_len} of {} rows",
            window.offset,
            window.limit
        );
        return Ok(window.offset + content_len);
    }
    count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::predicate::Condition;
    use crate::domain::search::{SortField, SortKey};
    use crate::domain::types::{MemberId, TeamId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn member_team(id: i32, age: i32, team: Option<(i32, &str)>) -> MemberTeam {
        MemberTeam {
            member_id: MemberId::new(id).expect("valid member id"),
            username: Some(format!("member{id}")),
            age,
            team_id: team.map(|(team_id, _)| TeamId::new(team_id).expect("valid team id")),
            team_name: team.map(|(_, name)| name.to_string()),
        }
    }

    fn rows(ids: std::ops::RangeInclusive<i32>) -> Vec<MemberTeam> {
        ids.map(|id| member_team(id, id * 10, Some((1, "teamA"))))
            .collect()
    }

    fn window(offset: usize, limit: usize) -> Window {
        Window { offset, limit }
    }

    #[test]
    fn search_passes_compiled_filter_without_window() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .withf(|filter, sort, window| {
                filter.conditions()
                    == [Condition::AgeGoe(10), Condition::AgeLoe(30)].as_slice()
                    && sort.is_empty()
                    && window.is_none()
            })
            .returning(|_, _, _| Ok(rows(1..=3)));
        repo.expect_count_member_teams().times(0);

        let filter = SearchFilter::new().age_goe(10).age_loe(30);
        let result = search_members(&repo, &filter).unwrap();

        assert_eq!(result.len(), 3);
    }

    #[test]
    fn blank_username_does_not_restrict_search() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .withf(|filter, _, _| filter.is_unrestricted())
            .returning(|_, _, _| Ok(rows(1..=4)));

        let result = search_members(&repo, &SearchFilter::new().username("  ")).unwrap();

        assert_eq!(result.len(), 4);
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams().times(0);
        repo.expect_fetch_member_teams_with_count().times(0);

        for mode in [PageMode::Simple, PageMode::Optimized] {
            let result =
                search_members_page(&repo, &SearchFilter::new(), &PageRequest::new(0, 0), mode);
            assert!(matches!(result, Err(ServiceError::InvalidPageRequest(_))));
        }
    }

    #[test]
    fn negative_offset_is_rejected() {
        let repo = MockRepository::new();

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(-1, 10),
            PageMode::Optimized,
        );

        assert!(matches!(result, Err(ServiceError::InvalidPageRequest(_))));
    }

    #[test]
    fn simple_mode_uses_combined_call() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams_with_count()
            .times(1)
            .withf(|_, sort, window| {
                sort == [SortKey::desc(SortField::Username)].as_slice()
                    && *window
                        == Window {
                            offset: 0,
                            limit: 2,
                        }
            })
            .returning(|_, _, _| Ok((4, rows(3..=4))));
        repo.expect_fetch_member_teams().times(0);
        repo.expect_count_member_teams().times(0);

        let page = PageRequest::new(0, 2).sort_by(SortKey::desc(SortField::Username));
        let result =
            search_members_page(&repo, &SearchFilter::new(), &page, PageMode::Simple).unwrap();

        assert_eq!(result.content.len(), 2);
        assert_eq!(result.total_elements, 4);
        assert_eq!(result.total_pages(), 2);
        assert!(result.has_next());
    }

    #[test]
    fn optimized_mode_skips_count_for_short_first_page() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(rows(1..=3)));
        repo.expect_count_member_teams().times(0);

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(0, 10),
            PageMode::Optimized,
        )
        .unwrap();

        assert_eq!(result.total_elements, 3);
        assert!(!result.has_next());
    }

    #[test]
    fn optimized_mode_counts_when_page_is_full() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(rows(1..=2)));
        repo.expect_count_member_teams()
            .times(1)
            .returning(|_| Ok(4));

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(0, 2),
            PageMode::Optimized,
        )
        .unwrap();

        assert_eq!(result.total_elements, 4);
        assert!(result.has_next());
    }

    #[test]
    fn optimized_mode_counts_when_offset_is_past_the_end() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        repo.expect_count_member_teams()
            .times(1)
            .returning(|_| Ok(4));

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(10, 2),
            PageMode::Optimized,
        )
        .unwrap();

        assert!(result.content.is_empty());
        assert_eq!(result.total_elements, 4);
    }

    #[test]
    fn count_failure_aborts_the_page() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(rows(1..=2)));
        repo.expect_count_member_teams()
            .times(1)
            .returning(|_| Err(RepositoryError::ConnectionError("pool timed out".into())));

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(0, 2),
            PageMode::Optimized,
        );

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
    }

    #[test]
    fn content_failure_is_store_unavailable() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams_with_count()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::DatabaseError("disk I/O error".into())));

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(0, 2),
            PageMode::Simple,
        );

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
    }

    #[test]
    fn optimized_content_failure_skips_count() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::DatabaseError("no such table".into())));
        repo.expect_count_member_teams().times(0);
        repo.expect_fetch_member_teams_with_count().times(0);

        let result = search_members_page(
            &repo,
            &SearchFilter::new(),
            &PageRequest::new(0, 2),
            PageMode::Optimized,
        );

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        repo.expect_count_member_teams().times(0);

        let result = search_members_page(
            &repo,
            &SearchFilter::new().age_goe(40).age_loe(10),
            &PageRequest::new(0, 5),
            PageMode::Optimized,
        )
        .unwrap();

        assert!(result.content.is_empty());
        assert_eq!(result.total_elements, 0);
        assert_eq!(result.total_pages(), 0);
    }

    #[test]
    fn team_less_rows_pass_through_unchanged() {
        let mut repo = MockRepository::new();
        repo.expect_fetch_member_teams()
            .times(1)
            .returning(|_, _, _| Ok(vec![member_team(7, 100, None)]));

        let result = search_members(&repo, &SearchFilter::new()).unwrap();

        assert_eq!(result[0].team_id, None);
        assert_eq!(result[0].team_name, None);
    }

    #[test]
    fn resolve_total_elision_rules() {
        let never = || -> ServiceResult<usize> { panic!("count must be elided") };

        assert_eq!(resolve_total(window(0, 5), 3, never).unwrap(), 3);
        assert_eq!(resolve_total(window(0, 5), 0, never).unwrap(), 0);
        assert_eq!(resolve_total(window(10, 5), 2, never).unwrap(), 12);

        assert_eq!(resolve_total(window(0, 5), 5, || Ok(42)).unwrap(), 42);
        assert_eq!(resolve_total(window(10, 5), 5, || Ok(42)).unwrap(), 42);
        assert_eq!(resolve_total(window(10, 5), 0, || Ok(7)).unwrap(), 7);
    }
}
