//! Search criteria, paging requests and the page envelope.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::types::TypeConstraintError;

/// Optional criteria for a member search. Absent fields do not restrict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }
}

/// Column of the member/team projection a search can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    MemberId,
    Username,
    Age,
    TeamId,
    TeamName,
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortField::MemberId => "member_id",
            SortField::Username => "username",
            SortField::Age => "age",
            SortField::TeamId => "team_id",
            SortField::TeamName => "team_name",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "member_id" | "id" => Ok(SortField::MemberId),
            "username" => Ok(SortField::Username),
            "age" => Ok(SortField::Age),
            "team_id" => Ok(SortField::TeamId),
            "team_name" => Ok(SortField::TeamName),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort field `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Placement of `NULL` values, applied regardless of the sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    #[default]
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
    pub nulls: NullOrdering,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
            nulls: NullOrdering::default(),
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
            nulls: NullOrdering::default(),
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullOrdering::First;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullOrdering::Last;
        self
    }
}

impl FromStr for SortKey {
    type Err = TypeConstraintError;

    /// Parses `field[,asc|desc][,nulls_first|nulls_last]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let field = parts.next().unwrap_or_default().parse::<SortField>()?;
        let mut key = SortKey::asc(field);

        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "asc" => key.direction = SortDirection::Asc,
                "desc" => key.direction = SortDirection::Desc,
                "nulls_first" => key.nulls = NullOrdering::First,
                "nulls_last" => key.nulls = NullOrdering::Last,
                other => {
                    return Err(TypeConstraintError::InvalidValue(format!(
                        "unknown sort option `{other}` for `{field}`"
                    )));
                }
            }
        }

        Ok(key)
    }
}

/// Offset/limit pair of a validated [`PageRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

/// Requested slice of a search result and its ordering.
///
/// Values are kept as given so that invalid requests can be reported by the
/// search service instead of being clamped silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
    pub sort: Vec<SortKey>,
}

impl PageRequest {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            sort: Vec::new(),
        }
    }

    /// Zero-based page number of `size` rows.
    pub fn of(page: i64, size: i64) -> Self {
        Self::new(page.saturating_mul(size), size)
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Returns the window when `offset >= 0` and `limit > 0`.
    pub fn window(&self) -> Option<Window> {
        let offset = usize::try_from(self.offset).ok()?;
        let limit = usize::try_from(self.limit).ok().filter(|limit| *limit > 0)?;
        Some(Window { offset, limit })
    }
}

/// One page of search results together with the total match count.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, window: Window, total_elements: usize) -> Self {
        Self {
            content,
            total_elements,
            offset: window.offset,
            limit: window.limit,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.limit.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.content.len() < self.total_elements
    }

    /// Zero-based number of this page.
    pub fn number(&self) -> usize {
        self.offset / self.limit.max(1)
    }
}
