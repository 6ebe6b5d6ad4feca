//! Compiles a [`SearchFilter`] into a conjunction of optional conditions.
//!
//! Every field is translated on its own into an `Option<Condition>`; `None`
//! means "no restriction" and is simply skipped when the conditions are
//! combined. An absent condition is never turned into an always-false one.

use crate::domain::search::SearchFilter;

/// Column restricted by a [`Condition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionField {
    Username,
    TeamName,
    Age,
}

/// A single restriction over the member/team projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// `members.username = value`
    UsernameEq(String),
    /// `teams.name = value`
    TeamNameEq(String),
    /// `members.age >= value`
    AgeGoe(i32),
    /// `members.age <= value`
    AgeLoe(i32),
}

impl Condition {
    pub fn field(&self) -> ConditionField {
        match self {
            Condition::UsernameEq(_) => ConditionField::Username,
            Condition::TeamNameEq(_) => ConditionField::TeamName,
            Condition::AgeGoe(_) | Condition::AgeLoe(_) => ConditionField::Age,
        }
    }
}

/// Blank characters for the absent-value rule. No-break spaces and U+0085
/// count as text, while the ASCII separators U+001C..U+001F are blank.
fn is_blank(c: char) -> bool {
    match c {
        '\u{85}' | '\u{a0}' | '\u{2007}' | '\u{202f}' => false,
        '\u{1c}'..='\u{1f}' => true,
        c => c.is_whitespace(),
    }
}

/// Returns the value only when it contains a non-blank character.
fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| v.chars().any(|c| !is_blank(c)))
}

pub fn username_eq(username: Option<&str>) -> Option<Condition> {
    has_text(username).map(|v| Condition::UsernameEq(v.to_string()))
}

pub fn team_name_eq(team_name: Option<&str>) -> Option<Condition> {
    has_text(team_name).map(|v| Condition::TeamNameEq(v.to_string()))
}

pub fn age_goe(age: Option<i32>) -> Option<Condition> {
    age.map(Condition::AgeGoe)
}

pub fn age_loe(age: Option<i32>) -> Option<Condition> {
    age.map(Condition::AgeLoe)
}

/// Conjunction of conditions. An empty expression matches every row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterExpr {
    conditions: Vec<Condition>,
}

impl FilterExpr {
    /// Expression without any restriction.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// ANDs together the present conditions, skipping absent ones.
    pub fn all_of<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Option<Condition>>,
    {
        Self {
            conditions: conditions.into_iter().flatten().collect(),
        }
    }

    /// Adds `condition` to the conjunction if it is present.
    pub fn and(mut self, condition: Option<Condition>) -> Self {
        self.conditions.extend(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_unrestricted(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl From<Option<Condition>> for FilterExpr {
    fn from(condition: Option<Condition>) -> Self {
        FilterExpr::unrestricted().and(condition)
    }
}

/// ANDs two optional conditions; an absent left-hand side yields the right.
pub fn both(lhs: Option<Condition>, rhs: Option<Condition>) -> FilterExpr {
    FilterExpr::from(lhs).and(rhs)
}

/// Builds the filter expression for a search.
pub fn compile(filter: &SearchFilter) -> FilterExpr {
    FilterExpr::all_of([
        username_eq(filter.username.as_deref()),
        team_name_eq(filter.team_name.as_deref()),
        age_goe(filter.age_goe),
        age_loe(filter.age_loe),
    ])
}
