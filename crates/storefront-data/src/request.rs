//! Validated run requests.
//!
//! A [`RunRequest`] can only be constructed from a positive count and a
//! non-empty selection of requestable kinds, so everything downstream may
//! assume the request is sound.

use std::collections::BTreeSet;

use crate::entity::EntityKind;
use crate::error::RunRequestError;

/// Largest record count a single run accepts per kind.
pub const MAX_RECORD_COUNT: i64 = 1_000_000;

/// Label selecting every requestable kind.
const ALL_LABEL: &str = "all";

/// Which kinds a run should generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindSelection {
    /// Every requestable kind.
    All,
    /// The listed kinds only.
    Kinds(BTreeSet<EntityKind>),
}

/// A validated request to generate `count` records of each selected kind.
///
/// # Example
///
/// ```
/// use storefront_data::{EntityKind, RunRequest};
///
/// let request = RunRequest::parse(["order"], 5).expect("valid request");
///
/// assert_eq!(request.count(), 5);
/// assert_eq!(request.kinds(), [EntityKind::Order, EntityKind::OrderLine]);
/// assert!(RunRequest::parse(["order"], 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    selection: KindSelection,
    count: usize,
}

impl RunRequest {
    /// Validates a selection and count.
    ///
    /// # Errors
    ///
    /// Returns [`RunRequestError`] when the count is not positive or too
    /// large, the selection is empty, or it names an owned kind.
    pub fn new(selection: KindSelection, count: i64) -> Result<Self, RunRequestError> {
        let checked = validate_count(count)?;
        if let KindSelection::Kinds(kinds) = &selection {
            if kinds.is_empty() {
                return Err(RunRequestError::EmptySelection);
            }
            if let Some((kind, owner)) = kinds
                .iter()
                .find_map(|kind| kind.owner().map(|owner| (*kind, owner)))
            {
                return Err(RunRequestError::NotRequestable { kind, owner });
            }
        }
        Ok(Self {
            selection,
            count: checked,
        })
    }

    /// Parses kind names and validates the result.
    ///
    /// The label `all` selects every requestable kind; any other name is
    /// parsed with [`EntityKind::from_str`](std::str::FromStr).
    ///
    /// # Errors
    ///
    /// Returns [`RunRequestError`] for an invalid count, an unknown or owned
    /// kind name, or an empty list of names.
    pub fn parse<I, S>(names: I, count: i64) -> Result<Self, RunRequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_count(count)?;
        let mut kinds = BTreeSet::new();
        for name in names {
            let label = name.as_ref();
            if label.trim().eq_ignore_ascii_case(ALL_LABEL) {
                return Self::new(KindSelection::All, count);
            }
            kinds.insert(label.parse::<EntityKind>()?);
        }
        Self::new(KindSelection::Kinds(kinds), count)
    }

    /// Returns the selection as requested.
    #[must_use]
    pub const fn selection(&self) -> &KindSelection {
        &self.selection
    }

    /// Returns the per-kind record count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the kinds to generate, in creation order.
    ///
    /// Requesting orders implies order lines for them.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::requestable()
            .filter(|kind| self.includes(*kind))
            .collect()
    }

    fn includes(&self, kind: EntityKind) -> bool {
        match &self.selection {
            KindSelection::All => true,
            KindSelection::Kinds(kinds) => {
                kinds.contains(&kind)
                    || (kind == EntityKind::OrderLine && kinds.contains(&EntityKind::Order))
            }
        }
    }
}

fn validate_count(count: i64) -> Result<usize, RunRequestError> {
    if count <= 0 {
        return Err(RunRequestError::NonPositiveCount { count });
    }
    if count > MAX_RECORD_COUNT {
        return Err(RunRequestError::CountTooLarge { count });
    }
    usize::try_from(count).map_err(|_| RunRequestError::CountTooLarge { count })
}
