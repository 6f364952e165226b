//! Causes and the read-only cause directory.

use std::collections::BTreeMap;

use crate::tokens::CauseId;
use crate::waqf::{WaqfType, WaqfTypeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A charitable recipient and the waqf types it accepts.
///
/// `supportedWaqfTypes` may be missing or empty in stored data; the engine
/// tolerates both (a missing set deserializes as empty).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Cause {
    pub id: CauseId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supported_waqf_types: WaqfTypeSet,
}

impl Cause {
    pub fn new(id: CauseId, name: impl Into<String>, supported: impl IntoIterator<Item = WaqfType>) -> Self {
        Self {
            id,
            name: name.into(),
            supported_waqf_types: supported.into_iter().collect(),
        }
    }

    pub fn supports(&self, t: WaqfType) -> bool {
        self.supported_waqf_types.contains(&t)
    }
}

/// One catalog row: `{ "causeId", "supportedWaqfTypes" }`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CauseRecord {
    pub cause_id: CauseId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supported_waqf_types: WaqfTypeSet,
}

/// Read-only `CauseId → supported types` lookup sourced from the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CauseDirectory {
    entries: BTreeMap<CauseId, WaqfTypeSet>,
}

impl CauseDirectory {
    /// Build from catalog rows; a later row for the same id replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = CauseRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|r| (r.cause_id, r.supported_waqf_types))
            .collect();
        Self { entries }
    }

    pub fn supported_types(&self, id: &CauseId) -> Option<&WaqfTypeSet> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Copy of `cause` with its supported types taken from the directory when
    /// the directory knows the id; unknown causes are returned unchanged.
    pub fn refresh(&self, cause: &Cause) -> Cause {
        match self.entries.get(&cause.id) {
            Some(types) => Cause { supported_waqf_types: types.clone(), ..cause.clone() },
            None => cause.clone(),
        }
    }
}
