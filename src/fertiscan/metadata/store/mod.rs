//! Read contract of the storage collaborators consulted by the export path.
//!
//! Each method mirrors one stored function or view of the label database and
//! returns the JSON fragment it produces, keyed by the field names of the
//! [`Inspection`](crate::fertiscan::metadata::model::Inspection) aggregate.

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;

/// The storage sub-collaborators that own a part of an inspection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    Inspection,
    LabelInformation,
    Metric,
    Organization,
    SubLabel,
    Ingredient,
    Micronutrient,
    GuaranteedAnalysis,
    Specification,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fragment::Inspection => "inspection",
            Fragment::LabelInformation => "label information",
            Fragment::Metric => "metric",
            Fragment::Organization => "organization",
            Fragment::SubLabel => "sub label",
            Fragment::Ingredient => "ingredient",
            Fragment::Micronutrient => "micronutrient",
            Fragment::GuaranteedAnalysis => "guaranteed analysis",
            Fragment::Specification => "specification",
        };
        f.write_str(name)
    }
}

/// Failures reported by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collaborator has no data for the requested key.
    #[error("{fragment} not found: {key}")]
    NotFound { fragment: Fragment, key: String },

    /// The query itself failed.
    #[error("query failed: {0}")]
    Query(String),

    /// Anything else the collaborator could not classify.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Not-found failure for `key` in the given fragment.
    pub fn not_found(fragment: Fragment, key: impl fmt::Display) -> Self {
        StoreError::NotFound {
            fragment,
            key: key.to_string(),
        }
    }
}

/// Result of a store read.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Row of the inspection table needed to locate the label of an inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub inspection_id: Uuid,
    pub inspector_id: Option<Uuid>,
    #[serde(default)]
    pub verified: bool,
    pub label_id: String,
}

/// Read operations the export builder issues, in order, against one
/// snapshot-consistent connection held by the caller.
pub trait LabelStore {
    /// Looks up the inspection row.
    fn inspection(&self, inspection_id: Uuid) -> StoreResult<InspectionRecord>;

    /// Product fields of the label: name, label id, registration numbers, lot
    /// number, npk code, warranty and the n/p/k components.
    fn label_information(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"metrics": {"weight": [..] | null, "volume": {..} | null, "density": {..} | null}}`.
    fn metrics(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"company": {..}, "manufacturer": {..}}`; either key may be missing.
    fn organizations(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"cautions": {..}, "instructions": {..}, "first_aid": {..}}`, or `None`
    /// when the label has no sub-label rows at all.
    fn sub_labels(&self, label_id: &str) -> StoreResult<Option<Value>>;

    /// `{"ingredients": {"en": [..], "fr": [..]}}`.
    fn ingredients(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"micronutrients": {"en": [..], "fr": [..]}}`.
    fn micronutrients(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"guaranteed_analysis": {"title": {..}, "is_minimal": .., "en": [..], "fr": [..]}}`.
    fn guaranteed_analysis(&self, label_id: &str) -> StoreResult<Value>;

    /// `{"specifications": {"en": [..], "fr": [..]}}`.
    fn specifications(&self, label_id: &str) -> StoreResult<Value>;
}
