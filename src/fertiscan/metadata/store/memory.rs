use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::fertiscan::metadata::model::{
    BilingualValues, GuaranteedAnalysis, Inspection, Metric, Metrics, OrganizationInformation,
    ProductInformation, Specifications, SubLabel, ValueEntry,
};
use crate::fertiscan::metadata::store::{
    Fragment, InspectionRecord, LabelStore, StoreError, StoreResult,
};

/// In-memory label database.
///
/// `persist` plays the part of the stored procedure that turns an imported
/// document into rows; the [`LabelStore`] reads answer the way the label
/// views do, including `null` for empty aggregates. The whole store
/// serialises as a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    inspections: BTreeMap<Uuid, StoredInspection>,
    labels: BTreeMap<String, StoredLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredInspection {
    inspector_id: Option<Uuid>,
    verified: bool,
    label_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredLabel {
    product: ProductInformation,
    company: Option<OrganizationInformation>,
    manufacturer: Option<OrganizationInformation>,
    cautions: SubLabel,
    instructions: SubLabel,
    first_aid: SubLabel,
    ingredients: BilingualValues,
    micronutrients: BilingualValues,
    guaranteed_analysis: GuaranteedAnalysis,
    specifications: Specifications,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted inspections.
    pub fn len(&self) -> usize {
        self.inspections.len()
    }

    /// True when nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.inspections.is_empty()
    }

    /// Stores an imported document and returns it with the identifiers
    /// assigned to the inspection, the label and each located organization.
    pub fn persist(&mut self, inspection: &Inspection) -> Inspection {
        let inspection_id = Uuid::new_v4();
        let label_id = Uuid::new_v4().to_string();

        let mut stored = inspection.clone();
        stored.inspection_id = Some(inspection_id);
        stored.product.label_id = Some(label_id.clone());
        stored.specifications.en.retain(|spec| !spec.is_empty());
        stored.specifications.fr.retain(|spec| !spec.is_empty());
        for organization in [&mut stored.company, &mut stored.manufacturer] {
            organization.id = organization
                .is_located()
                .then(|| Uuid::new_v4().to_string());
        }

        self.inspections.insert(
            inspection_id,
            StoredInspection {
                inspector_id: stored.inspector_id,
                verified: stored.verified,
                label_id: label_id.clone(),
            },
        );
        self.labels.insert(
            label_id.clone(),
            StoredLabel {
                product: stored.product.clone(),
                company: stored.company.is_located().then(|| stored.company.clone()),
                manufacturer: stored
                    .manufacturer
                    .is_located()
                    .then(|| stored.manufacturer.clone()),
                cautions: stored.cautions.clone(),
                instructions: stored.instructions.clone(),
                first_aid: stored.first_aid.clone(),
                ingredients: stored.ingredients.clone(),
                micronutrients: stored.micronutrients.clone(),
                guaranteed_analysis: stored.guaranteed_analysis.clone(),
                specifications: stored.specifications.clone(),
            },
        );
        debug!(%inspection_id, label_id = %label_id, "persisted inspection");
        stored
    }

    fn label(&self, fragment: Fragment, label_id: &str) -> StoreResult<&StoredLabel> {
        self.labels
            .get(label_id)
            .ok_or_else(|| StoreError::not_found(fragment, label_id))
    }
}

fn fragment<T: Serialize>(value: &T) -> StoreResult<Value> {
    serde_json::to_value(value).map_err(|err| StoreError::Other(err.to_string()))
}

/// Views aggregate rows, so a reading that was never recorded comes back as `null`.
fn metric_or_null(metric: &Metric) -> StoreResult<Value> {
    if *metric == Metric::default() {
        Ok(Value::Null)
    } else {
        fragment(metric)
    }
}

impl LabelStore for MemoryStore {
    fn inspection(&self, inspection_id: Uuid) -> StoreResult<InspectionRecord> {
        let stored = self
            .inspections
            .get(&inspection_id)
            .ok_or_else(|| StoreError::not_found(Fragment::Inspection, inspection_id))?;
        Ok(InspectionRecord {
            inspection_id,
            inspector_id: stored.inspector_id,
            verified: stored.verified,
            label_id: stored.label_id.clone(),
        })
    }

    fn label_information(&self, label_id: &str) -> StoreResult<Value> {
        let product = &self.label(Fragment::LabelInformation, label_id)?.product;
        Ok(json!({
            "name": product.name,
            "label_id": product.label_id,
            "registration_numbers": product.registration_numbers,
            "lot_number": product.lot_number,
            "npk": product.npk,
            "warranty": product.warranty,
            "n": product.n,
            "p": product.p,
            "k": product.k,
        }))
    }

    fn metrics(&self, label_id: &str) -> StoreResult<Value> {
        let Metrics {
            weight,
            volume,
            density,
        } = &self.label(Fragment::Metric, label_id)?.product.metrics;
        let weight = if weight.is_empty() {
            Value::Null
        } else {
            fragment(weight)?
        };
        Ok(json!({
            "metrics": {
                "weight": weight,
                "volume": metric_or_null(volume)?,
                "density": metric_or_null(density)?,
            }
        }))
    }

    fn organizations(&self, label_id: &str) -> StoreResult<Value> {
        let label = self.label(Fragment::Organization, label_id)?;
        let mut organizations = serde_json::Map::new();
        if let Some(company) = &label.company {
            organizations.insert("company".to_string(), fragment(company)?);
        }
        if let Some(manufacturer) = &label.manufacturer {
            organizations.insert("manufacturer".to_string(), fragment(manufacturer)?);
        }
        Ok(Value::Object(organizations))
    }

    fn sub_labels(&self, label_id: &str) -> StoreResult<Option<Value>> {
        let label = self.label(Fragment::SubLabel, label_id)?;
        let sub_labels = [&label.cautions, &label.instructions, &label.first_aid];
        if sub_labels
            .iter()
            .all(|sub_label| sub_label.en.is_empty() && sub_label.fr.is_empty())
        {
            return Ok(None);
        }
        Ok(Some(json!({
            "cautions": fragment(&label.cautions)?,
            "instructions": fragment(&label.instructions)?,
            "first_aid": fragment(&label.first_aid)?,
        })))
    }

    fn ingredients(&self, label_id: &str) -> StoreResult<Value> {
        let label = self.label(Fragment::Ingredient, label_id)?;
        Ok(json!({ "ingredients": fragment(&label.ingredients)? }))
    }

    fn micronutrients(&self, label_id: &str) -> StoreResult<Value> {
        let label = self.label(Fragment::Micronutrient, label_id)?;
        Ok(json!({ "micronutrients": fragment(&label.micronutrients)? }))
    }

    /// Missing titles read back as `""`, as the guaranteed analysis view
    /// coalesces them.
    fn guaranteed_analysis(&self, label_id: &str) -> StoreResult<Value> {
        let analysis = &self
            .label(Fragment::GuaranteedAnalysis, label_id)?
            .guaranteed_analysis;
        let readings = |entries: &Vec<ValueEntry>| -> StoreResult<Value> {
            if entries.is_empty() {
                Ok(Value::Null)
            } else {
                fragment(entries)
            }
        };
        Ok(json!({
            "guaranteed_analysis": {
                "title": {
                    "en": analysis.title.en.as_deref().unwrap_or_default(),
                    "fr": analysis.title.fr.as_deref().unwrap_or_default(),
                },
                "is_minimal": analysis.is_minimal,
                "en": readings(&analysis.en)?,
                "fr": readings(&analysis.fr)?,
            }
        }))
    }

    fn specifications(&self, label_id: &str) -> StoreResult<Value> {
        let label = self.label(Fragment::Specification, label_id)?;
        Ok(json!({ "specifications": fragment(&label.specifications)? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fertiscan::metadata::model::Title;

    #[test]
    fn unknown_identifiers_report_their_own_fragment() {
        let store = MemoryStore::new();
        let err = store.inspection(Uuid::new_v4()).expect_err("empty store");
        assert!(matches!(
            err,
            StoreError::NotFound {
                fragment: Fragment::Inspection,
                ..
            }
        ));

        let err = store.micronutrients("missing").expect_err("empty store");
        assert!(matches!(
            err,
            StoreError::NotFound {
                fragment: Fragment::Micronutrient,
                ..
            }
        ));
    }

    #[test]
    fn missing_guaranteed_analysis_titles_read_as_empty_text() {
        let mut store = MemoryStore::new();
        let inspection = Inspection {
            inspection_id: None,
            inspector_id: None,
            verified: false,
            company: OrganizationInformation::default(),
            manufacturer: OrganizationInformation::default(),
            product: ProductInformation::default(),
            cautions: SubLabel::default(),
            instructions: SubLabel::default(),
            micronutrients: BilingualValues::default(),
            ingredients: BilingualValues::default(),
            specifications: Specifications::default(),
            first_aid: SubLabel::default(),
            guaranteed_analysis: GuaranteedAnalysis {
                title: Title {
                    en: Some("Guaranteed analysis".into()),
                    fr: None,
                },
                ..GuaranteedAnalysis::default()
            },
        };
        let persisted = store.persist(&inspection);
        let record = store
            .inspection(persisted.inspection_id.expect("inspection id assigned"))
            .expect("inspection stored");

        let analysis = store
            .guaranteed_analysis(&record.label_id)
            .expect("guaranteed analysis stored");
        let title = &analysis["guaranteed_analysis"]["title"];
        assert_eq!(title["en"], json!("Guaranteed analysis"));
        assert_eq!(title["fr"], json!(""));
    }
}
