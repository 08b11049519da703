use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::fertiscan::metadata::align::align_inspection;
use crate::fertiscan::metadata::error::{MetadataError, Result};
use crate::fertiscan::metadata::model::{
    self, BilingualValues, GuaranteedAnalysis, Inspection, Metric, OrganizationInformation,
    ProductInformation, Specifications, SubLabel,
};
use crate::fertiscan::metadata::store::{Fragment, LabelStore};

const SUB_LABELS: [&str; 3] = ["cautions", "instructions", "first_aid"];
const ORGANIZATIONS: [&str; 2] = ["company", "manufacturer"];

/// Rebuilds the serialised inspection document of a persisted inspection.
pub fn build_export<S>(store: &S, inspection_id: Uuid) -> Result<String>
where
    S: LabelStore + ?Sized,
{
    inspection_from_store(store, inspection_id)?.to_json()
}

/// Collects every fragment of a persisted inspection and validates the
/// assembled document.
///
/// Not-found failures keep the fragment kind reported by the store. A
/// fragment that does not match the document model means the stored record
/// itself is malformed and is reported as a validation error.
#[instrument(level = "debug", skip(store))]
pub fn inspection_from_store<S>(store: &S, inspection_id: Uuid) -> Result<Inspection>
where
    S: LabelStore + ?Sized,
{
    let record = store.inspection(inspection_id)?;
    let label_id = record.label_id.as_str();

    let mut assembly = Assembly::default();
    assembly.merge(
        Fragment::Inspection,
        json_object([
            (
                "inspection_id",
                Value::String(record.inspection_id.to_string()),
            ),
            (
                "inspector_id",
                record
                    .inspector_id
                    .map_or(Value::Null, |id| Value::String(id.to_string())),
            ),
            ("verified", Value::Bool(record.verified)),
        ]),
    )?;

    let mut product = object(Fragment::LabelInformation, store.label_information(label_id)?)?;
    let metrics = metrics_with_defaults(store.metrics(label_id)?)?;
    if product.insert("metrics".to_string(), metrics).is_some() {
        return Err(conflict(Fragment::Metric, "product.metrics"));
    }
    let product = Value::Object(product);
    model::from_fragment::<ProductInformation>("product", product.clone())?;
    assembly.merge(
        Fragment::LabelInformation,
        json_object([("product", product)]),
    )?;

    let organizations = object(Fragment::Organization, store.organizations(label_id)?)?;
    for key in ORGANIZATIONS {
        if let Some(organization) = organizations.get(key) {
            model::from_fragment::<OrganizationInformation>(key, organization.clone())?;
        }
    }
    assembly.merge(Fragment::Organization, organizations)?;

    let sub_labels = match store.sub_labels(label_id)? {
        Some(fragment) => {
            let sub_labels = object(Fragment::SubLabel, fragment)?;
            for (key, sub_label) in &sub_labels {
                model::from_fragment::<SubLabel>(key, sub_label.clone())?;
            }
            sub_labels
        }
        None => {
            debug!(label_id, "label has no sub labels");
            SUB_LABELS
                .iter()
                .map(|key| (key.to_string(), json!({"en": [], "fr": []})))
                .collect()
        }
    };
    assembly.merge(Fragment::SubLabel, sub_labels)?;

    let ingredients = object(Fragment::Ingredient, store.ingredients(label_id)?)?;
    validate_entry::<BilingualValues>(&ingredients, "ingredients")?;
    assembly.merge(Fragment::Ingredient, ingredients)?;

    let micronutrients = object(Fragment::Micronutrient, store.micronutrients(label_id)?)?;
    validate_entry::<BilingualValues>(&micronutrients, "micronutrients")?;
    assembly.merge(Fragment::Micronutrient, micronutrients)?;

    let guaranteed = guaranteed_with_defaults(store.guaranteed_analysis(label_id)?)?;
    validate_entry::<GuaranteedAnalysis>(&guaranteed, "guaranteed_analysis")?;
    assembly.merge(Fragment::GuaranteedAnalysis, guaranteed)?;

    let specifications = object(Fragment::Specification, store.specifications(label_id)?)?;
    validate_entry::<Specifications>(&specifications, "specifications")?;
    assembly.merge(Fragment::Specification, specifications)?;

    let fields = assembly.fields.len();
    let mut inspection: Inspection = model::from_fragment("inspection", Value::Object(assembly.fields))?;
    inspection.specifications.en.retain(|spec| !spec.is_empty());
    inspection.specifications.fr.retain(|spec| !spec.is_empty());
    align_inspection(&mut inspection);
    inspection.validate()?;

    info!(%inspection_id, label_id, fields, "rebuilt inspection from store");
    Ok(inspection)
}

/// Top-level fields gathered so far. Fragments own disjoint keys.
#[derive(Debug, Default)]
struct Assembly {
    fields: Map<String, Value>,
}

impl Assembly {
    fn merge(&mut self, fragment: Fragment, fields: Map<String, Value>) -> Result<()> {
        for (key, value) in fields {
            if self.fields.contains_key(&key) {
                return Err(conflict(fragment, &key));
            }
            self.fields.insert(key, value);
        }
        Ok(())
    }
}

fn conflict(fragment: Fragment, field: &str) -> MetadataError {
    MetadataError::invalid(
        "inspection",
        format!("{fragment} fragment overwrites field '{field}'"),
    )
}

fn object(fragment: Fragment, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(MetadataError::invalid(
            fragment,
            format!("expected a JSON object, found {other}"),
        )),
    }
}

fn json_object<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn validate_entry<T: serde::de::DeserializeOwned>(
    fragment: &Map<String, Value>,
    key: &str,
) -> Result<()> {
    let value = fragment.get(key).cloned().unwrap_or(Value::Null);
    model::from_fragment::<T>(key, value)?;
    Ok(())
}

fn empty_metric() -> Result<Value> {
    serde_json::to_value(Metric::default()).map_err(|err| MetadataError::Unexpected(err.to_string()))
}

/// Unwraps `{"metrics": {..}}`, substituting an empty weight list and empty
/// volume and density readings for whatever the store left out.
fn metrics_with_defaults(fragment: Value) -> Result<Value> {
    let mut fragment = object(Fragment::Metric, fragment)?;
    let mut metrics = match fragment.remove("metrics") {
        None | Some(Value::Null) => Map::new(),
        Some(metrics) => object(Fragment::Metric, metrics)?,
    };

    if metrics.get("weight").is_none_or(Value::is_null) {
        debug!("no weight recorded, defaulting to an empty list");
        metrics.insert("weight".to_string(), Value::Array(Vec::new()));
    }
    for key in ["volume", "density"] {
        if metrics.get(key).is_none_or(Value::is_null) {
            debug!(metric = key, "no reading recorded, defaulting to an empty metric");
            metrics.insert(key.to_string(), empty_metric()?);
        }
    }
    Ok(Value::Object(metrics))
}

/// Guarantees the `guaranteed_analysis` key exists with both reading lists.
fn guaranteed_with_defaults(fragment: Value) -> Result<Map<String, Value>> {
    let mut fragment = object(Fragment::GuaranteedAnalysis, fragment)?;
    let mut analysis = match fragment.remove("guaranteed_analysis") {
        None | Some(Value::Null) => Map::new(),
        Some(analysis) => object(Fragment::GuaranteedAnalysis, analysis)?,
    };
    for key in ["en", "fr"] {
        if analysis.get(key).is_none_or(Value::is_null) {
            analysis.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }
    fragment.insert("guaranteed_analysis".to_string(), Value::Object(analysis));
    Ok(fragment)
}
