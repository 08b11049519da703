use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::fertiscan::metadata::error::{MetadataError, Result};

/// Contact details of a company or manufacturer printed on the label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationInformation {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

impl OrganizationInformation {
    /// An organization is located when at least one contact field is known.
    pub fn is_located(&self) -> bool {
        self.name.is_some()
            || self.address.is_some()
            || self.website.is_some()
            || self.phone_number.is_some()
    }
}

/// A physical measurement such as a weight, a volume or a density.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, deserialize_with = "optional_number")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub edited: bool,
}

/// A nutrient or ingredient reading. `name` holds the nutrient label as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    #[serde(default, deserialize_with = "optional_number")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub edited: bool,
}

/// Parallel English and French readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BilingualValues {
    #[serde(default, deserialize_with = "or_default")]
    pub en: Vec<ValueEntry>,
    #[serde(default, deserialize_with = "or_default")]
    pub fr: Vec<ValueEntry>,
}

/// Bilingual free text such as cautions, instructions or first aid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubLabel {
    #[serde(default, deserialize_with = "text_list")]
    pub en: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub fr: Vec<String>,
}

/// Physical specification of the product: humidity, pH and solubility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default, deserialize_with = "optional_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub solubility: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub edited: bool,
}

impl Specification {
    /// True when no measurement was read. Such entries are never kept, even
    /// when flagged as edited.
    pub fn is_empty(&self) -> bool {
        self.humidity.is_none() && self.ph.is_none() && self.solubility.is_none()
    }
}

/// English and French specification lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specifications {
    #[serde(default, deserialize_with = "or_default")]
    pub en: Vec<Specification>,
    #[serde(default, deserialize_with = "or_default")]
    pub fr: Vec<Specification>,
}

/// Weights (a label may print several units), volume and density.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "or_default")]
    pub weight: Vec<Metric>,
    #[serde(default, deserialize_with = "or_default")]
    pub volume: Metric,
    #[serde(default, deserialize_with = "or_default")]
    pub density: Metric,
}

/// Identity and composition of the labelled product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInformation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label_id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub registration_numbers: Vec<String>,
    #[serde(default)]
    pub lot_number: Option<String>,
    pub metrics: Metrics,
    #[serde(default)]
    pub npk: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub n: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub p: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub k: Option<f64>,
}

/// Per-language heading of the guaranteed analysis block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Title {
    pub en: Option<String>,
    pub fr: Option<String>,
}

/// Guaranteed analysis block: per-language title and nutrient readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuaranteedAnalysis {
    #[serde(default, deserialize_with = "or_default")]
    pub title: Title,
    #[serde(default)]
    pub is_minimal: Option<bool>,
    #[serde(default, deserialize_with = "or_default")]
    pub en: Vec<ValueEntry>,
    #[serde(default, deserialize_with = "or_default")]
    pub fr: Vec<ValueEntry>,
}

/// Aggregate root describing the full structured content of one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    #[serde(default)]
    pub inspection_id: Option<Uuid>,
    #[serde(default)]
    pub inspector_id: Option<Uuid>,
    #[serde(default, deserialize_with = "flag")]
    pub verified: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub company: OrganizationInformation,
    #[serde(default, deserialize_with = "or_default")]
    pub manufacturer: OrganizationInformation,
    pub product: ProductInformation,
    pub cautions: SubLabel,
    pub instructions: SubLabel,
    pub micronutrients: BilingualValues,
    pub ingredients: BilingualValues,
    pub specifications: Specifications,
    pub first_aid: SubLabel,
    pub guaranteed_analysis: GuaranteedAnalysis,
}

impl Inspection {
    /// Structural checks the type system cannot express. Run once on every
    /// document produced by the import and export builders.
    pub fn validate(&self) -> Result<()> {
        let product = &self.product;
        let present = [product.n, product.p, product.k]
            .iter()
            .filter(|component| component.is_some())
            .count();
        if present != 0 && present != 3 {
            return Err(MetadataError::invalid(
                "product",
                "n, p and k must be all present or all absent",
            ));
        }

        let mut numbers: Vec<(String, Option<f64>)> = vec![
            ("product.n".into(), product.n),
            ("product.p".into(), product.p),
            ("product.k".into(), product.k),
            ("product.metrics.volume".into(), product.metrics.volume.value),
            ("product.metrics.density".into(), product.metrics.density.value),
        ];
        for (index, weight) in product.metrics.weight.iter().enumerate() {
            numbers.push((format!("product.metrics.weight[{index}]"), weight.value));
        }
        let value_lists = [
            ("micronutrients.en", &self.micronutrients.en),
            ("micronutrients.fr", &self.micronutrients.fr),
            ("ingredients.en", &self.ingredients.en),
            ("ingredients.fr", &self.ingredients.fr),
            ("guaranteed_analysis.en", &self.guaranteed_analysis.en),
            ("guaranteed_analysis.fr", &self.guaranteed_analysis.fr),
        ];
        for (path, entries) in value_lists {
            for (index, entry) in entries.iter().enumerate() {
                numbers.push((format!("{path}[{index}]"), entry.value));
            }
        }
        for (path, entries) in [
            ("specifications.en", &self.specifications.en),
            ("specifications.fr", &self.specifications.fr),
        ] {
            for (index, spec) in entries.iter().enumerate() {
                numbers.push((format!("{path}[{index}].humidity"), spec.humidity));
                numbers.push((format!("{path}[{index}].ph"), spec.ph));
                numbers.push((format!("{path}[{index}].solubility"), spec.solubility));
            }
        }

        for (path, number) in numbers {
            if let Some(number) = number {
                if !number.is_finite() {
                    return Err(MetadataError::invalid(path, "number must be finite"));
                }
            }
        }
        Ok(())
    }

    /// Serialises the document into the JSON string handed to collaborators.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| MetadataError::Unexpected(err.to_string()))
    }
}

/// Validates a JSON fragment against one of the model types.
pub fn from_fragment<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| MetadataError::invalid(path, err))
}

/// Reads a JSON value as an optional number. Numeric strings are accepted,
/// anything else that is not `null` or a finite number is rejected.
pub fn number_from_json(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| format!("invalid number literal {number}")),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| format!("input should be a valid number, unable to parse '{text}'")),
        other => Err(format!("input should be a valid number, found {other}")),
    }
}

fn optional_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    number_from_json(&value).map_err(de::Error::custom)
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metric_accepts_numeric_strings() {
        let metric: Metric = from_fragment("metric", json!({"value": "12.5", "unit": "kg"}))
            .expect("metric parsed");
        assert_eq!(metric.value, Some(12.5));
        assert!(!metric.edited);
    }

    #[test]
    fn metric_rejects_non_numeric_value() {
        let err = from_fragment::<Metric>("weight", json!({"value": "heavy", "unit": "kg"}))
            .expect_err("value is not a number");
        assert!(err.to_string().contains("Validation error: weight"));
    }

    #[test]
    fn null_collections_fall_back_to_defaults() {
        let metrics: Metrics = from_fragment(
            "metrics",
            json!({"weight": null, "volume": null, "density": {"value": 1.2, "unit": "g/mL"}}),
        )
        .expect("metrics parsed");
        assert!(metrics.weight.is_empty());
        assert_eq!(metrics.volume, Metric::default());
        assert_eq!(metrics.density.value, Some(1.2));
    }

    #[test]
    fn null_sub_label_entries_become_empty_text() {
        let sub_label: SubLabel = from_fragment(
            "cautions",
            json!({"en": ["Warning 1", null, "Warning 2"], "fr": null}),
        )
        .expect("sub label parsed");
        assert_eq!(sub_label.en, vec!["Warning 1", "", "Warning 2"]);
        assert!(sub_label.fr.is_empty());
    }

    #[test]
    fn organization_without_fields_is_not_located() {
        assert!(!OrganizationInformation::default().is_located());
        let located = OrganizationInformation {
            website: Some("https://example.com".into()),
            ..Default::default()
        };
        assert!(located.is_located());
    }
}
