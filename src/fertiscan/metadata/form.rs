use serde_json::{Map, Value};

use crate::fertiscan::metadata::error::{MetadataError, Result};

/// Keys every analysis form produced by the digitization pipeline must carry.
pub const REQUIRED_KEYS: [&str; 29] = [
    "company_name",
    "company_address",
    "company_website",
    "company_phone_number",
    "manufacturer_name",
    "manufacturer_address",
    "manufacturer_website",
    "manufacturer_phone_number",
    "fertiliser_name",
    "registration_number",
    "lot_number",
    "weight",
    "density",
    "volume",
    "npk",
    "warranty",
    "cautions_en",
    "instructions_en",
    "micronutrients_en",
    "ingredients_en",
    "specifications_en",
    "first_aid_en",
    "cautions_fr",
    "instructions_fr",
    "micronutrients_fr",
    "ingredients_fr",
    "specifications_fr",
    "first_aid_fr",
    "guaranteed_analysis",
];

/// Optional English guaranteed analysis block (`{title, is_minimal, nutrients}`).
pub const GUARANTEED_ANALYSIS_EN: &str = "guaranteed_analysis_en";
/// Optional French guaranteed analysis block, same shape as the English one.
pub const GUARANTEED_ANALYSIS_FR: &str = "guaranteed_analysis_fr";

/// Treats `null`, `false`, `0`, `""`, `[]` and `{}` as absent.
///
/// The pipeline leaves placeholders where nothing was read, so readings are
/// passed through this before coercion. A genuine zero reading is lost.
pub fn coerce_empty_to_absent(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    })
}

/// Read-only view over the flat analysis form.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisForm<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> AnalysisForm<'a> {
    /// Wraps a form, rejecting anything that is not a JSON object.
    pub fn new(form: &'a Value) -> Result<Self> {
        match form {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(MetadataError::invalid(
                "analysis form",
                format!("expected a JSON object, found {}", kind_of(other)),
            )),
        }
    }

    /// Required keys absent from the form, in schema order.
    pub fn missing_keys(&self) -> Vec<String> {
        REQUIRED_KEYS
            .iter()
            .filter(|key| !self.fields.contains_key(**key))
            .map(|key| key.to_string())
            .collect()
    }

    /// Raw value under `key`, if the form has it.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    /// Text field; `null` and absence both read as `None`.
    pub fn text(&self, key: &str) -> Result<Option<String>> {
        text_value(key, self.fields.get(key))
    }

    /// List field; `null` and absence both read as an empty list.
    pub fn list(&self, key: &str) -> Result<&'a [Value]> {
        list_value(key, self.fields.get(key))
    }

    /// Object field; `null` and absence both read as `None`.
    pub fn object(&self, key: &str) -> Result<Option<&'a Map<String, Value>>> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(MetadataError::invalid(
                key,
                format!("expected an object, found {}", kind_of(other)),
            )),
        }
    }

    /// List of text entries such as a sub-label.
    pub fn text_list(&self, key: &str) -> Result<Vec<String>> {
        self.list(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(text) => Ok(text.clone()),
                other => Err(MetadataError::invalid(
                    format!("{key}[{index}]"),
                    format!("expected text, found {}", kind_of(other)),
                )),
            })
            .collect()
    }
}

/// Reads an optional text field; `null` and absence are `None`.
pub(crate) fn text_value(path: &str, value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(MetadataError::invalid(
            path,
            format!("expected text, found {}", kind_of(other)),
        )),
    }
}

pub(crate) fn list_value<'v>(path: &str, value: Option<&'v Value>) -> Result<&'v [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(MetadataError::invalid(
            path,
            format!("expected a list, found {}", kind_of(other)),
        )),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_every_missing_key() {
        let form = json!({"company_name": "X", "fertiliser_name": "Y"});
        let form = AnalysisForm::new(&form).expect("object form");
        let missing = form.missing_keys();
        assert_eq!(missing.len(), REQUIRED_KEYS.len() - 2);
        assert!(!missing.contains(&"company_name".to_string()));
        assert_eq!(missing.first().map(String::as_str), Some("company_address"));
        assert_eq!(missing.last().map(String::as_str), Some("guaranteed_analysis"));
    }

    #[test]
    fn rejects_non_object_forms() {
        let form = json!(["not", "a", "form"]);
        assert!(matches!(
            AnalysisForm::new(&form),
            Err(MetadataError::Validation(_))
        ));
    }

    #[test]
    fn empty_placeholders_are_absent() {
        assert_eq!(coerce_empty_to_absent(Some(&json!(""))), None);
        assert_eq!(coerce_empty_to_absent(Some(&json!(0))), None);
        assert_eq!(coerce_empty_to_absent(Some(&json!(0.0))), None);
        assert_eq!(coerce_empty_to_absent(Some(&Value::Null)), None);
        assert_eq!(coerce_empty_to_absent(None), None);
        assert_eq!(coerce_empty_to_absent(Some(&json!("2"))), Some(&json!("2")));
        assert_eq!(coerce_empty_to_absent(Some(&json!(0.5))), Some(&json!(0.5)));
    }

    #[test]
    fn text_fields_must_be_text() {
        let form = json!({"lot_number": 42, "warranty": null});
        let form = AnalysisForm::new(&form).expect("object form");
        assert_eq!(form.text("warranty").expect("null text"), None);
        assert_eq!(form.text("absent").expect("absent text"), None);
        let err = form.text("lot_number").expect_err("number is not text");
        assert!(err.to_string().contains("lot_number"));
    }
}
