use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::fertiscan::metadata::error::{MetadataError, Result};
use crate::fertiscan::metadata::form::{
    self, AnalysisForm, GUARANTEED_ANALYSIS_EN, GUARANTEED_ANALYSIS_FR, coerce_empty_to_absent,
};
use crate::fertiscan::metadata::model::{
    self, BilingualValues, GuaranteedAnalysis, Inspection, Metric, Metrics,
    OrganizationInformation, ProductInformation, Specification, Specifications, SubLabel,
    ValueEntry, number_from_json,
};
use crate::fertiscan::metadata::parse::{parse_npk, split_value_unit};

/// Builds the serialised inspection document from an analysis form.
///
/// The returned JSON is what the persistence collaborator consumes to create
/// the label rows.
pub fn build_import(form: &Value, inspector_id: Uuid) -> Result<String> {
    inspection_from_form(form, inspector_id)?.to_json()
}

/// Builds and validates the inspection document described by an analysis form.
#[instrument(level = "debug", skip(form))]
pub fn inspection_from_form(form: &Value, inspector_id: Uuid) -> Result<Inspection> {
    let form = AnalysisForm::new(form)?;

    let missing = form.missing_keys();
    if !missing.is_empty() {
        debug!(missing = missing.len(), "analysis form is incomplete");
        return Err(MetadataError::MissingKeys(missing));
    }

    let npk = form.text("npk")?;
    let ratio = parse_npk(npk.as_deref())?;

    let company = organization(&form, "company")?;
    let manufacturer = organization(&form, "manufacturer")?;

    let weight = form
        .list("weight")?
        .iter()
        .enumerate()
        .map(|(index, item)| metric(&format!("weight[{index}]"), item))
        .collect::<Result<Vec<_>>>()?;
    let metrics = Metrics {
        weight,
        volume: optional_metric(&form, "volume")?,
        density: optional_metric(&form, "density")?,
    };

    let product = ProductInformation {
        name: form.text("fertiliser_name")?,
        label_id: None,
        registration_numbers: registration_numbers(form.get("registration_number"))?,
        lot_number: form.text("lot_number")?,
        metrics,
        npk,
        warranty: form.text("warranty")?,
        n: ratio.map(|ratio| ratio.n),
        p: ratio.map(|ratio| ratio.p),
        k: ratio.map(|ratio| ratio.k),
    };

    let inspection = Inspection {
        inspection_id: None,
        inspector_id: Some(inspector_id),
        verified: false,
        company,
        manufacturer,
        product,
        cautions: sub_label(&form, "cautions")?,
        instructions: sub_label(&form, "instructions")?,
        micronutrients: bilingual_values(&form, "micronutrients")?,
        ingredients: bilingual_values(&form, "ingredients")?,
        specifications: Specifications {
            en: specifications(&form, "specifications_en")?,
            fr: specifications(&form, "specifications_fr")?,
        },
        first_aid: sub_label(&form, "first_aid")?,
        guaranteed_analysis: guaranteed_analysis(&form)?,
    };
    inspection.validate()?;

    info!(
        weights = inspection.product.metrics.weight.len(),
        guaranteed = inspection.guaranteed_analysis.en.len() + inspection.guaranteed_analysis.fr.len(),
        "built inspection from analysis form"
    );
    Ok(inspection)
}

fn organization(form: &AnalysisForm<'_>, prefix: &str) -> Result<OrganizationInformation> {
    Ok(OrganizationInformation {
        id: None,
        name: form.text(&format!("{prefix}_name"))?,
        address: form.text(&format!("{prefix}_address"))?,
        website: form.text(&format!("{prefix}_website"))?,
        phone_number: form.text(&format!("{prefix}_phone_number"))?,
    })
}

fn optional_metric(form: &AnalysisForm<'_>, key: &str) -> Result<Metric> {
    match coerce_empty_to_absent(form.get(key)) {
        Some(item) => metric(key, item),
        None => Ok(Metric::default()),
    }
}

/// A metric is either `{value, unit}` or a reading such as `"12.5 kg"`.
fn metric(path: &str, item: &Value) -> Result<Metric> {
    match item {
        Value::Object(fields) => Ok(Metric {
            value: number_from_json(fields.get("value").unwrap_or(&Value::Null))
                .map_err(|reason| MetadataError::invalid(format!("{path}.value"), reason))?,
            unit: form::text_value(&format!("{path}.unit"), fields.get("unit"))?,
            edited: false,
        }),
        Value::String(reading) => {
            let split = split_value_unit(Some(reading.as_str()));
            let value = match split.value {
                Some(raw) => number_from_json(&Value::String(decimal_point(path, &raw)?))
                    .map_err(|reason| MetadataError::invalid(path, reason))?,
                None => None,
            };
            Ok(Metric {
                value,
                unit: split.unit,
                edited: false,
            })
        }
        other => Err(MetadataError::invalid(
            path,
            format!(
                "expected an object or a reading, found {}",
                form::kind_of(other)
            ),
        )),
    }
}

/// French labels print `12,5`; a lone comma is the decimal separator.
///
/// `1,000` reads equally well as a thousands separator, so a lone comma
/// followed by exactly three digits is refused.
fn decimal_point(path: &str, raw: &str) -> Result<String> {
    let Some((whole, fraction)) = raw.split_once(',') else {
        return Ok(raw.to_string());
    };
    if fraction.contains(',') || raw.contains('.') {
        return Ok(raw.to_string());
    }
    if !whole.is_empty() && fraction.len() == 3 && fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(MetadataError::invalid(
            path,
            format!("ambiguous reading {raw:?}: the comma may separate thousands"),
        ));
    }
    Ok(raw.replace(',', "."))
}

fn registration_numbers(value: Option<&Value>) -> Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(number)) if number.is_empty() => Ok(Vec::new()),
        Some(Value::String(number)) => Ok(vec![number.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("registration_number[{index}]");
                let number = match item {
                    Value::Object(fields) => fields.get("identifier"),
                    other => Some(other),
                };
                form::text_value(&path, number)?
                    .ok_or_else(|| MetadataError::invalid(path, "registration number is empty"))
            })
            .collect(),
        Some(other) => Err(MetadataError::invalid(
            "registration_number",
            format!("expected text or a list, found {}", form::kind_of(other)),
        )),
    }
}

fn sub_label(form: &AnalysisForm<'_>, name: &str) -> Result<SubLabel> {
    Ok(SubLabel {
        en: form.text_list(&format!("{name}_en"))?,
        fr: form.text_list(&format!("{name}_fr"))?,
    })
}

fn bilingual_values(form: &AnalysisForm<'_>, name: &str) -> Result<BilingualValues> {
    let en_key = format!("{name}_en");
    let fr_key = format!("{name}_fr");
    Ok(BilingualValues {
        en: value_entries(&en_key, form.list(&en_key)?)?,
        fr: value_entries(&fr_key, form.list(&fr_key)?)?,
    })
}

fn value_entries(key: &str, items: &[Value]) -> Result<Vec<ValueEntry>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| value_entry(&format!("{key}[{index}]"), item))
        .collect()
}

fn value_entry(path: &str, item: &Value) -> Result<ValueEntry> {
    let Value::Object(fields) = item else {
        return Err(MetadataError::invalid(
            path,
            format!("expected an object, found {}", form::kind_of(item)),
        ));
    };

    let value = match coerce_empty_to_absent(fields.get("value")) {
        Some(value) => number_from_json(value)
            .map_err(|reason| MetadataError::invalid(format!("{path}.value"), reason))?,
        None => None,
    };

    Ok(ValueEntry {
        value,
        unit: form::text_value(
            &format!("{path}.unit"),
            coerce_empty_to_absent(fields.get("unit")),
        )?,
        name: form::text_value(&format!("{path}.nutrient"), fields.get("nutrient"))?,
        edited: false,
    })
}

fn specifications(form: &AnalysisForm<'_>, key: &str) -> Result<Vec<Specification>> {
    let mut kept = Vec::new();
    for (index, item) in form.list(key)?.iter().enumerate() {
        let spec: Specification = model::from_fragment(&format!("{key}[{index}]"), item.clone())?;
        if spec.is_empty() {
            debug!(key, index, "dropping specification without readings");
            continue;
        }
        kept.push(spec);
    }
    Ok(kept)
}

fn guaranteed_analysis(form: &AnalysisForm<'_>) -> Result<GuaranteedAnalysis> {
    let mut analysis = GuaranteedAnalysis {
        en: value_entries("guaranteed_analysis", form.list("guaranteed_analysis")?)?,
        ..GuaranteedAnalysis::default()
    };

    if let Some(block) = form.object(GUARANTEED_ANALYSIS_EN)? {
        let (title, is_minimal, nutrients) = guaranteed_block(GUARANTEED_ANALYSIS_EN, block)?;
        analysis.title.en = title;
        analysis.is_minimal = analysis.is_minimal.or(is_minimal);
        if let Some(nutrients) = nutrients {
            analysis.en = nutrients;
        }
    }
    if let Some(block) = form.object(GUARANTEED_ANALYSIS_FR)? {
        let (title, is_minimal, nutrients) = guaranteed_block(GUARANTEED_ANALYSIS_FR, block)?;
        analysis.title.fr = title;
        analysis.is_minimal = analysis.is_minimal.or(is_minimal);
        if let Some(nutrients) = nutrients {
            analysis.fr = nutrients;
        }
    }

    Ok(analysis)
}

type GuaranteedBlock = (Option<String>, Option<bool>, Option<Vec<ValueEntry>>);

fn guaranteed_block(key: &str, block: &Map<String, Value>) -> Result<GuaranteedBlock> {
    let title = form::text_value(&format!("{key}.title"), block.get("title"))?;
    let is_minimal = match block.get("is_minimal") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(other) => {
            return Err(MetadataError::invalid(
                format!("{key}.is_minimal"),
                format!("expected a boolean, found {}", form::kind_of(other)),
            ));
        }
    };
    let nutrients = match block.get("nutrients") {
        None => None,
        Some(items) => {
            let path = format!("{key}.nutrients");
            Some(value_entries(&path, form::list_value(&path, Some(items))?)?)
        }
    };
    Ok((title, is_minimal, nutrients))
}
