use serde::{Deserialize, Serialize};

use crate::fertiscan::metadata::error::{MetadataError, Result};

/// Codes shorter than this cannot hold three components and two dashes.
const NPK_MIN_LEN: usize = 5;

/// Nitrogen, phosphorus and potassium components of an NPK code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpkRatio {
    pub n: f64,
    pub p: f64,
    pub k: f64,
}

/// Raw value and unit read from a measurement such as `"12.5 kg"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueUnit {
    pub value: Option<String>,
    pub unit: Option<String>,
}

/// Parses an `N-P-K` code.
///
/// Absent, empty or too short codes yield `Ok(None)`: the label simply has no
/// usable ratio. Otherwise the code is split on `-` and the first three
/// segments must be decimal numbers; anything beyond the third is ignored.
pub fn parse_npk(npk: Option<&str>) -> Result<Option<NpkRatio>> {
    let Some(code) = npk else {
        return Ok(None);
    };
    if code.chars().count() < NPK_MIN_LEN {
        return Ok(None);
    }

    let mut segments = code.split('-');
    let mut components = [0.0_f64; 3];
    for component in &mut components {
        let segment = segments.next().ok_or_else(|| MetadataError::Npk {
            npk: code.to_string(),
            segment: String::new(),
        })?;
        *component = parse_npk_segment(segment).ok_or_else(|| MetadataError::Npk {
            npk: code.to_string(),
            segment: segment.to_string(),
        })?;
    }

    let [n, p, k] = components;
    Ok(Some(NpkRatio { n, p, k }))
}

fn parse_npk_segment(segment: &str) -> Option<f64> {
    let segment = segment.trim();
    let dots = segment.chars().filter(|ch| *ch == '.').count();
    let well_formed = !segment.is_empty()
        && dots <= 1
        && segment.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
        && segment.chars().any(|ch| ch.is_ascii_digit());
    if !well_formed {
        return None;
    }
    segment.parse::<f64>().ok()
}

/// Splits a measurement into its leading numeric text and the trailing unit.
///
/// The value is kept as text; digits, `.` and `,` belong to it. A string with
/// no unit is entirely value.
pub fn split_value_unit(value_unit: Option<&str>) -> ValueUnit {
    let Some(text) = value_unit else {
        return ValueUnit::default();
    };
    if text.chars().count() < 2 {
        return ValueUnit::default();
    }

    let boundary = text
        .char_indices()
        .find(|(_, ch)| !(ch.is_numeric() || *ch == '.' || *ch == ','))
        .map(|(index, _)| index);

    let (value, unit) = match boundary {
        Some(index) => text.split_at(index),
        None => (text, ""),
    };
    let unit = unit.trim();

    ValueUnit {
        value: (!value.is_empty()).then(|| value.to_string()),
        unit: (!unit.is_empty()).then(|| unit.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npk_absent_or_short_yields_nothing() {
        assert_eq!(parse_npk(None).expect("no code"), None);
        assert_eq!(parse_npk(Some("")).expect("empty code"), None);
        assert_eq!(parse_npk(Some("1-2")).expect("short code"), None);
    }

    #[test]
    fn npk_splits_three_components() {
        let ratio = parse_npk(Some("10-5-5")).expect("valid code");
        assert_eq!(
            ratio,
            Some(NpkRatio {
                n: 10.0,
                p: 5.0,
                k: 5.0
            })
        );

        let ratio = parse_npk(Some("20.5-0-10")).expect("decimal code");
        assert_eq!(ratio.map(|ratio| ratio.n), Some(20.5));
    }

    #[test]
    fn npk_ignores_extra_segments() {
        let ratio = parse_npk(Some("1-2-3-4")).expect("extra segment");
        assert_eq!(
            ratio,
            Some(NpkRatio {
                n: 1.0,
                p: 2.0,
                k: 3.0
            })
        );
    }

    #[test]
    fn npk_rejects_non_numeric_segments() {
        let err = parse_npk(Some("10-x-5")).expect_err("non-numeric segment");
        match err {
            MetadataError::Npk { npk, segment } => {
                assert_eq!(npk, "10-x-5");
                assert_eq!(segment, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn npk_rejects_missing_segments() {
        assert!(matches!(
            parse_npk(Some("invalid_npk")),
            Err(MetadataError::Npk { .. })
        ));
        assert!(matches!(
            parse_npk(Some("10-10")),
            Err(MetadataError::Npk { .. })
        ));
    }

    #[test]
    fn value_unit_splits_on_first_non_numeric_character() {
        assert_eq!(
            split_value_unit(Some("12.5 kg")),
            ValueUnit {
                value: Some("12.5".into()),
                unit: Some("kg".into())
            }
        );
        assert_eq!(
            split_value_unit(Some("1,5L")),
            ValueUnit {
                value: Some("1,5".into()),
                unit: Some("L".into())
            }
        );
    }

    #[test]
    fn value_unit_short_or_absent_is_empty() {
        assert_eq!(split_value_unit(None), ValueUnit::default());
        assert_eq!(split_value_unit(Some("")), ValueUnit::default());
        assert_eq!(split_value_unit(Some("x")), ValueUnit::default());
    }

    #[test]
    fn value_unit_without_unit_keeps_whole_value() {
        assert_eq!(
            split_value_unit(Some("250")),
            ValueUnit {
                value: Some("250".into()),
                unit: None
            }
        );
        assert_eq!(
            split_value_unit(Some("5    ")),
            ValueUnit {
                value: Some("5".into()),
                unit: None
            }
        );
        assert_eq!(
            split_value_unit(Some("kg")),
            ValueUnit {
                value: None,
                unit: Some("kg".into())
            }
        );
    }
}
