use crate::fertiscan::metadata::model::{GuaranteedAnalysis, Inspection, SubLabel};

/// Right-pads the shorter list with default entries so both have the same
/// length. Existing entries keep their position and content.
pub fn pad_to_match<T: Default>(en: &mut Vec<T>, fr: &mut Vec<T>) {
    let len = en.len().max(fr.len());
    en.resize_with(len, T::default);
    fr.resize_with(len, T::default);
}

/// Pads the English and French lines of a sub-label with empty strings.
pub fn align_sub_label(sub_label: &mut SubLabel) {
    pad_to_match(&mut sub_label.en, &mut sub_label.fr);
}

/// Pads the guaranteed analysis readings with empty entries.
pub fn align_guaranteed_analysis(analysis: &mut GuaranteedAnalysis) {
    pad_to_match(&mut analysis.en, &mut analysis.fr);
}

/// Aligns every positional bilingual pair of an exported inspection.
pub fn align_inspection(inspection: &mut Inspection) {
    align_sub_label(&mut inspection.cautions);
    align_sub_label(&mut inspection.instructions);
    align_sub_label(&mut inspection.first_aid);
    align_guaranteed_analysis(&mut inspection.guaranteed_analysis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fertiscan::metadata::model::ValueEntry;

    fn sub_label(en: &[&str], fr: &[&str]) -> SubLabel {
        SubLabel {
            en: en.iter().map(|line| line.to_string()).collect(),
            fr: fr.iter().map(|line| line.to_string()).collect(),
        }
    }

    #[test]
    fn pads_french_when_english_is_longer() {
        let mut cautions = sub_label(&["Warning 1", "Warning 2", "Warning 3"], &["Avertissement 1"]);
        align_sub_label(&mut cautions);
        assert_eq!(cautions.en, vec!["Warning 1", "Warning 2", "Warning 3"]);
        assert_eq!(cautions.fr, vec!["Avertissement 1", "", ""]);
    }

    #[test]
    fn pads_english_when_french_is_longer() {
        let mut cautions = sub_label(&["Warning 1"], &["Un", "Deux", "Trois"]);
        align_sub_label(&mut cautions);
        assert_eq!(cautions.en, vec!["Warning 1", "", ""]);
        assert_eq!(cautions.fr, vec!["Un", "Deux", "Trois"]);
    }

    #[test]
    fn keeps_empty_and_equal_lists_untouched() {
        let mut empty = SubLabel::default();
        align_sub_label(&mut empty);
        assert_eq!(empty, SubLabel::default());

        let mut equal = sub_label(&["one", ""], &["un", "deux"]);
        align_sub_label(&mut equal);
        assert_eq!(equal, sub_label(&["one", ""], &["un", "deux"]));
    }

    #[test]
    fn pads_guaranteed_analysis_with_empty_readings() {
        let mut analysis = GuaranteedAnalysis {
            en: vec![ValueEntry {
                value: Some(20.0),
                unit: Some("%".into()),
                name: Some("Total Nitrogen".into()),
                edited: false,
            }],
            ..GuaranteedAnalysis::default()
        };
        align_guaranteed_analysis(&mut analysis);
        assert_eq!(analysis.fr, vec![ValueEntry::default()]);
        assert_eq!(analysis.en.len(), 1);
    }
}
