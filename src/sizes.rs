use serde::{Deserialize, Serialize};

/// Sentinel used wherever the model should infer a value from the photos.
pub const ANALYZE_FROM_IMAGE: &str = "Analyze from image";

/// Size labels offered by the listing tool, ascending by age.
pub const SIZE_OPTIONS: [&str; 19] = [
    "0-6 Months", "6-12 Months", "12-18 Months", "18-24 Months",
    "1-2 Years", "2-3 Years", "3-4 Years", "4-5 Years", "5-6 Years",
    "6-7 Years", "7-8 Years", "8-9 Years", "9-10 Years", "10-11 Years",
    "11-12 Years", "12-13 Years", "13-14 Years", "14-15 Years", "Free Size",
];

pub const FABRIC_OPTIONS: [&str; 12] = [
    "Cotton", "Silk", "Linen", "Polyester", "Rayon", "Satin", "Denim", "Velvet",
    "Chiffon", "Wool", "Nylon", "Spandex",
];

pub const LENGTH_OPTIONS: [&str; 8] = [
    "Mini", "Knee Length", "Midi", "Maxi", "Full Length", "Ankle Length", "Cropped", "Regular",
];

pub const NECK_STYLES: [&str; 11] = [
    "Round Neck", "V-Neck", "Crew Neck", "Polo", "Turtle Neck", "Mandarin Collar",
    "Boat Neck", "Halter Neck", "Off-Shoulder", "Sweetheart", "Square Neck",
];

/// Inclusive slice of `catalog` between two endpoints, in catalog order.
///
/// The endpoints are unordered. An empty or unknown endpoint yields an empty list.
pub fn resolve_range<S: AsRef<str>>(catalog: &[S], start: &str, end: &str) -> Vec<String> {
    if start.is_empty() || end.is_empty() {
        return Vec::new();
    }
    let position = |label: &str| catalog.iter().position(|c| c.as_ref() == label);
    let (Some(a), Some(b)) = (position(start), position(end)) else {
        return Vec::new();
    };
    let (lo, hi) = (a.min(b), a.max(b));
    catalog[lo..=hi].iter().map(|s| s.as_ref().to_string()).collect()
}

/// First run of ASCII digits in a label, e.g. "10-11 Years" -> "10".
pub fn leading_number(label: &str) -> Option<&str> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let rest = &label[start..];
    let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    Some(&rest[..len])
}

pub fn age_tokens<S: AsRef<str>>(sizes: &[S]) -> Vec<String> {
    sizes
        .iter()
        .filter_map(|s| leading_number(s.as_ref()))
        .map(str::to_string)
        .collect()
}

/// Compact phrase used in listing titles, e.g. "1 to 9 Years".
pub fn age_range_phrase<S: AsRef<str>>(sizes: &[S]) -> String {
    let tokens = age_tokens(sizes);
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) if tokens.len() > 1 => format!("{first} to {last} Years"),
        _ => sizes
            .first()
            .map(|s| s.as_ref().to_string())
            .unwrap_or_else(|| ANALYZE_FROM_IMAGE.to_string()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeSelection {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Everything the listing prompt derives from a size selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    pub sizes: Vec<String>,
    pub age_tokens: Vec<String>,
    pub age_range: String,
}

impl SizeRange {
    pub fn resolve(start: &str, end: &str) -> Self {
        Self::from_sizes(resolve_range(&SIZE_OPTIONS, start, end))
    }

    pub fn from_sizes(sizes: Vec<String>) -> Self {
        Self {
            age_tokens: age_tokens(&sizes),
            age_range: age_range_phrase(&sizes),
            sizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_scenario_range() {
        let sizes = resolve_range(&SIZE_OPTIONS, "1-2 Years", "4-5 Years");
        assert_eq!(sizes, vec!["1-2 Years", "2-3 Years", "3-4 Years", "4-5 Years"]);
    }

    #[test]
    fn endpoint_order_does_not_matter() {
        for a in SIZE_OPTIONS {
            for b in SIZE_OPTIONS {
                assert_eq!(
                    resolve_range(&SIZE_OPTIONS, a, b),
                    resolve_range(&SIZE_OPTIONS, b, a),
                    "{a} / {b}"
                );
            }
        }
    }

    #[test]
    fn same_endpoint_yields_single_label() {
        for x in SIZE_OPTIONS {
            assert_eq!(resolve_range(&SIZE_OPTIONS, x, x), vec![x.to_string()]);
        }
    }

    #[test]
    fn unset_or_unknown_endpoint_yields_nothing() {
        assert!(resolve_range(&SIZE_OPTIONS, "", "4-5 Years").is_empty());
        assert!(resolve_range(&SIZE_OPTIONS, "4-5 Years", "").is_empty());
        assert!(resolve_range(&SIZE_OPTIONS, "XL", "4-5 Years").is_empty());
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let first = resolve_range(&SIZE_OPTIONS, "14-15 Years", "6-12 Months");
        let second = resolve_range(&SIZE_OPTIONS, "14-15 Years", "6-12 Months");
        assert_eq!(first, second);
        assert_eq!(first.len(), 17);
        assert_eq!(first.first().map(String::as_str), Some("6-12 Months"));
        assert_eq!(first.last().map(String::as_str), Some("14-15 Years"));
    }

    #[test]
    fn works_on_custom_catalogs() {
        let catalog = vec!["S".to_string(), "M".to_string(), "L".to_string()];
        assert_eq!(resolve_range(&catalog, "L", "M"), vec!["M", "L"]);
    }

    #[test]
    fn age_phrase_uses_first_and_last_numbers() {
        let sizes = ["0-6 Months", "6-12 Months", "1-2 Years"];
        assert_eq!(age_tokens(&sizes), vec!["0", "6", "1"]);
        assert_eq!(age_range_phrase(&sizes), "0 to 1 Years");
    }

    #[test]
    fn age_phrase_skips_labels_without_digits() {
        let sizes = ["13-14 Years", "14-15 Years", "Free Size"];
        assert_eq!(age_tokens(&sizes), vec!["13", "14"]);
        assert_eq!(age_range_phrase(&sizes), "13 to 14 Years");
    }

    #[test]
    fn age_phrase_falls_back() {
        assert_eq!(age_range_phrase(&["Free Size"]), "Free Size");
        assert_eq!(age_range_phrase(&["3-4 Years"]), "3-4 Years");
        assert_eq!(age_range_phrase::<&str>(&[]), ANALYZE_FROM_IMAGE);
    }

    #[test]
    fn size_range_bundles_derived_values() {
        let range = SizeRange::resolve("4-5 Years", "1-2 Years");
        assert_eq!(range.sizes.len(), 4);
        assert_eq!(range.age_tokens, vec!["1", "2", "3", "4"]);
        assert_eq!(range.age_range, "1 to 4 Years");
        assert!(SizeRange::resolve("", "1-2 Years").sizes.is_empty());
    }
}
