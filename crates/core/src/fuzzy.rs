//! Fuzzy label matching
//!
//! Maps noisy free-text material and origin strings onto a small canonical
//! vocabulary by case-insensitive substring containment. Labels are checked
//! in the fixed order below and the first match wins; there is no scoring or
//! ranking of candidates, so results are reproducible. Input that matches no
//! label is returned unchanged — defaulting is the normalizer's job.

/// Canonical materials and the substrings that indicate them, in match order
static MATERIAL_KEYWORDS: &[(&str, &[&str])] = &[
    ("Plastic", &["plastic", "plastics"]),
    ("Glass", &["glass"]),
    ("Aluminium", &["aluminium", "aluminum"]),
    ("Steel", &["steel"]),
    ("Paper", &["paper", "papers"]),
    ("Cardboard", &["cardboard", "corrugated"]),
];

/// Canonical origins and the substrings that indicate them, in match order
static ORIGIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("China", &["china"]),
    ("UK", &["uk", "united kingdom"]),
    ("USA", &["usa", "united states", "america"]),
    ("Germany", &["germany"]),
    ("France", &["france"]),
    ("Italy", &["italy"]),
];

fn first_match(text: &str, table: &[(&'static str, &[&'static str])]) -> Option<&'static str> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(label, _)| *label)
}

/// Canonicalize a free-text material description.
pub fn fuzzy_match_material(material: &str) -> String {
    first_match(material, MATERIAL_KEYWORDS)
        .map(str::to_string)
        .unwrap_or_else(|| material.to_string())
}

/// Canonicalize a free-text origin description.
pub fn fuzzy_match_origin(origin: &str) -> String {
    first_match(origin, ORIGIN_KEYWORDS)
        .map(str::to_string)
        .unwrap_or_else(|| origin.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_substring_match() {
        assert_eq!(fuzzy_match_material("Recycled PLASTICS bottle"), "Plastic");
        assert_eq!(fuzzy_match_material("aluminum can"), "Aluminium");
        assert_eq!(fuzzy_match_material("Corrugated box"), "Cardboard");
    }

    #[test]
    fn test_unmatched_material_unchanged() {
        assert_eq!(fuzzy_match_material("wood"), "wood");
        assert_eq!(fuzzy_match_material("Bamboo"), "Bamboo");
    }

    #[test]
    fn test_origin_match() {
        assert_eq!(fuzzy_match_origin("Made in CHINA"), "China");
        assert_eq!(fuzzy_match_origin("united states of america"), "USA");
        assert_eq!(fuzzy_match_origin("Usa"), "USA");
    }

    #[test]
    fn test_unmatched_origin_unchanged() {
        assert_eq!(fuzzy_match_origin("Japan"), "Japan");
    }

    #[test]
    fn test_first_match_wins() {
        // "plastic" is checked before "glass"; a string mentioning both
        // resolves to the earlier label
        assert_eq!(fuzzy_match_material("plastic and glass composite"), "Plastic");
    }
}
