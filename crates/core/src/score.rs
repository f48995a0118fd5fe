//! Heuristic eco-grade scoring
//!
//! A deterministic grade computed from carbon output, recyclability,
//! shipping distance, and weight via a weighted average of four 0-10
//! sub-scores. Pure function of its inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal eco grade, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcoGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl EcoGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }

    /// Parse a grade label, accepting only the canonical seven-value set.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    /// All grades, best to worst.
    pub fn all() -> [EcoGrade; 7] {
        [
            Self::APlus,
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
        ]
    }

    /// Emoji used alongside the grade in responses.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::APlus => "\u{1F30D}",
            Self::A => "\u{1F33F}",
            Self::B => "\u{1F343}",
            Self::C => "\u{1F331}",
            Self::D => "\u{26A0}\u{FE0F}",
            Self::E => "\u{274C}",
            Self::F => "\u{1F480}",
        }
    }
}

impl fmt::Display for EcoGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recyclability sub-score.
///
/// Low maps to 2, Medium to 6, High to 10. A recognized-but-unmapped label
/// scores 5; a missing or empty label is treated as Medium and scores 6.
pub fn recycle_score(recyclability: Option<&str>) -> f64 {
    let label = match recyclability {
        Some(r) if !r.is_empty() => r,
        _ => "Medium",
    };
    match label {
        "Low" => 2.0,
        "Medium" => 6.0,
        "High" => 10.0,
        _ => 5.0,
    }
}

/// Blend carbon, weight, distance, and recyclability into an [`EcoGrade`].
///
/// Each sub-score is clamped at zero, and the four are averaged. Threshold
/// bands are inclusive lower bounds. The table skips straight from D to F;
/// grade E exists in the vocabulary but is never produced here.
pub fn calculate_eco_score(
    carbon_kg: f64,
    recyclability: Option<&str>,
    distance_km: f64,
    weight_kg: f64,
) -> EcoGrade {
    let carbon_score = (10.0 - carbon_kg * 5.0).max(0.0);
    let weight_score = (10.0 - weight_kg * 2.0).max(0.0);
    let distance_score = (10.0 - distance_km / 1000.0).max(0.0);
    let recycle = recycle_score(recyclability);

    let total = (carbon_score + weight_score + distance_score + recycle) / 4.0;

    if total >= 9.0 {
        EcoGrade::APlus
    } else if total >= 8.0 {
        EcoGrade::A
    } else if total >= 6.5 {
        EcoGrade::B
    } else if total >= 5.0 {
        EcoGrade::C
    } else if total >= 3.5 {
        EcoGrade::D
    } else {
        EcoGrade::F
    }
}
