//! Sorting and CSV export of the niche table

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{CompetitionLevel, Niche, Record};

/// File name offered for CSV downloads
pub const CSV_FILE_NAME: &str = "youtube_niche_analysis.csv";

const CSV_HEADERS: [&str; 6] = [
    "Rank",
    "Niche",
    "Growth Rate",
    "Competition",
    "Revenue Potential",
    "Trend",
];

/// Niche table ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Up-trending first, then by growth
    #[default]
    Trending,
    /// Growth rate, highest first
    Growth,
    /// Competition level, lowest first; unknown labels last
    Competition,
    /// Revenue potential, highest first
    Revenue,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Growth => "growth",
            Self::Competition => "competition",
            Self::Revenue => "revenue",
        }
    }

    fn compare(&self, a: &Niche, b: &Niche) -> Ordering {
        match self {
            Self::Trending => b
                .is_trending_up()
                .cmp(&a.is_trending_up())
                .then_with(|| b.growth_rate.total_cmp(&a.growth_rate)),
            Self::Growth => b.growth_rate.total_cmp(&a.growth_rate),
            Self::Competition => CompetitionLevel::rank(a.competition_level())
                .cmp(&CompetitionLevel::rank(b.competition_level())),
            Self::Revenue => b.revenue_potential.total_cmp(&a.revenue_potential),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected trending, growth, competition or revenue)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(Self::Trending),
            "growth" => Ok(Self::Growth),
            "competition" => Ok(Self::Competition),
            "revenue" => Ok(Self::Revenue),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Sort niches in place; ties keep their store order
pub fn sort_niches(niches: &mut [Record<Niche>], key: SortKey) {
    niches.sort_by(|a, b| key.compare(a, b));
}

/// "+24.8%" for positive growth, "-2.4%" for negative, "0%" for none
pub fn format_growth(rate: f64) -> String {
    if rate > 0.0 {
        format!("+{rate}%")
    } else {
        format!("{rate}%")
    }
}

/// "$14.20 CPM"
pub fn format_revenue(cpm: f64) -> String {
    format!("${cpm:.2} CPM")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render niches as CSV, ranked in the given order
pub fn niches_to_csv(niches: &[Record<Niche>]) -> String {
    let mut lines = Vec::with_capacity(niches.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for (index, niche) in niches.iter().enumerate() {
        let row = [
            (index + 1).to_string(),
            niche.name.clone(),
            format_growth(niche.growth_rate),
            niche.competition.clone(),
            format_revenue(niche.revenue_potential),
            niche.trend.clone(),
        ];
        lines.push(
            row.iter()
                .map(|field| csv_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}
