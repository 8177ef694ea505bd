// Core data structures for the niche dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A stored row: the insert shape plus the id and creation time the store assigns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: u64,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
}

impl<T> Record<T> {
    /// Wrap fields with an id, stamped with the current time
    pub fn new(id: u64, fields: T) -> Self {
        Self {
            id,
            fields,
            created_at: Utc::now(),
        }
    }

    /// Consume the record and return its fields
    pub fn into_fields(self) -> T {
        self.fields
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.fields
    }
}

impl<T> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.fields
    }
}

/// YouTube content niche
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Niche {
    pub name: String,
    /// Growth in percent, negative when shrinking
    pub growth_rate: f64,
    /// Free text, usually one of Low, Medium, High, Very High
    pub competition: String,
    /// CPM in USD
    pub revenue_potential: f64,
    /// "up" or "down"
    pub trend: String,
}

impl Niche {
    /// Whether the niche is trending upward
    pub fn is_trending_up(&self) -> bool {
        self.trend.trim().eq_ignore_ascii_case("up")
    }

    /// Parsed competition level, if it is one of the known labels
    pub fn competition_level(&self) -> Option<CompetitionLevel> {
        CompetitionLevel::parse(&self.competition)
    }

    /// Merge a partial update into this niche
    pub fn apply(&mut self, update: NicheUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(growth_rate) = update.growth_rate {
            self.growth_rate = growth_rate;
        }
        if let Some(competition) = update.competition {
            self.competition = competition;
        }
        if let Some(revenue_potential) = update.revenue_potential {
            self.revenue_potential = revenue_potential;
        }
        if let Some(trend) = update.trend {
            self.trend = trend;
        }
    }
}

/// Partial niche used by PATCH requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NicheUpdate {
    pub name: Option<String>,
    pub growth_rate: Option<f64>,
    pub competition: Option<String>,
    pub revenue_potential: Option<f64>,
    pub trend: Option<String>,
}

impl NicheUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Competition level ordering used for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl CompetitionLevel {
    /// Parse a label, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "very high" | "very_high" | "veryhigh" => Some(Self::VeryHigh),
            _ => None,
        }
    }

    /// Sort rank; unknown labels rank after every known level
    pub fn rank(level: Option<Self>) -> u8 {
        match level {
            Some(Self::Low) => 1,
            Some(Self::Medium) => 2,
            Some(Self::High) => 3,
            Some(Self::VeryHigh) => 4,
            None => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competitive summary across niches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheInsight {
    pub category: String,
    pub least_competitive: String,
    pub most_competitive: String,
    pub best_entry_point: String,
    pub fastest_growing: String,
}

/// Category assigned to insights produced by an analysis run
pub const COMPETITION_CATEGORY: &str = "competition";

/// Monetization summary across niches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetizationInsight {
    #[serde(rename = "highestCPM")]
    pub highest_cpm: String,
    #[serde(rename = "lowestCPM")]
    pub lowest_cpm: String,
    pub best_sponsorship: String,
    pub best_long_term: String,
}

/// Free-text suggestion from the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Headline numbers shown in the overview cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheMetrics {
    pub top_growing_niche: String,
    pub top_growing_percentage: f64,
    pub most_profitable_niche: String,
    #[serde(rename = "mostProfitableCPM")]
    pub most_profitable_cpm: f64,
    pub lowest_competition_niche: String,
    pub lowest_competition_percentage: f64,
}

/// Short-term popularity of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingDatum {
    pub category: String,
    pub percentage: f64,
}

/// Validated output of one analysis run, ready to be committed
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBatch {
    pub niches: Vec<Niche>,
    pub niche_insight: NicheInsight,
    pub monetization_insight: MonetizationInsight,
    pub recommendations: Vec<Recommendation>,
    pub metrics: NicheMetrics,
    pub trending: Vec<TrendingDatum>,
}

/// Records stored by an analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub niches: Vec<Record<Niche>>,
    #[serde(rename = "nicheInsights")]
    pub niche_insight: Record<NicheInsight>,
    #[serde(rename = "monetizationInsights")]
    pub monetization_insight: Record<MonetizationInsight>,
    pub recommendations: Vec<Record<Recommendation>>,
    #[serde(rename = "nicheMetrics")]
    pub metrics: Record<NicheMetrics>,
    #[serde(rename = "trendingData")]
    pub trending: Vec<Record<TrendingDatum>>,
}
