//! Shapes of the JSON documents the model is asked to produce
//!
//! Every field is optional here. Missing or blank values are rejected later
//! by [`crate::analysis::validate`], which reports the exact field path.

use serde::{Deserialize, Serialize};

/// Full niche analysis document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NicheAnalysis {
    pub niches: Option<Vec<NicheDraft>>,
    pub insights: Option<InsightDraft>,
    pub monetization: Option<MonetizationDraft>,
    pub recommendations: Option<Vec<RecommendationDraft>>,
    pub metrics: Option<MetricsDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NicheDraft {
    pub name: Option<String>,
    pub growth_rate: Option<f64>,
    pub competition: Option<String>,
    pub revenue_potential: Option<f64>,
    pub trend: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightDraft {
    pub least_competitive: Option<String>,
    pub most_competitive: Option<String>,
    pub best_entry_point: Option<String>,
    pub fastest_growing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonetizationDraft {
    #[serde(rename = "highestCPM")]
    pub highest_cpm: Option<String>,
    #[serde(rename = "lowestCPM")]
    pub lowest_cpm: Option<String>,
    pub best_sponsorship: Option<String>,
    pub best_long_term: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsDraft {
    pub top_growing_niche: Option<String>,
    pub top_growing_percentage: Option<f64>,
    pub most_profitable_niche: Option<String>,
    #[serde(rename = "mostProfitableCPM")]
    pub most_profitable_cpm: Option<f64>,
    pub lowest_competition_niche: Option<String>,
    pub lowest_competition_percentage: Option<f64>,
}

/// Trending document: `categories[i]` pairs with `percentages[i]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingReport {
    pub categories: Option<Vec<String>>,
    pub percentages: Option<Vec<f64>>,
}
