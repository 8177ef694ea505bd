//! Validation of AI output and API request bodies
//!
//! Turns the loosely-typed drafts into stored shapes. Text fields must be
//! present and non-blank, numbers must be present and finite.

use thiserror::Error;

use crate::llm::{
    InsightDraft, MetricsDraft, MonetizationDraft, NicheAnalysis, NicheDraft,
    RecommendationDraft, TrendingReport,
};
use crate::models::{
    AnalysisBatch, MonetizationInsight, Niche, NicheInsight, NicheMetrics, NicheUpdate,
    Recommendation, TrendingDatum, COMPETITION_CATEGORY,
};

/// A field that failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required")
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn text(value: Option<String>, field: &str) -> ValidationResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Some(_) => Err(ValidationError::new(field, "must not be blank")),
        None => Err(ValidationError::missing(field)),
    }
}

fn number(value: Option<f64>, field: &str) -> ValidationResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ValidationError::new(field, "must be a finite number")),
        None => Err(ValidationError::missing(field)),
    }
}

fn at(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Validate a niche draft; `prefix` locates it in the enclosing document
pub fn niche(draft: NicheDraft, prefix: &str) -> ValidationResult<Niche> {
    Ok(Niche {
        name: text(draft.name, &at(prefix, "name"))?,
        growth_rate: number(draft.growth_rate, &at(prefix, "growthRate"))?,
        competition: text(draft.competition, &at(prefix, "competition"))?,
        revenue_potential: number(draft.revenue_potential, &at(prefix, "revenuePotential"))?,
        trend: text(draft.trend, &at(prefix, "trend"))?,
    })
}

/// Validate the fields present in a partial update
pub fn niche_update(update: NicheUpdate) -> ValidationResult<NicheUpdate> {
    if update.is_empty() {
        return Err(ValidationError::new("body", "no fields to update"));
    }

    Ok(NicheUpdate {
        name: update.name.map(|v| text(Some(v), "name")).transpose()?,
        growth_rate: update
            .growth_rate
            .map(|v| number(Some(v), "growthRate"))
            .transpose()?,
        competition: update
            .competition
            .map(|v| text(Some(v), "competition"))
            .transpose()?,
        revenue_potential: update
            .revenue_potential
            .map(|v| number(Some(v), "revenuePotential"))
            .transpose()?,
        trend: update.trend.map(|v| text(Some(v), "trend")).transpose()?,
    })
}

fn niche_insight(draft: InsightDraft) -> ValidationResult<NicheInsight> {
    Ok(NicheInsight {
        category: COMPETITION_CATEGORY.to_string(),
        least_competitive: text(draft.least_competitive, "insights.leastCompetitive")?,
        most_competitive: text(draft.most_competitive, "insights.mostCompetitive")?,
        best_entry_point: text(draft.best_entry_point, "insights.bestEntryPoint")?,
        fastest_growing: text(draft.fastest_growing, "insights.fastestGrowing")?,
    })
}

fn monetization(draft: MonetizationDraft) -> ValidationResult<MonetizationInsight> {
    Ok(MonetizationInsight {
        highest_cpm: text(draft.highest_cpm, "monetization.highestCPM")?,
        lowest_cpm: text(draft.lowest_cpm, "monetization.lowestCPM")?,
        best_sponsorship: text(draft.best_sponsorship, "monetization.bestSponsorship")?,
        best_long_term: text(draft.best_long_term, "monetization.bestLongTerm")?,
    })
}

fn recommendation(draft: RecommendationDraft, index: usize) -> ValidationResult<Recommendation> {
    Ok(Recommendation {
        title: text(draft.title, &format!("recommendations[{index}].title"))?,
        description: text(draft.description, &format!("recommendations[{index}].description"))?,
    })
}

fn metrics(draft: MetricsDraft) -> ValidationResult<NicheMetrics> {
    Ok(NicheMetrics {
        top_growing_niche: text(draft.top_growing_niche, "metrics.topGrowingNiche")?,
        top_growing_percentage: number(draft.top_growing_percentage, "metrics.topGrowingPercentage")?,
        most_profitable_niche: text(draft.most_profitable_niche, "metrics.mostProfitableNiche")?,
        most_profitable_cpm: number(draft.most_profitable_cpm, "metrics.mostProfitableCPM")?,
        lowest_competition_niche: text(
            draft.lowest_competition_niche,
            "metrics.lowestCompetitionNiche",
        )?,
        lowest_competition_percentage: number(
            draft.lowest_competition_percentage,
            "metrics.lowestCompetitionPercentage",
        )?,
    })
}

/// Pair trending categories with their percentages
pub fn trending(report: TrendingReport) -> ValidationResult<Vec<TrendingDatum>> {
    let categories = report
        .categories
        .ok_or_else(|| ValidationError::missing("categories"))?;
    let percentages = report
        .percentages
        .ok_or_else(|| ValidationError::missing("percentages"))?;

    if categories.len() != percentages.len() {
        return Err(ValidationError::new(
            "percentages",
            format!(
                "expected {} values to match categories, got {}",
                categories.len(),
                percentages.len()
            ),
        ));
    }

    categories
        .into_iter()
        .zip(percentages)
        .enumerate()
        .map(|(i, (category, percentage))| {
            Ok(TrendingDatum {
                category: text(Some(category), &format!("categories[{i}]"))?,
                percentage: number(Some(percentage), &format!("percentages[{i}]"))?,
            })
        })
        .collect()
}

/// Validate a complete analysis run
pub fn analysis(analysis: NicheAnalysis, report: TrendingReport) -> ValidationResult<AnalysisBatch> {
    let niches = analysis
        .niches
        .ok_or_else(|| ValidationError::missing("niches"))?
        .into_iter()
        .enumerate()
        .map(|(i, draft)| niche(draft, &format!("niches[{i}]")))
        .collect::<ValidationResult<Vec<_>>>()?;

    let recommendations = analysis
        .recommendations
        .ok_or_else(|| ValidationError::missing("recommendations"))?
        .into_iter()
        .enumerate()
        .map(|(i, draft)| recommendation(draft, i))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(AnalysisBatch {
        niches,
        niche_insight: niche_insight(
            analysis
                .insights
                .ok_or_else(|| ValidationError::missing("insights"))?,
        )?,
        monetization_insight: monetization(
            analysis
                .monetization
                .ok_or_else(|| ValidationError::missing("monetization"))?,
        )?,
        recommendations,
        metrics: metrics(
            analysis
                .metrics
                .ok_or_else(|| ValidationError::missing("metrics"))?,
        )?,
        trending: trending(report)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NicheDraft {
        NicheDraft {
            name: Some("AI Music Production".to_string()),
            growth_rate: Some(-2.5),
            competition: Some("Low".to_string()),
            revenue_potential: Some(9.8),
            trend: Some("down".to_string()),
        }
    }

    #[test]
    fn test_valid_niche() {
        let niche = niche(draft(), "").unwrap();
        assert_eq!(niche.name, "AI Music Production");
        assert_eq!(niche.growth_rate, -2.5);
    }

    #[test]
    fn test_missing_field_reports_path() {
        let mut d = draft();
        d.revenue_potential = None;
        let err = niche(d, "niches[2]").unwrap_err();
        assert_eq!(err.field, "niches[2].revenuePotential");
        assert_eq!(err.reason, "required");
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut d = draft();
        d.name = Some("   ".to_string());
        let err = niche(d, "").unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let mut d = draft();
        d.growth_rate = Some(f64::NAN);
        assert!(niche(d, "").is_err());
    }

    #[test]
    fn test_trending_pairs_by_index() {
        let data = trending(TrendingReport {
            categories: Some(vec!["AI Art".to_string(), "Prompt Engineering".to_string()]),
            percentages: Some(vec![88.0, 74.0]),
        })
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[1].category, "Prompt Engineering");
        assert_eq!(data[1].percentage, 74.0);
    }

    #[test]
    fn test_trending_length_mismatch() {
        let err = trending(TrendingReport {
            categories: Some(vec!["AI Art".to_string(), "AI Coding".to_string()]),
            percentages: Some(vec![88.0]),
        })
        .unwrap_err();
        assert_eq!(err.field, "percentages");
    }

    #[test]
    fn test_update_requires_a_field() {
        assert!(niche_update(NicheUpdate::default()).is_err());

        let update = niche_update(NicheUpdate {
            trend: Some(" up ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.trend.as_deref(), Some("up"));
    }

    #[test]
    fn test_analysis_requires_sections() {
        let err = analysis(NicheAnalysis::default(), TrendingReport::default()).unwrap_err();
        assert_eq!(err.field, "niches");
    }
}
