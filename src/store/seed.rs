//! Sample data loaded into a fresh store

use crate::models::{
    AnalysisBatch, MonetizationInsight, Niche, NicheInsight, NicheMetrics, Recommendation,
    TrendingDatum, COMPETITION_CATEGORY,
};

fn niche(name: &str, growth_rate: f64, competition: &str, revenue_potential: f64, trend: &str) -> Niche {
    Niche {
        name: name.to_string(),
        growth_rate,
        competition: competition.to_string(),
        revenue_potential,
        trend: trend.to_string(),
    }
}

/// Dashboard contents before the first analysis run
pub fn sample_batch() -> AnalysisBatch {
    let niches = vec![
        niche("Gaming Commentary", 24.8, "High", 14.2, "up"),
        niche("Finance Education", 22.1, "Medium", 18.4, "up"),
        niche("Tech Reviews", 19.7, "High", 16.3, "up"),
        niche("Fitness & Workout", 17.5, "Medium", 12.8, "up"),
        niche("Science Experiments", 16.4, "Low", 10.2, "up"),
        niche("Home DIY", 15.2, "Medium", 11.5, "up"),
        niche("Cooking Tutorials", 12.8, "High", 13.4, "up"),
        niche("Educational Animation", 11.2, "Low", 9.8, "up"),
        niche("Product Unboxing", -2.4, "High", 15.6, "down"),
        niche("Vlogging", -3.8, "Very High", 10.9, "down"),
    ];

    let recommendations = vec![
        Recommendation {
            title: "Gaming Commentary + Educational Content".to_string(),
            description: "Our AI analysis suggests combining gaming commentary with educational \
                elements could create a unique niche with high growth potential and moderate \
                competition. Educational gaming content has 32% higher retention than pure \
                entertainment gaming."
                .to_string(),
        },
        Recommendation {
            title: "Science Experiments with DIY Elements".to_string(),
            description: "There's significant opportunity in creating science content that \
                includes DIY components. Our analysis shows this combination has 74% less \
                competition than mainstream science channels while maintaining strong \
                monetization potential."
                .to_string(),
        },
    ];

    let trending = [
        ("Tech", 65.0),
        ("Gaming", 85.0),
        ("DIY", 45.0),
        ("Finance", 90.0),
        ("Fitness", 75.0),
        ("Food", 60.0),
        ("Travel", 80.0),
        ("Beauty", 70.0),
        ("Education", 95.0),
        ("Music", 50.0),
    ]
    .into_iter()
    .map(|(category, percentage)| TrendingDatum {
        category: category.to_string(),
        percentage,
    })
    .collect();

    AnalysisBatch {
        niches,
        niche_insight: NicheInsight {
            category: COMPETITION_CATEGORY.to_string(),
            least_competitive: "Science Experiments".to_string(),
            most_competitive: "Vlogging".to_string(),
            best_entry_point: "Educational Animation".to_string(),
            fastest_growing: "Gaming Commentary".to_string(),
        },
        monetization_insight: MonetizationInsight {
            highest_cpm: "Finance Education ($18.40)".to_string(),
            lowest_cpm: "Educational Animation ($9.80)".to_string(),
            best_sponsorship: "Tech Reviews".to_string(),
            best_long_term: "Finance Education".to_string(),
        },
        recommendations,
        metrics: NicheMetrics {
            top_growing_niche: "Gaming Commentary".to_string(),
            top_growing_percentage: 24.8,
            most_profitable_niche: "Finance Education".to_string(),
            most_profitable_cpm: 18.4,
            lowest_competition_niche: "Science Experiments".to_string(),
            lowest_competition_percentage: 74.0,
        },
        trending,
    }
}
