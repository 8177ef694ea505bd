//! Prompt text for the two analysis calls

pub const ANALYSIS_SYSTEM: &str = "You analyze YouTube content trends for AI-focused creators. \
You know how content categories grow, how crowded they are and how well they monetize. \
Answer with a single JSON object and nothing else.";

pub const ANALYSIS_USER: &str = r#"Analyze current YouTube niches centered on AI tools and techniques
(AI video editing, prompt engineering, text-to-image, AI music production, AI coding assistants and similar).

Return one JSON object with exactly these keys:

{
  "niches": [
    {
      "name": "niche name",
      "growthRate": 12.5,
      "competition": "Low | Medium | High | Very High",
      "revenuePotential": 11.2,
      "trend": "up | down"
    }
  ],
  "insights": {
    "leastCompetitive": "niche name",
    "mostCompetitive": "niche name",
    "bestEntryPoint": "niche name",
    "fastestGrowing": "niche name"
  },
  "monetization": {
    "highestCPM": "niche name ($amount)",
    "lowestCPM": "niche name ($amount)",
    "bestSponsorship": "niche name",
    "bestLongTerm": "strategy or niche"
  },
  "recommendations": [
    { "title": "niche combination", "description": "why it works" }
  ],
  "metrics": {
    "topGrowingNiche": "niche name",
    "topGrowingPercentage": 31.0,
    "mostProfitableNiche": "niche name",
    "mostProfitableCPM": 21.4,
    "lowestCompetitionNiche": "niche name",
    "lowestCompetitionPercentage": 68.0
  }
}

Rules:
- "niches" holds the top 10 niches; growthRate is a percentage and may be negative.
- revenuePotential and mostProfitableCPM are CPM values in USD.
- "recommendations" holds two unique niche combinations.
- lowestCompetitionPercentage expresses growth potential as a percentage."#;

pub const TRENDING_SYSTEM: &str = "You track YouTube performance of AI-related content categories. \
Answer with a single JSON object and nothing else.";

pub const TRENDING_USER: &str = r#"Produce popularity scores for the top 10 AI-focused YouTube content niches.

Return one JSON object:

{
  "categories": ["AI Video Editing", "Prompt Engineering"],
  "percentages": [88, 74]
}

Rules:
- categories and percentages have the same length; percentages[i] belongs to categories[i].
- Each percentage is a popularity score between 40 and 95."#;
