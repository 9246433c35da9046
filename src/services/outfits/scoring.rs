//! Multi-factor scoring of outfit candidates.
//!
//! Every factor yields a credit in `0.0..=1.0`; the outfit score is the
//! weighted sum of those credits on a 0-100 scale.

use std::collections::HashSet;

use crate::models::{RecommendationCriteria, Season, WardrobeItem};

pub const SEASON_WEIGHT: f64 = 30.0;
pub const COLOR_WEIGHT: f64 = 25.0;
pub const STYLE_WEIGHT: f64 = 25.0;
pub const OCCASION_WEIGHT: f64 = 20.0;

/// Credit given for a factor the caller did not constrain
pub const NEUTRAL_CREDIT: f64 = 0.5;

/// Broad color groupings used for partial harmony credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Neutral,
    Warm,
    Cool,
    Earth,
}

impl ColorFamily {
    /// Classifies a color name, looking at each word so "light blue" is cool
    pub fn of(color: &str) -> Option<Self> {
        let color = color.trim().to_lowercase();
        std::iter::once(color.as_str())
            .chain(color.split(|c: char| c.is_whitespace() || c == '-'))
            .find_map(Self::of_word)
    }

    fn of_word(word: &str) -> Option<Self> {
        match word {
            "black" | "white" | "grey" | "gray" | "beige" | "cream" | "ivory" | "navy" | "tan"
            | "khaki" | "denim" | "charcoal" | "camel" => Some(ColorFamily::Neutral),
            "red" | "orange" | "yellow" | "pink" | "coral" | "burgundy" | "maroon" | "gold"
            | "mustard" | "peach" => Some(ColorFamily::Warm),
            "blue" | "green" | "purple" | "teal" | "turquoise" | "lavender" | "mint" | "silver"
            | "indigo" => Some(ColorFamily::Cool),
            "brown" | "olive" | "rust" | "terracotta" | "sage" | "chocolate" => {
                Some(ColorFamily::Earth)
            }
            _ => None,
        }
    }
}

/// Style tags considered appropriate for an occasion
pub fn occasion_styles(occasion: &str) -> Option<&'static [&'static str]> {
    match occasion.trim().to_lowercase().as_str() {
        "business" | "work" | "office" | "interview" => {
            Some(&["formal", "business-casual", "business", "smart-casual"][..])
        }
        "formal" | "wedding" | "gala" => Some(&["formal", "elegant", "black-tie"][..]),
        "casual" | "weekend" | "everyday" => Some(&["casual", "streetwear", "sporty", "relaxed"][..]),
        "party" | "night-out" | "date" => Some(&["party", "elegant", "trendy", "chic"][..]),
        "sport" | "gym" | "workout" => Some(&["sporty", "athletic", "activewear"][..]),
        _ => None,
    }
}

/// Criteria normalized once per request
#[derive(Debug)]
pub struct PreparedCriteria {
    season: Option<Season>,
    occasion: Option<(String, Option<&'static [&'static str]>)>,
    styles: HashSet<String>,
    colors: HashSet<String>,
    color_families: HashSet<ColorFamily>,
}

impl PreparedCriteria {
    pub fn new(criteria: &RecommendationCriteria) -> Self {
        let normalize = |values: &[String]| -> HashSet<String> {
            values
                .iter()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect()
        };

        let colors = normalize(&criteria.color_scheme);
        let color_families = colors.iter().filter_map(|c| ColorFamily::of(c)).collect();

        let occasion = criteria
            .occasion
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                let styles = occasion_styles(o);
                if styles.is_none() {
                    tracing::debug!(occasion = %o, "Unknown occasion, scoring it as neutral");
                }
                (o.to_lowercase(), styles)
            });

        Self {
            season: criteria.effective_season(),
            occasion,
            styles: normalize(&criteria.style_preference),
            colors,
            color_families,
        }
    }

    pub fn season(&self) -> Option<Season> {
        self.season
    }
}

/// Per-factor credits for one outfit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub season: f64,
    pub color: f64,
    pub style: f64,
    pub occasion: f64,
    pub matched: Vec<String>,
}

impl ScoreBreakdown {
    /// Weighted total on a 0-100 scale, rounded to 2 decimals
    pub fn total(&self) -> f64 {
        let raw = self.season * SEASON_WEIGHT
            + self.color * COLOR_WEIGHT
            + self.style * STYLE_WEIGHT
            + self.occasion * OCCASION_WEIGHT;
        (raw * 100.0).round() / 100.0
    }
}

/// Scores an outfit against the prepared criteria
pub fn score_outfit(items: &[&WardrobeItem], criteria: &PreparedCriteria) -> ScoreBreakdown {
    let mut matched = Vec::new();

    let season = season_credit(items, criteria, &mut matched);
    let color = color_credit(items, criteria, &mut matched);
    let style = style_credit(items, criteria, &mut matched);
    let occasion = occasion_credit(items, criteria, &mut matched);

    ScoreBreakdown {
        season,
        color,
        style,
        occasion,
        matched,
    }
}

fn season_credit(
    items: &[&WardrobeItem],
    criteria: &PreparedCriteria,
    matched: &mut Vec<String>,
) -> f64 {
    let Some(season) = criteria.season else {
        return NEUTRAL_CREDIT;
    };

    if items.iter().all(|item| item.fits_season(season)) {
        matched.push(format!("All items suit {}", season));
        1.0
    } else {
        0.0
    }
}

fn color_credit(
    items: &[&WardrobeItem],
    criteria: &PreparedCriteria,
    matched: &mut Vec<String>,
) -> f64 {
    if criteria.colors.is_empty() {
        return 1.0;
    }

    let colors: Vec<String> = items.iter().map(|item| item.normalized_color()).collect();

    if colors.iter().all(|c| criteria.colors.contains(c)) {
        matched.push("Colors match your scheme".to_string());
        return 1.0;
    }

    let harmonizing = colors
        .iter()
        .filter(|c| {
            criteria.colors.contains(*c)
                || match ColorFamily::of(c) {
                    Some(ColorFamily::Neutral) => true,
                    Some(family) => criteria.color_families.contains(&family),
                    None => false,
                }
        })
        .count();

    if harmonizing > 0 {
        matched.push("Colors harmonize with your scheme".to_string());
    }

    0.5 * harmonizing as f64 / colors.len() as f64
}

fn style_credit(
    items: &[&WardrobeItem],
    criteria: &PreparedCriteria,
    matched: &mut Vec<String>,
) -> f64 {
    if criteria.styles.is_empty() {
        return 1.0;
    }

    if items
        .iter()
        .all(|item| criteria.styles.contains(&item.normalized_style()))
    {
        matched.push("Matches your preferred style".to_string());
        1.0
    } else {
        0.0
    }
}

fn occasion_credit(
    items: &[&WardrobeItem],
    criteria: &PreparedCriteria,
    matched: &mut Vec<String>,
) -> f64 {
    let Some((occasion, Some(allowed))) = &criteria.occasion else {
        return NEUTRAL_CREDIT;
    };

    let fitting = items
        .iter()
        .filter(|item| {
            let style = item.normalized_style();
            allowed.iter().any(|allowed| *allowed == style)
        })
        .count();
    let credit = fitting as f64 / items.len() as f64;

    if fitting == items.len() {
        matched.push(format!("Appropriate for {}", occasion));
    } else if fitting > 0 {
        matched.push(format!("Partly suited to {}", occasion));
    }

    credit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, WeatherReading};
    use chrono::Utc;
    use uuid::Uuid;

    fn item(category: Category, color: &str, style: &str, season: Option<Season>) -> WardrobeItem {
        WardrobeItem {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            category,
            color: color.to_string(),
            style: style.to_string(),
            season,
            material: None,
            last_worn_at: None,
            wear_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_color_family_reads_compound_names() {
        assert_eq!(ColorFamily::of("Light Blue"), Some(ColorFamily::Cool));
        assert_eq!(ColorFamily::of("navy"), Some(ColorFamily::Neutral));
        assert_eq!(ColorFamily::of("burnt-orange"), Some(ColorFamily::Warm));
        assert_eq!(ColorFamily::of("chartreuse"), None);
    }

    #[test]
    fn test_unconstrained_outfit_gets_neutral_score() {
        let top = item(Category::Top, "blue", "casual", None);
        let bottom = item(Category::Bottom, "white", "casual", None);
        let criteria = PreparedCriteria::new(&RecommendationCriteria::default());

        let breakdown = score_outfit(&[&top, &bottom], &criteria);

        // 0.5*30 + 1*25 + 1*25 + 0.5*20
        assert_eq!(breakdown.total(), 75.0);
        assert!(breakdown.matched.is_empty());
    }

    #[test]
    fn test_season_full_credit_and_mismatch() {
        let top = item(Category::Top, "blue", "casual", Some(Season::Summer));
        let bottom = item(Category::Bottom, "white", "casual", Some(Season::All));
        let coat = item(Category::Outerwear, "black", "casual", Some(Season::Winter));
        let criteria = PreparedCriteria::new(&RecommendationCriteria {
            season: Some(Season::Summer),
            ..Default::default()
        });

        let fits = score_outfit(&[&top, &bottom], &criteria);
        assert_eq!(fits.season, 1.0);
        assert!(fits.matched.contains(&"All items suit summer".to_string()));

        let clashes = score_outfit(&[&top, &bottom, &coat], &criteria);
        assert_eq!(clashes.season, 0.0);
    }

    #[test]
    fn test_season_from_weather() {
        let top = item(Category::Top, "blue", "casual", Some(Season::Winter));
        let bottom = item(Category::Bottom, "black", "casual", Some(Season::Winter));
        let criteria = PreparedCriteria::new(&RecommendationCriteria {
            weather: Some(WeatherReading {
                temperature_c: -3.0,
                condition: Some("Snow".to_string()),
            }),
            ..Default::default()
        });

        assert_eq!(criteria.season(), Some(Season::Winter));
        assert_eq!(score_outfit(&[&top, &bottom], &criteria).season, 1.0);
    }

    #[test]
    fn test_color_scheme_partial_credit() {
        let top = item(Category::Top, "red", "casual", None);
        let bottom = item(Category::Bottom, "black", "casual", None);
        let shoes = item(Category::Shoes, "green", "casual", None);
        let criteria = PreparedCriteria::new(&RecommendationCriteria {
            color_scheme: vec!["Coral".to_string()],
            ..Default::default()
        });

        let breakdown = score_outfit(&[&top, &bottom, &shoes], &criteria);

        // red shares coral's warm family, black is neutral, green matches nothing
        assert!((breakdown.color - 0.5 * 2.0 / 3.0).abs() < 1e-9);
        assert!(breakdown
            .matched
            .contains(&"Colors harmonize with your scheme".to_string()));
    }

    #[test]
    fn test_color_scheme_exact_match() {
        let top = item(Category::Top, "Navy", "casual", None);
        let bottom = item(Category::Bottom, "white", "casual", None);
        let criteria = PreparedCriteria::new(&RecommendationCriteria {
            color_scheme: vec!["navy".to_string(), "white".to_string()],
            ..Default::default()
        });

        assert_eq!(score_outfit(&[&top, &bottom], &criteria).color, 1.0);
    }

    #[test]
    fn test_style_preference_is_all_or_nothing() {
        let top = item(Category::Top, "blue", "Casual", None);
        let bottom = item(Category::Bottom, "white", "formal", None);
        let criteria = PreparedCriteria::new(&RecommendationCriteria {
            style_preference: vec!["casual".to_string()],
            ..Default::default()
        });

        assert_eq!(score_outfit(&[&top], &criteria).style, 1.0);
        assert_eq!(score_outfit(&[&top, &bottom], &criteria).style, 0.0);
    }

    #[test]
    fn test_occasion_fraction_and_unknown_occasion() {
        let top = item(Category::Top, "white", "formal", None);
        let bottom = item(Category::Bottom, "black", "casual", None);

        let business = PreparedCriteria::new(&RecommendationCriteria {
            occasion: Some("Business".to_string()),
            ..Default::default()
        });
        let breakdown = score_outfit(&[&top, &bottom], &business);
        assert_eq!(breakdown.occasion, 0.5);
        assert!(breakdown
            .matched
            .contains(&"Partly suited to business".to_string()));

        let picnic = PreparedCriteria::new(&RecommendationCriteria {
            occasion: Some("picnic".to_string()),
            ..Default::default()
        });
        assert_eq!(score_outfit(&[&top, &bottom], &picnic).occasion, NEUTRAL_CREDIT);
    }

    #[test]
    fn test_occasion_styles_lookup() {
        assert!(occasion_styles("business")
            .unwrap()
            .contains(&"business-casual"));
        assert!(occasion_styles("GYM").unwrap().contains(&"athletic"));
        assert!(occasion_styles("picnic").is_none());
    }
}
