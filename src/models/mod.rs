use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

// ============================================================================
// Wardrobe Items
// ============================================================================

/// Functional category of a garment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Shoes,
    Outerwear,
    Accessory,
    Dress,
    /// Anything we cannot place in an outfit slot
    #[serde(other)]
    Unknown,
}

impl Category {
    /// Parses a stored category label, falling back to `Unknown`
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "top" | "tops" => Category::Top,
            "bottom" | "bottoms" => Category::Bottom,
            "shoes" | "shoe" => Category::Shoes,
            "outerwear" => Category::Outerwear,
            "accessory" | "accessories" => Category::Accessory,
            "dress" | "dresses" => Category::Dress,
            _ => Category::Unknown,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Shoes => "shoes",
            Category::Outerwear => "outerwear",
            Category::Accessory => "accessory",
            Category::Dress => "dress",
            Category::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Seasons a garment is suitable for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    #[serde(alias = "autumn")]
    Fall,
    Winter,
    All,
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            "all" => Ok(Season::All),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
            Season::All => "all",
        };
        write!(f, "{}", label)
    }
}

/// A single garment or accessory owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WardrobeItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub color: String,
    pub style: String,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub last_worn_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wear_count: i32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl WardrobeItem {
    /// Whether the item can take part in outfit composition
    pub fn is_usable(&self) -> bool {
        self.category != Category::Unknown && !self.color.trim().is_empty()
    }

    pub fn normalized_color(&self) -> String {
        self.color.trim().to_lowercase()
    }

    pub fn normalized_style(&self) -> String {
        self.style.trim().to_lowercase()
    }

    /// Items without a season tag are treated as wearable all year
    pub fn fits_season(&self, season: Season) -> bool {
        match self.season {
            None | Some(Season::All) => true,
            Some(own) => season == Season::All || own == season,
        }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// Current conditions at the user's location, resolved by a weather provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    #[serde(default)]
    pub condition: Option<String>,
}

impl WeatherReading {
    /// Translates the temperature into the season whose clothes suit it
    pub fn season(&self) -> Season {
        match self.temperature_c {
            t if t >= 24.0 => Season::Summer,
            t if t >= 15.0 => Season::Spring,
            t if t >= 5.0 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

/// Optional constraints that bias outfit selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendationCriteria {
    pub occasion: Option<String>,
    pub season: Option<Season>,
    pub weather: Option<WeatherReading>,
    pub style_preference: Vec<String>,
    pub color_scheme: Vec<String>,
}

impl RecommendationCriteria {
    /// Explicit season wins over one derived from the weather
    pub fn effective_season(&self) -> Option<Season> {
        self.season
            .or_else(|| self.weather.as_ref().map(WeatherReading::season))
    }
}

/// A generated, non-persisted outfit suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitCandidate {
    /// Item ids in slot order: base, bottom, outerwear, shoes, accessories
    pub item_ids: Vec<Uuid>,
    pub score: f64,
    pub matched_criteria: Vec<String>,
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub criteria: RecommendationCriteria,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request body for the weather-based recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct WeatherRecommendationRequest {
    pub user_id: Uuid,
    pub location: String,
    #[serde(flatten)]
    pub criteria: RecommendationCriteria,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Recommendations returned to the client
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub outfits: Vec<OutfitCandidate>,
    /// Set when no outfit could be built from the wardrobe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Season the outfits were scored against, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

// ============================================================================
// Wardrobe Rankings
// ============================================================================

/// A wardrobe as seen by the ranking updater
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WardrobeSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_count: i64,
}

/// Ranking computed for one wardrobe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedWardrobe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_count: i64,
    pub ranking_position: i32,
    pub ranking_score: f64,
}

/// Persisted leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub wardrobe_id: Uuid,
    pub user_id: Uuid,
    pub ranking_position: i32,
    pub ranking_score: f64,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a ranking batch
#[derive(Debug, Serialize, Deserialize)]
pub struct RankingUpdateResponse {
    pub updated: usize,
    pub top: Option<RankedWardrobe>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known_and_unknown() {
        assert_eq!(Category::parse("Top"), Category::Top);
        assert_eq!(Category::parse(" accessories "), Category::Accessory);
        assert_eq!(Category::parse("hat-rack"), Category::Unknown);
        assert_eq!(Category::parse(""), Category::Unknown);
    }

    #[test]
    fn test_category_deserialize_falls_back_to_unknown() {
        let category: Category = serde_json::from_str(r#""swimwear""#).unwrap();
        assert_eq!(category, Category::Unknown);
    }

    #[test]
    fn test_season_from_str_accepts_autumn() {
        assert_eq!("Autumn".parse::<Season>(), Ok(Season::Fall));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_item_without_season_fits_everything() {
        let item = WardrobeItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: Category::Top,
            color: "Blue".to_string(),
            style: "Casual".to_string(),
            season: None,
            material: None,
            last_worn_at: None,
            wear_count: 0,
            created_at: Utc::now(),
        };

        assert!(item.fits_season(Season::Winter));
        assert_eq!(item.normalized_color(), "blue");
        assert_eq!(item.normalized_style(), "casual");
    }

    #[test]
    fn test_item_with_blank_color_is_unusable() {
        let item: WardrobeItem = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "category": "top",
            "color": "  ",
            "style": "casual"
        }))
        .unwrap();

        assert!(!item.is_usable());
        assert_eq!(item.wear_count, 0);
    }

    #[test]
    fn test_weather_reading_season_thresholds() {
        let at = |t| WeatherReading {
            temperature_c: t,
            condition: None,
        };
        assert_eq!(at(30.0).season(), Season::Summer);
        assert_eq!(at(24.0).season(), Season::Summer);
        assert_eq!(at(18.0).season(), Season::Spring);
        assert_eq!(at(7.5).season(), Season::Fall);
        assert_eq!(at(-2.0).season(), Season::Winter);
    }

    #[test]
    fn test_explicit_season_beats_weather() {
        let criteria = RecommendationCriteria {
            season: Some(Season::Winter),
            weather: Some(WeatherReading {
                temperature_c: 30.0,
                condition: None,
            }),
            ..Default::default()
        };
        assert_eq!(criteria.effective_season(), Some(Season::Winter));
    }

    #[test]
    fn test_recommendation_request_flattens_criteria() {
        let request: RecommendationRequest = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::nil(),
            "occasion": "business",
            "season": "summer",
            "color_scheme": ["navy", "white"],
            "limit": 3
        }))
        .unwrap();

        assert_eq!(request.criteria.occasion.as_deref(), Some("business"));
        assert_eq!(request.criteria.season, Some(Season::Summer));
        assert_eq!(request.criteria.color_scheme.len(), 2);
        assert!(request.criteria.style_preference.is_empty());
        assert_eq!(request.limit, Some(3));
    }
}
