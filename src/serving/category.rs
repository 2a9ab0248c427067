use serde::Serialize;
use std::fmt;

/// Coarse dish classification selecting the reference-portion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    RiceDish,
    DalCurry,
    Roti,
    Generic,
}

const RICE_DISH_KEYWORDS: &[&str] = &["rice", "biryani", "pulao", "khichdi", "poha"];
const DAL_CURRY_KEYWORDS: &[&str] = &["dal", "curry", "sabzi", "rajma", "chole"];
const ROTI_KEYWORDS: &[&str] = &["roti", "chapati", "naan", "paratha"];

/// Categories in match priority order, first hit wins.
const KEYWORDS_BY_PRIORITY: &[(DishCategory, &[&str])] = &[
    (DishCategory::RiceDish, RICE_DISH_KEYWORDS),
    (DishCategory::DalCurry, DAL_CURRY_KEYWORDS),
    (DishCategory::Roti, ROTI_KEYWORDS),
];

impl DishCategory {
    /// Case-insensitive substring match of the food name against the keyword sets.
    pub fn classify(food_name: &str) -> Self {
        let name = food_name.to_lowercase();
        KEYWORDS_BY_PRIORITY
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
            .map(|(category, _)| *category)
            .unwrap_or(DishCategory::Generic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DishCategory::RiceDish => "rice_dish",
            DishCategory::DalCurry => "dal_curry",
            DishCategory::Roti => "roti",
            DishCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DishCategory;

    #[test]
    fn rice_outranks_dal_curry() {
        assert_eq!(DishCategory::classify("Chole Rice"), DishCategory::RiceDish);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(DishCategory::classify("Veg BIRYANI"), DishCategory::RiceDish);
        assert_eq!(DishCategory::classify("Rajma Masala"), DishCategory::DalCurry);
        assert_eq!(DishCategory::classify("Butter Naan"), DishCategory::Roti);
        assert_eq!(DishCategory::classify("Apple"), DishCategory::Generic);
        assert_eq!(DishCategory::classify(""), DishCategory::Generic);
    }

    #[test]
    fn substring_matches_count() {
        // "curry" inside a longer word still matches
        assert_eq!(DishCategory::classify("Currywurst"), DishCategory::DalCurry);
    }
}
