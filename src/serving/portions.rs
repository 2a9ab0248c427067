use serde::Serialize;

use crate::serving::category::DishCategory;

/// Named regional portion with an authoritative gram weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePortion {
    pub key: &'static str,
    pub grams: f64,
    pub description: &'static str,
}

const fn portion(key: &'static str, grams: f64, description: &'static str) -> ReferencePortion {
    ReferencePortion { key, grams, description }
}

const RICE_DISH_PORTIONS: &[ReferencePortion] = &[
    portion("katori", 180.0, "1 Katori (medium bowl)"),
    portion("half_katori", 90.0, "1/2 Katori"),
    portion("full_plate", 250.0, "1 Full Plate"),
];

const DAL_CURRY_PORTIONS: &[ReferencePortion] = &[
    portion("katori", 150.0, "1 Katori (medium bowl)"),
    portion("half_katori", 75.0, "1/2 Katori"),
];

const ROTI_PORTIONS: &[ReferencePortion] = &[
    portion("piece", 30.0, "1 Roti/Chapati"),
    portion("two_pieces", 60.0, "2 Rotis/Chapatis"),
];

const GENERIC_PORTIONS: &[ReferencePortion] = &[
    portion("one_cup", 200.0, "1 Cup (Indian standard)"),
    portion("half_cup", 100.0, "1/2 Cup"),
];

/// Reference portions for a category, in display order.
pub fn reference_portions(category: DishCategory) -> &'static [ReferencePortion] {
    match category {
        DishCategory::RiceDish => RICE_DISH_PORTIONS,
        DishCategory::DalCurry => DAL_CURRY_PORTIONS,
        DishCategory::Roti => ROTI_PORTIONS,
        DishCategory::Generic => GENERIC_PORTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_and_weights() {
        assert_eq!(reference_portions(DishCategory::RiceDish).len(), 3);
        assert_eq!(reference_portions(DishCategory::DalCurry).len(), 2);
        assert_eq!(reference_portions(DishCategory::Roti)[1].grams, 60.0);
        assert_eq!(reference_portions(DishCategory::Generic)[0].key, "one_cup");
    }
}
