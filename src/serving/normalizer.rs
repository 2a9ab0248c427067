//! Re-expresses a provider food record in Indian reference portions.
//!
//! The first valid serving of a record is the scaling base. Every reference portion of the
//! record's dish category gets `multiplier = portion grams / base grams`, which is applied to
//! the base serving's nutrient values. Nothing here fails: records without usable servings
//! come back with empty results and the record passed through untouched.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::settings::ServingConfig;
use crate::serving::category::DishCategory;
use crate::serving::portions::{reference_portions, ReferencePortion};
use crate::serving::record::{
    servings_of, NutrientValue, Serving, DEFAULT_SCALED_FIELDS, FIELD_CALORIES,
    FIELD_CARBOHYDRATE, FIELD_FAT, FIELD_FIBER, FIELD_FOOD, FIELD_FOOD_NAME,
    FIELD_MEASUREMENT_DESCRIPTION, FIELD_METRIC_AMOUNT, FIELD_METRIC_UNIT, FIELD_NUMBER_OF_UNITS,
    FIELD_PROTEIN, FIELD_SERVING, FIELD_SERVINGS, FIELD_SERVING_DESCRIPTION,
};

pub const GRAMS_PER_CUP: f64 = 200.0;
pub const GRAMS_PER_ML: f64 = 1.0;

/// A provider serving with its resolved amount, unit and gram weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedServing {
    pub amount: f64,
    pub unit: String,
    pub grams: f64,
    #[serde(flatten)]
    pub serving: Serving,
}

impl ResolvedServing {
    /// `None` when the serving has no positive gram weight.
    pub fn resolve(serving: Serving) -> Option<Self> {
        let amount = serving
            .reported_amount()
            .map(NutrientValue::from_json)
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        let unit = serving.reported_unit();
        let grams = to_grams(amount, &unit);
        if grams.is_nan() || grams <= 0.0 {
            return None;
        }
        Some(Self { amount, unit, grams, serving })
    }

    /// Identity used for deduplication. Compares the parsed amount, so "100" and "100.000" collide.
    fn key(&self) -> (u64, String) {
        (self.amount.to_bits(), self.unit.clone())
    }
}

fn to_grams(amount: f64, unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "cup" => amount * GRAMS_PER_CUP,
        "ml" => amount * GRAMS_PER_ML,
        _ => amount,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledNutrient {
    pub original: f64,
    pub scaled: String,
}

impl ScaledNutrient {
    fn of(serving: &Serving, field: &str, multiplier: f64) -> Self {
        let original = serving.nutrient_or_zero(field);
        Self { original, scaled: format!("{:.1}", original * multiplier) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreNutrients {
    pub calories: ScaledNutrient,
    pub protein: ScaledNutrient,
    pub carbohydrate: ScaledNutrient,
    pub fat: ScaledNutrient,
    pub fiber: ScaledNutrient,
}

impl CoreNutrients {
    fn scaled(serving: &Serving, multiplier: f64) -> Self {
        Self {
            calories: ScaledNutrient::of(serving, FIELD_CALORIES, multiplier),
            protein: ScaledNutrient::of(serving, FIELD_PROTEIN, multiplier),
            carbohydrate: ScaledNutrient::of(serving, FIELD_CARBOHYDRATE, multiplier),
            fat: ScaledNutrient::of(serving, FIELD_FAT, multiplier),
            fiber: ScaledNutrient::of(serving, FIELD_FIBER, multiplier),
        }
    }
}

/// How much of the base serving one reference portion amounts to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceEquivalent {
    pub portion: &'static str,
    pub description: &'static str,
    pub grams: f64,
    pub multiplier: f64,
    /// amount in the base serving's own unit, e.g. "1.8 cup"
    pub equivalent_to: String,
    pub nutrition: CoreNutrients,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedFood {
    pub category: Option<DishCategory>,
    pub original_servings: Vec<ResolvedServing>,
    pub reference_equivalents: Vec<ReferenceEquivalent>,
    /// provider-shaped copy of the record with servings replaced by reference portions
    pub transformed_record: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServingNormalizer {
    scaled_fields: Vec<String>,
}

impl Default for ServingNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SCALED_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

impl ServingNormalizer {
    pub fn new(scaled_fields: Vec<String>) -> Self {
        Self { scaled_fields }
    }

    pub fn from_settings(cfg: &ServingConfig) -> Self {
        cfg.scaled_fields
            .clone()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn scaled_fields(&self) -> &[String] {
        &self.scaled_fields
    }

    /// Accepts either a `food.get` response (`{"food": {...}}`) or the bare food object.
    pub fn normalize(&self, raw: Option<&Value>, fallback_name: &str) -> NormalizedFood {
        let Some(raw) = raw else {
            return NormalizedFood::default();
        };
        let detail = detail_of(raw);

        let original_servings = dedup(
            servings_of(detail)
                .into_iter()
                .filter_map(ResolvedServing::resolve),
        );
        let Some(base) = original_servings.first() else {
            debug!("no usable servings, passing record through");
            return NormalizedFood {
                transformed_record: Some(raw.clone()),
                ..Default::default()
            };
        };

        let name = detail
            .get(FIELD_FOOD_NAME)
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback_name);
        let category = DishCategory::classify(name);
        let portions = reference_portions(category);
        debug!(food_name = %name, category = %category, base_grams = base.grams, "normalizing servings");

        let reference_equivalents = portions
            .iter()
            .map(|portion| equivalent(base, portion))
            .collect();
        let transformed_servings = portions
            .iter()
            .map(|portion| self.transform_serving(&base.serving, portion, portion.grams / base.grams))
            .collect();
        let transformed_record = Some(with_servings(raw, transformed_servings));

        NormalizedFood {
            category: Some(category),
            original_servings,
            reference_equivalents,
            transformed_record,
        }
    }

    /// Copy of the base serving expressed as one reference portion.
    fn transform_serving(&self, base: &Serving, portion: &ReferencePortion, multiplier: f64) -> Value {
        let mut fields = base.fields().clone();
        for name in &self.scaled_fields {
            if let Some(NutrientValue::Numeric(value)) = base.nutrient(name) {
                fields.insert(name.clone(), Value::String(format!("{:.2}", value * multiplier)));
            }
        }
        fields.insert(FIELD_METRIC_AMOUNT.into(), Value::String(format!("{:.3}", portion.grams)));
        fields.insert(FIELD_METRIC_UNIT.into(), Value::String("g".into()));
        fields.insert(FIELD_MEASUREMENT_DESCRIPTION.into(), Value::String(portion.description.into()));
        fields.insert(FIELD_SERVING_DESCRIPTION.into(), Value::String(portion.description.into()));
        fields.insert(FIELD_NUMBER_OF_UNITS.into(), Value::String("1.000".into()));
        Value::Object(fields)
    }
}

/// Normalize with the default scaled-field list.
pub fn normalize(raw: Option<&Value>, fallback_name: &str) -> NormalizedFood {
    ServingNormalizer::default().normalize(raw, fallback_name)
}

fn detail_of(raw: &Value) -> &Value {
    raw.get(FIELD_FOOD).filter(|food| food.is_object()).unwrap_or(raw)
}

/// Keep the first serving per (reported amount, unit), in original order.
fn dedup(servings: impl Iterator<Item = ResolvedServing>) -> Vec<ResolvedServing> {
    let mut seen = HashSet::new();
    servings.filter(|serving| seen.insert(serving.key())).collect()
}

fn equivalent(base: &ResolvedServing, portion: &ReferencePortion) -> ReferenceEquivalent {
    let multiplier = portion.grams / base.grams;
    ReferenceEquivalent {
        portion: portion.key,
        description: portion.description,
        grams: portion.grams,
        multiplier,
        equivalent_to: format!("{:.1} {}", multiplier * base.amount, base.unit),
        nutrition: CoreNutrients::scaled(&base.serving, multiplier),
    }
}

fn with_servings(raw: &Value, servings: Vec<Value>) -> Value {
    let mut record = raw.clone();
    let wrapped = record.get(FIELD_FOOD).is_some_and(Value::is_object);
    let detail = if wrapped { record.get_mut(FIELD_FOOD) } else { Some(&mut record) };
    if let Some(container) = detail
        .and_then(|detail| detail.get_mut(FIELD_SERVINGS))
        .and_then(Value::as_object_mut)
    {
        container.insert(FIELD_SERVING.into(), Value::Array(servings));
    }
    record
}
