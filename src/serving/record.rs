//! Typed views over the provider's loosely-typed food records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_FOOD: &str = "food";
pub const FIELD_FOOD_NAME: &str = "food_name";
pub const FIELD_SERVINGS: &str = "servings";
pub const FIELD_SERVING: &str = "serving";

pub const FIELD_METRIC_AMOUNT: &str = "metric_serving_amount";
pub const FIELD_METRIC_UNIT: &str = "metric_serving_unit";
pub const FIELD_NUMBER_OF_UNITS: &str = "number_of_units";
pub const FIELD_MEASUREMENT_DESCRIPTION: &str = "measurement_description";
pub const FIELD_SERVING_DESCRIPTION: &str = "serving_description";

pub const FIELD_CALORIES: &str = "calories";
pub const FIELD_PROTEIN: &str = "protein";
pub const FIELD_CARBOHYDRATE: &str = "carbohydrate";
pub const FIELD_FAT: &str = "fat";
pub const FIELD_FIBER: &str = "fiber";

/// Nutrient fields rescaled when a serving is re-expressed in a reference portion.
pub const DEFAULT_SCALED_FIELDS: &[&str] = &[
    FIELD_CALORIES,
    FIELD_PROTEIN,
    FIELD_CARBOHYDRATE,
    FIELD_FAT,
    FIELD_FIBER,
    "calcium",
    "cholesterol",
    "iron",
    "potassium",
    "sodium",
    "sugar",
    "vitamin_a",
    "vitamin_c",
    "saturated_fat",
    "monounsaturated_fat",
    "polyunsaturated_fat",
];

/// A single object or a sequence of them, as the provider returns lists of length one
/// as a bare object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A field that is either a number (possibly sent as a string) or something else,
/// kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum NutrientValue {
    Numeric(f64),
    Raw(Value),
}

impl NutrientValue {
    pub fn from_json(value: &Value) -> Self {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed.filter(|n| n.is_finite()) {
            Some(number) => NutrientValue::Numeric(number),
            None => NutrientValue::Raw(value.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NutrientValue::Numeric(number) => Some(*number),
            NutrientValue::Raw(_) => None,
        }
    }
}

/// One serving entry with every provider field preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Serving {
    fields: Map<String, Value>,
}

impl Serving {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Present, non-null, non-blank field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        })
    }

    pub fn nutrient(&self, name: &str) -> Option<NutrientValue> {
        self.get(name).map(NutrientValue::from_json)
    }

    /// Numeric value of a field, absent or non-numeric read as 0.
    pub fn nutrient_or_zero(&self, name: &str) -> f64 {
        self.nutrient(name).and_then(|n| n.as_f64()).unwrap_or(0.0)
    }

    /// Amount as reported: metric amount, else the unit count.
    pub fn reported_amount(&self) -> Option<&Value> {
        self.get(FIELD_METRIC_AMOUNT).or_else(|| self.get(FIELD_NUMBER_OF_UNITS))
    }

    /// Unit as reported: metric unit, else the measurement description, else grams.
    pub fn reported_unit(&self) -> String {
        self.get(FIELD_METRIC_UNIT)
            .or_else(|| self.get(FIELD_MEASUREMENT_DESCRIPTION))
            .map(value_text)
            .unwrap_or_else(|| "g".to_owned())
    }
}

/// Text form of a scalar JSON value.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerce a `servings.serving` field into an ordered list of serving objects.
pub fn servings_of(detail: &Value) -> Vec<Serving> {
    let raw = match detail.get(FIELD_SERVINGS).and_then(|s| s.get(FIELD_SERVING)) {
        Some(raw) => raw.clone(),
        None => return Vec::new(),
    };
    serde_json::from_value::<OneOrMany<Value>>(raw)
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Serving::from_value)
        .collect()
}
