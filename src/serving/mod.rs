pub mod category;
pub mod normalizer;
pub mod portions;
pub mod record;

pub use category::DishCategory;
pub use normalizer::{normalize, NormalizedFood, ReferenceEquivalent, ResolvedServing, ServingNormalizer};
pub use portions::{reference_portions, ReferencePortion};
pub use record::{NutrientValue, OneOrMany, Serving};
