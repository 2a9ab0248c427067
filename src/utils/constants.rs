//! Shared constants and invariants

pub const DEFAULT_EXPIRY_BUFFER_SECONDS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;

// Provider endpoints
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.fatsecret.com/connect/token";
pub const DEFAULT_API_URL: &str = "https://platform.fatsecret.com/rest/server.api";

// Client-credentials grant
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const TOKEN_SCOPE: &str = "basic";

// Provider methods
pub const METHOD_FOODS_SEARCH: &str = "foods.search";
pub const METHOD_FOOD_GET: &str = "food.get";
pub const METHOD_RECIPES_SEARCH: &str = "recipes.search";
pub const METHOD_RECIPE_GET: &str = "recipe.get";

pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 10;
pub const DEFAULT_TRENDING_MAX_RESULTS: u32 = 20;
/// No trending endpoint exists upstream; trending is a recipe search for this term.
pub const TRENDING_FALLBACK_TERM: &str = "popular";
