//! Parameter shaping for the supported provider methods.

use serde_json::Value;

use crate::errors::GatewayError;
use crate::provider::gateway::ProviderGateway;
use crate::provider::request::ProviderRequest;
use crate::sources::issuer::IssueToken;
use crate::utils::constants::{
    DEFAULT_SEARCH_MAX_RESULTS, DEFAULT_TRENDING_MAX_RESULTS, METHOD_FOODS_SEARCH, METHOD_FOOD_GET,
    METHOD_RECIPES_SEARCH, METHOD_RECIPE_GET, TRENDING_FALLBACK_TERM,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodSearch {
    pub query: String,
    pub max_results: u32,
    pub page: u32,
}

impl FoodSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), max_results: DEFAULT_SEARCH_MAX_RESULTS, page: 0 }
    }

    pub fn to_request(&self) -> ProviderRequest {
        ProviderRequest::new(METHOD_FOODS_SEARCH)
            .param("search_expression", self.query.as_str())
            .param("max_results", self.max_results)
            .param("page_number", self.page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSearch {
    pub query: String,
    pub max_results: u32,
    pub page: u32,
    /// sent only when non-empty
    pub recipe_types: Option<String>,
}

impl RecipeSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), max_results: DEFAULT_SEARCH_MAX_RESULTS, page: 0, recipe_types: None }
    }

    pub fn to_request(&self) -> ProviderRequest {
        let request = ProviderRequest::new(METHOD_RECIPES_SEARCH)
            .param("search_expression", self.query.as_str())
            .param("max_results", self.max_results)
            .param("page_number", self.page);
        match self.recipe_types.as_deref().filter(|types| !types.is_empty()) {
            Some(types) => request.param("recipe_types", types),
            None => request,
        }
    }
}

/// Popular recipes, approximated by a recipe search on the category or "popular".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingRecipes {
    pub max_results: u32,
    pub page: u32,
    pub category: Option<String>,
}

impl Default for TrendingRecipes {
    fn default() -> Self {
        Self { max_results: DEFAULT_TRENDING_MAX_RESULTS, page: 0, category: None }
    }
}

impl TrendingRecipes {
    pub fn search_term(&self) -> &str {
        self.category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(TRENDING_FALLBACK_TERM)
    }

    pub fn to_request(&self) -> ProviderRequest {
        ProviderRequest::new(METHOD_RECIPES_SEARCH)
            .param("search_expression", self.search_term())
            .param("max_results", self.max_results)
            .param("page_number", self.page)
    }
}

impl<I> ProviderGateway<I>
where
    I: IssueToken + Send + Sync,
{
    pub async fn search_foods(&self, search: &FoodSearch) -> Result<Value, GatewayError> {
        self.call(&search.to_request()).await
    }

    pub async fn get_food(&self, food_id: &str) -> Result<Value, GatewayError> {
        self.call(&ProviderRequest::new(METHOD_FOOD_GET).param("food_id", food_id)).await
    }

    pub async fn search_recipes(&self, search: &RecipeSearch) -> Result<Value, GatewayError> {
        self.call(&search.to_request()).await
    }

    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Value, GatewayError> {
        self.call(&ProviderRequest::new(METHOD_RECIPE_GET).param("recipe_id", recipe_id)).await
    }

    pub async fn trending_recipes(&self, trending: &TrendingRecipes) -> Result<Value, GatewayError> {
        self.call(&trending.to_request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::request::ParamValue;

    fn param<'a>(request: &'a ProviderRequest, name: &str) -> Option<&'a ParamValue> {
        request.parameters.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    #[test]
    fn recipe_types_only_sent_when_present() {
        let mut search = RecipeSearch::new("pasta");
        assert!(param(&search.to_request(), "recipe_types").is_none());

        search.recipe_types = Some("Breakfast".into());
        assert_eq!(param(&search.to_request(), "recipe_types"), Some(&ParamValue::Text("Breakfast".into())));
    }

    #[test]
    fn trending_defaults_to_popular_term() {
        let trending = TrendingRecipes::default();
        let request = trending.to_request();
        assert_eq!(request.operation, METHOD_RECIPES_SEARCH);
        assert_eq!(param(&request, "search_expression"), Some(&ParamValue::Text("popular".into())));
        assert_eq!(param(&request, "max_results"), Some(&ParamValue::Integer(20)));

        let trending = TrendingRecipes { category: Some("dinner".into()), ..Default::default() };
        assert_eq!(trending.search_term(), "dinner");
    }

    #[test]
    fn food_search_uses_defaults() {
        let request = FoodSearch::new("dal").to_request();
        assert_eq!(param(&request, "max_results"), Some(&ParamValue::Integer(10)));
        assert_eq!(param(&request, "page_number"), Some(&ParamValue::Integer(0)));
    }
}
