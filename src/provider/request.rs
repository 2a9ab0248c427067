use std::fmt;

/// Scalar parameter value; everything is sent as a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(value) => f.write_str(value),
            ParamValue::Integer(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{}", value),
            ParamValue::Null => Ok(()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// One logical provider operation: a method name plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub operation: String,
    pub parameters: Vec<(String, ParamValue)>,
}

impl ProviderRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self { operation: operation.into(), parameters: Vec::new() }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Query string pairs: `method`, `format=json`, then every parameter stringified.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.parameters.len() + 2);
        pairs.push(("method".to_owned(), self.operation.clone()));
        pairs.push(("format".to_owned(), "json".to_owned()));
        pairs.extend(
            self.parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string())),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_are_stringified_and_null_is_empty() {
        let request = ProviderRequest::new("foods.search")
            .param("search_expression", "paneer")
            .param("max_results", 10u32)
            .param("ratio", 1.5)
            .param("recipe_types", None::<String>);

        assert_eq!(
            request.query_pairs(),
            vec![
                ("method".to_owned(), "foods.search".to_owned()),
                ("format".to_owned(), "json".to_owned()),
                ("search_expression".to_owned(), "paneer".to_owned()),
                ("max_results".to_owned(), "10".to_owned()),
                ("ratio".to_owned(), "1.5".to_owned()),
                ("recipe_types".to_owned(), "".to_owned()),
            ]
        );
    }
}
