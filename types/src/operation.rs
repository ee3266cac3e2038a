use serde::Serialize;
use serde_json::Value;

use crate::Headers;

/// A single outbound GraphQL request.
///
/// Links may only touch [`Operation::headers_mut`]; the name, document and
/// variables are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    name: Option<String>,
    query: String,
    variables: Value,
    headers: Headers,
}

/// Wire shape of the POST body sent to the GraphQL endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
    pub query: &'a str,
    pub variables: &'a Value,
}

impl Operation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            name: None,
            query: query.into(),
            variables: Value::Object(serde_json::Map::new()),
            headers: Headers::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Operation name for logs; anonymous operations report `"anonymous"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn variables(&self) -> &Value {
        &self.variables
    }

    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    #[must_use]
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            operation_name: self.name.as_deref(),
            query: &self.query,
            variables: &self.variables,
        }
    }
}
