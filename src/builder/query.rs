use serde::{Deserialize, Serialize};

use crate::ast::File;
use crate::error::FluxResult;
use crate::options::FluxBuilderOptions;
use crate::params::Parameters;

/// A finished query: body text plus everything it depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxQuery {
    body: String,
    options: FluxBuilderOptions,
    params: Parameters,
}

/// Body of a `POST /api/v2/query` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub query: String,
    #[serde(rename = "extern", default, skip_serializing_if = "Option::is_none")]
    pub extern_: Option<File>,
}

impl FluxQuery {
    pub(crate) fn new(body: String, options: FluxBuilderOptions, params: Parameters) -> Self {
        Self {
            body,
            options,
            params,
        }
    }

    /// The pipeline text without imports or options.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn options(&self) -> &FluxBuilderOptions {
        &self.options
    }

    /// Imports, the `params` record, the `now` option, then the body.
    pub fn to_flux_notation(&self) -> String {
        let mut out = String::new();
        if let Some(imports) = self.options.imports_notation() {
            out.push_str(&imports);
        }
        if let Some(params) = self.params.to_flux_notation() {
            out.push_str(&params);
        }
        if let Some(now) = self.options.now_notation() {
            out.push_str(&now);
        }
        out.push_str(&self.body);
        out
    }

    /// Everything except the body as an AST file: import declarations, then
    /// the `params` and `now` option statements.
    pub fn to_flux_ast(&self) -> File {
        File {
            name: None,
            imports: self.options.imports_ast(),
            body: self
                .params
                .to_flux_ast()
                .into_iter()
                .chain(self.options.now_ast())
                .collect(),
        }
    }

    /// Request with the options passed as `extern`.
    ///
    /// Imports stay in the query text: Flux resolves them per file.
    pub fn to_request(&self) -> QueryRequest {
        let mut query = self.options.imports_notation().unwrap_or_default();
        query.push_str(&self.body);
        let mut declarations = self.to_flux_ast();
        declarations.imports.clear();
        QueryRequest {
            kind: "flux".to_string(),
            query,
            extern_: (!declarations.body.is_empty()).then_some(declarations),
        }
    }

    pub fn to_request_json(&self) -> FluxResult<String> {
        Ok(serde_json::to_string(&self.to_request())?)
    }
}

impl std::fmt::Display for FluxQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_flux_notation())
    }
}
