//! Analyzer configuration
//!
//! Loaded from YAML. Every field is optional; omitted tables fall back to
//! the built-in lexicon and templates.
//!
//! ```yaml
//! default_limit: 5
//! template_limit: 10
//! templates:
//!   - name: top_accounts
//!     title: Top Accounts by Revenue
//!     description: Accounts with the most revenue
//!     query_type: top
//!     entity_type: clients
//!     metric: revenue
//!     dimension: client_name
//!     when: [[top account], [revenue]]
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ParseError;
use crate::lexicon::{builtin_templates, Lexicon, Template};
use crate::matcher::TEMPLATE_LIMIT;
use crate::request::AnalysisRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Row limit on the resolver path when the prompt names none
    pub default_limit: u32,
    /// Row limit on the template path when the prompt names none
    pub template_limit: u32,
    /// Replacement keyword tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<Lexicon>,
    /// Replacement template list, in priority order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<Template>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_limit: AnalysisRequest::DEFAULT_LIMIT,
            template_limit: TEMPLATE_LIMIT,
            lexicon: None,
            templates: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path_str = path.as_ref().display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
            path: path_str,
            source: e,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ParseError> {
        let config: AnalyzerConfig = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    /// Lowercase configured phrases and clamp limits to at least 1
    pub fn normalized(mut self) -> Self {
        self.default_limit = self.default_limit.max(1);
        self.template_limit = self.template_limit.max(1);
        self.lexicon = self.lexicon.map(Lexicon::normalized);
        self.templates = self
            .templates
            .map(|templates| templates.into_iter().map(Template::normalized).collect());
        self
    }

    /// Effective keyword tables
    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon.as_ref().unwrap_or(Lexicon::builtin())
    }

    /// Effective template list
    pub fn templates(&self) -> &[Template] {
        self.templates.as_deref().unwrap_or(builtin_templates())
    }
}
