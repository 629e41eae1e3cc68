//! Template matcher (verb module)
//!
//! Short-circuits common phrasings straight to a predefined request.

use tracing::debug;
use crate::lexicon::{builtin_templates, Template};
use crate::request::AnalysisRequest;

/// Row limit of a template request when the prompt names no number
pub const TEMPLATE_LIMIT: u32 = 10;

/// Matches prompts against an ordered template list
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher<'a> {
    templates: &'a [Template],
    default_limit: u32,
}

impl<'a> TemplateMatcher<'a> {
    pub fn new(templates: &'a [Template]) -> Self {
        Self {
            templates,
            default_limit: TEMPLATE_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// First template whose rule holds for the prompt
    pub fn find(&self, prompt: &str) -> Option<&'a Template> {
        let lowered = prompt.to_lowercase();
        self.templates.iter().find(|t| t.matches(&lowered))
    }

    /// Owned request for the first matching template
    pub fn match_template(&self, prompt: &str) -> Option<AnalysisRequest> {
        let template = self.find(prompt)?;
        debug!(template = %template.name, "prompt matched template");
        Some(template.instantiate(self.default_limit))
    }
}

impl Default for TemplateMatcher<'static> {
    fn default() -> Self {
        Self::new(builtin_templates())
    }
}

/// Match a prompt against the built-in templates
pub fn match_template(prompt: &str) -> Option<AnalysisRequest> {
    TemplateMatcher::default().match_template(prompt)
}
