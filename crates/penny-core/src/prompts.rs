//! Prompt library for remote model calls
//!
//! Each prompt has a system instruction and a user template with `{{name}}`
//! placeholders. Templates are compiled into the binary.

use std::collections::HashMap;

mod defaults {
    pub const CLASSIFY_SYSTEM: &str =
        "You are a financial transaction classifier. You answer with a single category name and nothing else.";

    pub const CLASSIFY_USER: &str = "Classify this transaction into exactly one category.

Allowed categories: {{categories}}

Merchant: {{merchant}}
Amount: {{amount}}

Respond with only the category name.";

    pub const AUDIT_SYSTEM: &str =
        "You are a personal finance coach. You review spending and give short, concrete, friendly advice.";

    pub const AUDIT_USER: &str = "Here is a summary of my recent spending:

{{summary}}

Give me up to {{max_insights}} insights about this spending. Each insight has a type:
- \"warning\" for spending that looks too high
- \"tip\" for a general habit worth changing
- \"kudos\" for something I am doing well
- \"saving\" for a concrete way to save money

Reply with JSON only, in this exact shape:
{\"insights\": [{\"type\": \"tip\", \"title\": \"short title\", \"message\": \"one or two sentences\", \"potential_savings\": 0}]}";

    pub const CHAT_SYSTEM: &str =
        "You are a friendly personal finance coach. Answer in at most four sentences, using the spending data you are given. If the data does not answer the question, say so.";

    pub const CHAT_USER: &str = "My spending summary:
{{summary}}

My recent expenses:
{{expenses}}

Question: {{message}}";
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Single-label transaction classification
    ClassifyTransaction,
    /// Budgeting insights over a spending summary (JSON answer)
    AuditSpending,
    /// Free-form question about the user's spending
    ChatAdvisor,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassifyTransaction => "classify_transaction",
            Self::AuditSpending => "audit_spending",
            Self::ChatAdvisor => "chat_advisor",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::ClassifyTransaction,
            Self::AuditSpending,
            Self::ChatAdvisor,
        ]
    }

    /// Identify which prompt produced a rendered user message
    pub fn detect(rendered: &str) -> Option<PromptId> {
        if rendered.contains("Allowed categories:") {
            Some(Self::ClassifyTransaction)
        } else if rendered.contains("{\"insights\":") {
            Some(Self::AuditSpending)
        } else if rendered.contains("Question:") {
            Some(Self::ChatAdvisor)
        } else {
            None
        }
    }
}

/// A prompt template
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    pub id: PromptId,
    /// System instruction
    pub system: &'static str,
    /// User message template
    pub user: &'static str,
}

impl Prompt {
    pub fn get(id: PromptId) -> Self {
        let (system, user) = match id {
            PromptId::ClassifyTransaction => (defaults::CLASSIFY_SYSTEM, defaults::CLASSIFY_USER),
            PromptId::AuditSpending => (defaults::AUDIT_SYSTEM, defaults::AUDIT_USER),
            PromptId::ChatAdvisor => (defaults::CHAT_SYSTEM, defaults::CHAT_USER),
        };
        Self { id, system, user }
    }

    /// Render the user template, substituting `{{name}}` placeholders
    ///
    /// Placeholders without a value are removed.
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        render(self.user, vars)
    }
}

fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                if let Some(value) = vars.get(name) {
                    out.push_str(value);
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_and_drops_unknown() {
        let mut vars = HashMap::new();
        vars.insert("merchant", "Acme");
        assert_eq!(
            render("M: {{merchant}} A: {{amount}}.", &vars),
            "M: Acme A: ."
        );
        assert_eq!(render("{{ merchant }}", &vars), "Acme");
    }

    #[test]
    fn test_render_unterminated_placeholder_is_kept() {
        let vars = HashMap::new();
        assert_eq!(render("open {{ brace", &vars), "open {{ brace");
    }

    #[test]
    fn test_every_prompt_is_detectable() {
        for id in PromptId::all() {
            let prompt = Prompt::get(*id);
            let rendered = prompt.render_user(&HashMap::new());
            assert_eq!(PromptId::detect(&rendered), Some(*id), "{}", id.as_str());
        }
    }

    #[test]
    fn test_audit_template_keeps_json_braces() {
        let prompt = Prompt::get(PromptId::AuditSpending);
        let rendered = prompt.render_user(&HashMap::new());
        assert!(rendered.contains(r#"{"insights": [{"type": "tip""#));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(PromptId::detect("hello"), None);
    }
}
