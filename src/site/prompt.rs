//! Instruction text and request parameters for website generation.

use serde::{Deserialize, Serialize};

use crate::api::{GenerateContent, SamplingConfig};

/// Output-shape rules shared by every variant.
const ENVELOPE_RULES: &str = r#"Return ONLY valid JSON in this exact format:
{
  "files": {
    "index.html": "...",
    "style.css": "CSS content with escaped newlines as \\n and escaped quotes as \"",
    "script.js": "JavaScript content"
  }
}"#;

const DYNAMIC_ROOT_DIRECTIVE: &str = r#"You are an expert front-end developer specializing in dynamic, modern websites.
Generate a complete, working website where:
1. index.html contains ONLY a root div with id="root" and script tags
2. All content is dynamically created using JavaScript in script.js
3. style.css contains all styling
4. Include relevant images from placeholder services like Picsum, Unsplash, etc."#;

const DYNAMIC_ROOT_RULES: &str = r#"CRITICAL RULES:
1. HTML must be minimal: only doctype, html, head, body with div#root, and script tags
2. All visible content must be created dynamically by JavaScript
3. Use placeholder images from services like:
   - https://picsum.photos/ (random: https://picsum.photos/400/300)
   - https://via.placeholder.com/ (specific: https://via.placeholder.com/400x300)
   - https://source.unsplash.com/ (themed: https://source.unsplash.com/400x300/?nature)
4. Make websites interactive with JavaScript event handlers
5. Escape all double quotes inside strings with \"
6. Replace all actual newlines with \\n
7. No markdown, backticks, or extra text outside the JSON
8. Use only plain HTML, CSS, and JavaScript (no frameworks)
9. Ensure the code is complete, functional, and responsive
10. Create modern, visually appealing designs with gradients, shadows, and animations"#;

const SEMANTIC_HTML_DIRECTIVE: &str = r#"You are a senior web designer who ships production-quality landing pages.
Generate a complete, working website where:
1. index.html is a full HTML5 document with semantic sections (header, nav, main, section, article, footer)
2. style.css holds all styling, using CSS custom properties, flexbox and grid
3. script.js adds interactivity (navigation, filtering, carousels, modals) to the existing markup
4. Images come from https://picsum.photos/ or https://source.unsplash.com/ with descriptive alt text"#;

const SEMANTIC_HTML_RULES: &str = r#"CRITICAL RULES:
1. index.html must link style.css in the head and load script.js right before </body>
2. Use accessible markup: landmarks, labelled buttons, alt text, sufficient contrast
3. Layout must be responsive down to 360px wide
4. Escape all double quotes inside strings with \"
5. Replace all actual newlines with \\n
6. No markdown, backticks, or extra text outside the JSON
7. Use only plain HTML, CSS, and JavaScript (no frameworks, no external scripts)"#;

/// A layout template the model can borrow from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPattern {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub layout: &'static str,
}

pub const UI_PATTERNS: [UiPattern; 5] = [
    UiPattern {
        name: "e-commerce",
        keywords: &["shop", "store", "product", "cart", "ecommerce", "e-commerce", "boutique"],
        layout: "sticky header with search and cart badge; hero banner; product grid of cards (image, title, price, add-to-cart); category filters; cart drawer; footer with policies",
    },
    UiPattern {
        name: "streaming",
        keywords: &["stream", "movie", "video", "music", "netflix", "spotify", "podcast"],
        layout: "dark theme; featured hero with play button; horizontally scrolling rows of poster cards grouped by genre; hover previews; modal player",
    },
    UiPattern {
        name: "dashboard",
        keywords: &["dashboard", "admin", "analytics", "metrics", "crm", "panel"],
        layout: "collapsible sidebar navigation; top bar with profile menu; KPI stat cards; charts drawn with canvas or SVG; sortable data table",
    },
    UiPattern {
        name: "social",
        keywords: &["social", "feed", "profile", "community", "chat", "forum"],
        layout: "three-column layout: profile summary, post feed with like/comment actions, suggestions panel; composer box at the top of the feed",
    },
    UiPattern {
        name: "news",
        keywords: &["news", "blog", "magazine", "article", "journal", "press"],
        layout: "masthead with date and section nav; lead story with large image; multi-column article grid; trending sidebar; newsletter signup",
    },
];

/// Pick the catalog entry whose keywords appear in the prompt.
pub fn match_pattern(prompt: &str) -> Option<&'static UiPattern> {
    let lowered = prompt.to_lowercase();
    UI_PATTERNS
        .iter()
        .find(|pattern| pattern.keywords.iter().any(|k| lowered.contains(k)))
}

/// Flavour of generated site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Empty `#root` container; `script.js` builds every element.
    #[default]
    DynamicRoot,
    /// Full semantic HTML5 markup guided by the UI pattern catalog.
    SemanticHtml,
}

/// What the pipeline does once every model call has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Surface the categorized error and keep the previous bundle.
    #[default]
    Raise,
    /// Hand back the default error bundle instead.
    Placeholder,
}

/// Per-variant request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantConfig {
    pub variant: PromptVariant,
    pub model_candidates: Vec<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub on_exhausted: ExhaustionPolicy,
}

impl VariantConfig {
    pub fn for_variant(variant: PromptVariant) -> Self {
        match variant {
            PromptVariant::DynamicRoot => Self {
                variant,
                model_candidates: vec![
                    "gemini-1.5-flash".to_string(),
                    "gemini-pro".to_string(),
                    "models/gemini-pro".to_string(),
                ],
                temperature: 0.8,
                max_output_tokens: 4096,
                top_p: None,
                top_k: None,
                on_exhausted: ExhaustionPolicy::Raise,
            },
            PromptVariant::SemanticHtml => Self {
                variant,
                model_candidates: vec![
                    "gemini-2.5-flash".to_string(),
                    "gemini-2.0-flash".to_string(),
                    "gemini-1.5-flash".to_string(),
                ],
                temperature: 0.7,
                max_output_tokens: 8192,
                top_p: Some(0.95),
                top_k: Some(40),
                on_exhausted: ExhaustionPolicy::Placeholder,
            },
        }
    }

    fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::for_variant(PromptVariant::default())
    }
}

/// One user action's worth of request data. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub fallback_prompt_text: String,
    pub system_instruction: String,
    pub model_candidates: Vec<String>,
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    /// Payload for a named candidate.
    pub fn content(&self) -> GenerateContent {
        self.with_text(&self.prompt_text)
    }

    /// Payload for the last-chance call without an explicit model.
    pub fn fallback_content(&self) -> GenerateContent {
        self.with_text(&self.fallback_prompt_text)
    }

    fn with_text(&self, text: &str) -> GenerateContent {
        GenerateContent {
            user_text: text.to_string(),
            system_instruction: Some(self.system_instruction.clone()),
            sampling: self.sampling.clone(),
        }
    }
}

/// Builds [`GenerationRequest`]s for one variant.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    config: VariantConfig,
}

impl PromptBuilder {
    pub fn new(config: VariantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Compose the request for `user_prompt`. The prompt is embedded verbatim.
    pub fn build(&self, user_prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt_text: self.instruction(user_prompt),
            fallback_prompt_text: self.fallback_instruction(user_prompt),
            system_instruction: self.system_instruction(user_prompt),
            model_candidates: self.config.model_candidates.clone(),
            sampling: self.config.sampling(),
        }
    }

    fn instruction(&self, user_prompt: &str) -> String {
        match self.config.variant {
            PromptVariant::DynamicRoot => format!(
                "Create a dynamic, modern website for: {}.\n\
                 HTML should only have a root div, all content must be created by JavaScript.\n\
                 Include relevant images from placeholder services.\n\
                 Make it interactive and visually appealing.\n\
                 Return only valid JSON.",
                user_prompt
            ),
            PromptVariant::SemanticHtml => format!(
                "Create a complete, modern website for: {}.\n\
                 Use full semantic HTML5 markup, polished responsive CSS and interactive JavaScript.\n\
                 Include relevant images from placeholder services.\n\
                 Return only valid JSON.",
                user_prompt
            ),
        }
    }

    fn fallback_instruction(&self, user_prompt: &str) -> String {
        match self.config.variant {
            PromptVariant::DynamicRoot => format!(
                "Create a dynamic website for: {}. HTML should only have a root div, all content must be created by JavaScript. Include relevant images. Return only valid JSON.",
                user_prompt
            ),
            PromptVariant::SemanticHtml => format!(
                "Create a website for: {}. Use semantic HTML5, CSS and JavaScript. Include relevant images. Return only valid JSON.",
                user_prompt
            ),
        }
    }

    fn system_instruction(&self, user_prompt: &str) -> String {
        match self.config.variant {
            PromptVariant::DynamicRoot => {
                format!(
                    "{}\n\n{}\n\n{}",
                    DYNAMIC_ROOT_DIRECTIVE, ENVELOPE_RULES, DYNAMIC_ROOT_RULES
                )
            }
            PromptVariant::SemanticHtml => {
                let mut text = format!(
                    "{}\n\n{}\n\n{}\n\nUI PATTERN CATALOG:\n",
                    SEMANTIC_HTML_DIRECTIVE, ENVELOPE_RULES, SEMANTIC_HTML_RULES
                );
                for pattern in UI_PATTERNS.iter() {
                    text.push_str(&format!("- {}: {}\n", pattern.name, pattern.layout));
                }
                if let Some(pattern) = match_pattern(user_prompt) {
                    text.push_str(&format!(
                        "\nThe request is closest to the {} pattern; follow its layout.\n",
                        pattern.name
                    ));
                }
                text.trim_end().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::default();
        assert_eq!(builder.build("a bakery"), builder.build("a bakery"));
    }

    #[test]
    fn test_user_text_passes_through_unescaped() {
        let prompt = r#"a site with "quotes" & <tags> and \backslashes"#;
        let request = PromptBuilder::default().build(prompt);
        assert!(request.prompt_text.contains(prompt));
        assert!(request.fallback_prompt_text.contains(prompt));
    }

    #[test]
    fn test_dynamic_root_defaults() {
        let request = PromptBuilder::default().build("portfolio");
        assert_eq!(
            request.model_candidates,
            vec!["gemini-1.5-flash", "gemini-pro", "models/gemini-pro"]
        );
        assert_eq!(request.sampling.temperature, 0.8);
        assert_eq!(request.sampling.max_output_tokens, 4096);
        assert_eq!(request.sampling.top_p, None);
        assert!(request.system_instruction.contains("id=\"root\""));
        assert!(request.system_instruction.contains("\"files\""));
        assert!(!request.system_instruction.contains("UI PATTERN CATALOG"));
    }

    #[test]
    fn test_semantic_variant_embeds_catalog() {
        let builder = PromptBuilder::new(VariantConfig::for_variant(PromptVariant::SemanticHtml));
        let request = builder.build("an online shoe store");

        for pattern in UI_PATTERNS.iter() {
            assert!(request.system_instruction.contains(pattern.name));
        }
        assert!(request
            .system_instruction
            .contains("closest to the e-commerce pattern"));
        assert_eq!(request.sampling.top_p, Some(0.95));
        assert_eq!(request.sampling.top_k, Some(40));
    }

    #[test]
    fn test_match_pattern() {
        assert_eq!(match_pattern("Admin DASHBOARD for sales").unwrap().name, "dashboard");
        assert_eq!(match_pattern("a movie streaming app").unwrap().name, "streaming");
        assert!(match_pattern("a portfolio").is_none());
    }

    #[test]
    fn test_fallback_content_uses_short_text() {
        let request = PromptBuilder::default().build("portfolio");
        let primary = request.content();
        let fallback = request.fallback_content();
        assert_ne!(primary.user_text, fallback.user_text);
        assert_eq!(primary.system_instruction, fallback.system_instruction);
        assert_eq!(primary.sampling, fallback.sampling);
    }
}
