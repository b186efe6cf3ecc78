//! Prompt Composition Engine.
//!
//! A pure, synchronous mapping from the operator's selection state (plus the
//! option taxonomy and knowledge store it references) to one instruction
//! document. Recomputed on every state change; identical inputs always
//! produce byte-identical output. There is no failure path: missing or stale
//! references degrade to omitted fragments.

mod format;
mod sections;

pub use format::OutputFormat;
pub use sections::{CTA_LINK_PLACEHOLDER, NO_COMPETITOR_SENTENCE};

use crate::knowledge::KnowledgeStore;
use crate::selection::{ResolvedSelection, SelectionState};
use crate::taxonomy::{OptionDetail, Taxonomy};

/// Deterministic renderer for the instruction document
#[derive(Debug, Clone, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Render the instruction document for the given state.
    ///
    /// Pure and infallible: no I/O, no clock, no randomness.
    pub fn compose(
        &self,
        state: &SelectionState,
        taxonomy: &Taxonomy,
        knowledge: &KnowledgeStore,
    ) -> String {
        let resolved = state.resolve(taxonomy);
        let format = OutputFormat::from_option_id(resolved.output_format.map(|o| o.id.as_str()));

        let mut doc = String::new();
        let mut push_block = |block: String| {
            if !block.trim().is_empty() {
                doc.push_str(block.trim_end());
                doc.push_str("\n\n");
            }
        };

        push_block(Self::persona_header(&resolved));
        push_block(Self::task_statement(&resolved));
        push_block(Self::context_block(&resolved));
        if let Some(block) = sections::strict_knowledge_block(state, knowledge) {
            push_block(block);
        }
        if let Some(block) = sections::smart_knowledge_block(state, knowledge) {
            push_block(block);
        }
        push_block(Self::journey_clause(&resolved));
        push_block(Self::strategy_block(&resolved, taxonomy));
        push_block(Self::conversion_block(&resolved));
        if let Some(block) = sections::geo_clause(&resolved) {
            push_block(block);
        }
        push_block(Self::tone_clause(&resolved));
        push_block(Self::requirements_block(&resolved, format));
        if let Some(block) = sections::multimodal_clause(state, taxonomy) {
            push_block(block);
        }
        if let Some(block) = sections::atomization_clause(state, taxonomy) {
            push_block(block);
        }
        if let Some(block) = sections::image_prompt_clause(&resolved) {
            push_block(block);
        }

        doc.trim().to_string()
    }

    fn persona_header(resolved: &ResolvedSelection<'_>) -> String {
        let mut out = String::new();
        if let Some(role) = resolved.role {
            out.push_str(&format!("You are {}: {}.", role.name, role.description));
        }
        if let Some(tone) = resolved.brand_tone {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!(
                "Your brand voice is {}: {}.",
                tone.name, tone.description
            ));
        }
        out
    }

    fn task_statement(resolved: &ResolvedSelection<'_>) -> String {
        match (resolved.writing_style, resolved.primary_channel) {
            (Some(style), Some(channel)) => format!(
                "Write a {} for publication on {} ({}).",
                style.name, channel.name, channel.description
            ),
            (Some(style), None) => format!("Write a {}.", style.name),
            (None, Some(channel)) => format!("Write a piece for publication on {}.", channel.name),
            (None, None) => String::new(),
        }
    }

    /// Pain-point copy: operator override first, then the industry entry's
    /// curated text, verbatim.
    fn resolved_pain<'a>(resolved: &ResolvedSelection<'a>) -> &'a str {
        let custom = resolved.state.custom_pain_point.trim();
        if !custom.is_empty() {
            return custom;
        }
        resolved
            .industry
            .and_then(|opt| opt.pain_points())
            .unwrap_or("")
    }

    fn context_block(resolved: &ResolvedSelection<'_>) -> String {
        let mut out = String::from("## Context\n");
        if let Some(product) = resolved.product {
            out.push_str(&format!(
                "- Product: {}: {}\n",
                product.name, product.description
            ));
        }
        if let Some(industry) = resolved.industry {
            let pain = Self::resolved_pain(resolved);
            if pain.is_empty() {
                out.push_str(&format!("- Industry: {}\n", industry.name));
            } else {
                out.push_str(&format!(
                    "- Industry: {}; pain points to anchor on: {}\n",
                    industry.name, pain
                ));
            }
        }
        let custom_audience = resolved.state.custom_audience.trim();
        if !custom_audience.is_empty() {
            out.push_str(&format!("- Audience: {custom_audience}\n"));
        } else if let Some(audience) = resolved.audience {
            out.push_str(&format!(
                "- Audience: {}: {}\n",
                audience.name, audience.description
            ));
        }
        if let Some(words) = resolved.word_count {
            out.push_str(&format!("- Target length: {}\n", words.name));
        }
        if let Some(language) = resolved.language {
            out.push_str(&format!("- Language: {}\n", language.name));
        }
        if let Some(layout) = resolved.layout_style {
            if let OptionDetail::Layout { style_text } = &layout.detail {
                out.push_str(&format!("- Layout: {}: {}\n", layout.name, style_text));
            }
        }
        let author = resolved.state.author_name.trim();
        if !author.is_empty() {
            out.push_str(&format!("- Author byline: {author}\n"));
        }
        if out == "## Context\n" {
            return String::new();
        }
        out
    }

    fn journey_clause(resolved: &ResolvedSelection<'_>) -> String {
        match resolved.journey_stage {
            Some(stage) => format!(
                "## Reader journey\nThe reader is at the {} stage: {}. Meet them there; do not pitch past it.",
                stage.name, stage.description
            ),
            None => String::new(),
        }
    }

    fn strategy_block(resolved: &ResolvedSelection<'_>, taxonomy: &Taxonomy) -> String {
        let state = resolved.state;
        let mut out = String::from("## Strategy\n");

        let pain = Self::resolved_pain(resolved);
        if !pain.is_empty() {
            out.push_str(&format!("- Pain point to press: {pain}\n"));
        }

        let value_prop = state.custom_value_prop.trim();
        if value_prop.is_empty() {
            out.push_str(
                "- Value proposition: distill the single clearest benefit from the product description above.\n",
            );
        } else {
            out.push_str(&format!("- Value proposition: {value_prop}\n"));
        }

        let market_value = state.custom_market_value.trim();
        if market_value.is_empty() {
            out.push_str(
                "- Market value: frame the measurable business impact in the reader's own terms.\n",
            );
        } else {
            out.push_str(&format!("- Market value: {market_value}\n"));
        }

        let scenarios = state.custom_scenarios.trim();
        if scenarios.is_empty() {
            out.push_str(
                "- Core scenarios: pick the two usage scenarios this audience will recognize immediately.\n",
            );
        } else {
            out.push_str(&format!("- Core scenarios: {scenarios}\n"));
        }

        let proof = state.custom_proof.trim();
        if proof.is_empty() {
            out.push_str(
                "- Trust proof: use the strongest available public proof; never invent numbers.\n",
            );
        } else {
            out.push_str(&format!("- Trust proof: {proof}\n"));
        }

        out.push_str(&sections::competitor_clause(state, taxonomy));
        out.push('\n');
        out
    }

    fn conversion_block(resolved: &ResolvedSelection<'_>) -> String {
        let mut out = String::from("## Conversion\n");
        if let Some(cta) = resolved.cta_strategy {
            let link = resolved.state.cta_link.trim();
            let link = if link.is_empty() { CTA_LINK_PLACEHOLDER } else { link };
            out.push_str(&format!(
                "- CTA strategy: {}; send readers to {}\n",
                cta.name, link
            ));
        }
        if let Some(hook) = resolved.opening_hook {
            out.push_str(&format!(
                "- Opening hook: {}: {}\n",
                hook.name, hook.description
            ));
        }
        if out == "## Conversion\n" {
            return String::new();
        }
        out
    }

    fn tone_clause(resolved: &ResolvedSelection<'_>) -> String {
        match resolved.brand_tone {
            Some(tone) => format!(
                "## Tone\nKeep the {} voice throughout: {}. No filler, no unearned superlatives.",
                tone.name, tone.description
            ),
            None => String::new(),
        }
    }

    fn requirements_block(resolved: &ResolvedSelection<'_>, format: OutputFormat) -> String {
        let mut out = String::from("## Output requirements\n");
        out.push_str(&sections::requirements_list(resolved.state));
        out.push('\n');

        for line in sections::image_lines(resolved.state, format) {
            out.push('\n');
            out.push_str(&line);
        }

        out.push('\n');
        out.push_str(&sections::cta_block(resolved, format));
        out.push('\n');
        out
    }
}

/// Convenience wrapper over a default composer
pub fn compose(state: &SelectionState, taxonomy: &Taxonomy, knowledge: &KnowledgeStore) -> String {
    PromptComposer::new().compose(state, taxonomy, knowledge)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::knowledge::RefMode;
    use crate::taxonomy::Axis;

    fn fixtures() -> (Taxonomy, KnowledgeStore) {
        (Taxonomy::builtin(), KnowledgeStore::new())
    }

    #[test]
    fn test_COMPOSE_001_identical_inputs_identical_output() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.industry = Some("finance".to_string());
        state.competitors.push("acme-crm".to_string());
        state.geo_question = "What does migration cost?".to_string();

        let first = compose(&state, &tax, &know);
        let second = compose(&state, &tax, &know);
        assert_eq!(first, second);
    }

    #[test]
    fn test_COMPOSE_002_output_trimmed() {
        let (tax, know) = fixtures();
        let doc = compose(&SelectionState::new(), &tax, &know);
        assert_eq!(doc, doc.trim());
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_COMPOSE_003_default_state_has_fixed_section_order() {
        let (tax, know) = fixtures();
        let doc = compose(&SelectionState::new(), &tax, &know);

        let order = [
            "You are ",
            "## Context",
            "## Reader journey",
            "## Strategy",
            "## Conversion",
            "## Tone",
            "## Output requirements",
        ];
        let mut last = 0;
        for marker in order {
            let pos = doc.find(marker).unwrap_or_else(|| panic!("missing {marker}"));
            assert!(pos >= last, "{marker} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_COMPOSE_004_conditional_sections_absent_by_default() {
        let (tax, know) = fixtures();
        let doc = compose(&SelectionState::new(), &tax, &know);
        assert!(!doc.contains("## Mandatory constraints"));
        assert!(!doc.contains("## Contextual reference"));
        assert!(!doc.contains("## Answer-engine optimization"));
        assert!(!doc.contains("## Multimodal assets"));
        assert!(!doc.contains("## Channel atomization"));
        assert!(!doc.contains("## Image generation prompts"));
        assert!(!doc.contains("Insert this image"));
    }

    #[test]
    fn test_COMPOSE_005_clause_omission_roundtrip() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.multimodal.push("audio".to_string());
        state.distribution_channels.push("x-thread".to_string());
        state.show_image_prompts = true;
        state.enable_schema_markup = true;

        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("## Multimodal assets"));
        assert!(doc.contains("## Channel atomization"));
        assert!(doc.contains("## Image generation prompts"));
        assert!(doc.contains("## Answer-engine optimization"));

        state.multimodal.clear();
        state.distribution_channels.clear();
        state.show_image_prompts = false;
        state.enable_schema_markup = false;
        let doc = compose(&state, &tax, &know);
        assert!(!doc.contains("## Multimodal assets"));
        assert!(!doc.contains("## Channel atomization"));
        assert!(!doc.contains("## Image generation prompts"));
        assert!(!doc.contains("## Answer-engine optimization"));
    }

    #[test]
    fn test_COMPOSE_006_knowledge_partition_exact() {
        let (tax, mut know) = fixtures();
        let strict_id = know
            .insert("Pricing floor", "Never quote below $29 per seat.", RefMode::Strict)
            .id
            .clone();
        let smart_id = know
            .insert("Tone notes", "We prefer concrete verbs over adjectives.", RefMode::Smart)
            .id
            .clone();

        let mut state = SelectionState::new();
        state.knowledge_refs = vec![strict_id, smart_id];
        let doc = compose(&state, &tax, &know);

        let strict_at = doc.find("## Mandatory constraints").unwrap();
        let smart_at = doc.find("## Contextual reference").unwrap();
        let strict_block = &doc[strict_at..smart_at];
        let smart_block = &doc[smart_at..];

        assert!(strict_block.contains("Pricing floor"));
        assert!(strict_block.contains("Never quote below $29 per seat."));
        assert!(!strict_block.contains("Tone notes"));
        assert!(smart_block.contains("Tone notes"));
        assert!(smart_block.contains("concrete verbs"));
        assert!(!smart_block.contains("Pricing floor"));
    }

    #[test]
    fn test_COMPOSE_007_archived_knowledge_skipped() {
        let (tax, mut know) = fixtures();
        let id = know
            .insert("Old claims", "Superseded benchmark results.", RefMode::Strict)
            .id
            .clone();
        know.set_archived(&id, true).unwrap();

        let mut state = SelectionState::new();
        state.knowledge_refs = vec![id];
        let doc = compose(&state, &tax, &know);
        assert!(!doc.contains("## Mandatory constraints"));
        assert!(!doc.contains("Old claims"));
    }

    #[test]
    fn test_COMPOSE_008_industry_pain_points_verbatim() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.industry = Some("finance".to_string());

        let doc = compose(&state, &tax, &know);
        let stored = tax
            .find(Axis::Industry, "finance")
            .unwrap()
            .pain_points()
            .unwrap();
        assert!(doc.contains(&format!("pain points to anchor on: {stored}")));
    }

    #[test]
    fn test_COMPOSE_009_custom_pain_point_wins() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.industry = Some("finance".to_string());
        state.custom_pain_point = "quarter-end reporting chaos".to_string();

        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("quarter-end reporting chaos"));
        assert!(!doc.contains("compliance pressure, audit trails"));
    }

    #[test]
    fn test_COMPOSE_010_no_competitor_literal() {
        let (tax, know) = fixtures();
        let doc = compose(&SelectionState::new(), &tax, &know);
        assert!(doc.contains(NO_COMPETITOR_SENTENCE));
        assert!(!doc.contains("Differentiation to work in"));
    }

    #[test]
    fn test_COMPOSE_011_format_duality_only_changes_snippets() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.hero_image.url = "https://cdn.example.com/hero.png".to_string();
        state.hero_image.link = "https://example.com/lp".to_string();
        state.cta_link = "https://example.com/try".to_string();

        state.output_format = Some("html".to_string());
        let html_doc = compose(&state, &tax, &know);
        state.output_format = Some("markdown".to_string());
        let md_doc = compose(&state, &tax, &know);

        assert!(html_doc.contains("<img src=\"https://cdn.example.com/hero.png\""));
        assert!(md_doc.contains("[![image](https://cdn.example.com/hero.png)](https://example.com/lp)"));
        assert!(!md_doc.contains("<img"));
        assert!(!md_doc.contains("<div"));

        // Prose around the injected snippets is identical across dialects
        let strip = |doc: &str| -> Vec<String> {
            doc.lines()
                .filter(|line| {
                    !line.contains("<img")
                        && !line.contains("<div")
                        && !line.contains("![image]")
                        && !line.contains("> **[")
                })
                .map(|line| line.to_string())
                .collect()
        };
        assert_eq!(strip(&html_doc), strip(&md_doc));
    }

    #[test]
    fn test_COMPOSE_012_requirements_renumbering() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.sections.meta = false;

        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("1. Headline set"));
        assert!(doc.contains("2. Body"));
        assert!(doc.contains("3. Quotable lines"));
        assert!(!doc.contains("Meta summary"));
    }

    #[test]
    fn test_COMPOSE_013_custom_audience_precedence() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.audience = Some("developers".to_string());
        state.custom_audience = "staff engineers evaluating build-vs-buy".to_string();

        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("- Audience: staff engineers evaluating build-vs-buy"));
        assert!(!doc.contains("read the docs first"));
    }

    #[test]
    fn test_COMPOSE_014_author_line_conditional() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        let doc = compose(&state, &tax, &know);
        assert!(!doc.contains("Author byline"));

        state.author_name = "R. Alvarez".to_string();
        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("- Author byline: R. Alvarez"));
    }

    #[test]
    fn test_COMPOSE_015_empty_taxonomy_never_panics() {
        let know = KnowledgeStore::new();
        let tax = Taxonomy::empty();
        let mut state = SelectionState::new();
        state.competitors.push("acme-crm".to_string());
        state.show_image_prompts = true;
        state.geo_question = "anything".to_string();

        let doc = compose(&state, &tax, &know);
        // Degraded but valid: requirements always render
        assert!(doc.contains("## Output requirements"));
    }

    #[test]
    fn test_COMPOSE_016_stale_multi_ids_skipped_silently() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.multimodal.push("vanished-option".to_string());
        state.distribution_channels.push("vanished-channel".to_string());
        let doc = compose(&state, &tax, &know);
        assert!(!doc.contains("## Multimodal assets"));
        assert!(!doc.contains("## Channel atomization"));
    }

    #[test]
    fn test_COMPOSE_017_unknown_knowledge_ref_skipped() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.knowledge_refs.push("no-such-item".to_string());
        let doc = compose(&state, &tax, &know);
        assert!(!doc.contains("## Mandatory constraints"));
        assert!(!doc.contains("## Contextual reference"));
    }

    #[test]
    fn test_COMPOSE_018_video_link_referenced() {
        let (tax, know) = fixtures();
        let mut state = SelectionState::new();
        state.multimodal.push("video".to_string());
        state.video_link = "https://video.example.com/walkthrough".to_string();
        let doc = compose(&state, &tax, &know);
        assert!(doc.contains("https://video.example.com/walkthrough"));
    }
}
