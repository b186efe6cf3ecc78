//! Conditional clause builders for the composed instruction.
//!
//! Every builder returns `Option<String>` when its section can vanish:
//! `None` means the section is omitted entirely, never emitted as an empty
//! header. Builders are pure and never fail.

use super::format::OutputFormat;
use crate::knowledge::{KnowledgeItem, KnowledgeStore, RefMode};
use crate::selection::{ImageSlot, ResolvedSelection, SelectionState};
use crate::taxonomy::{Axis, CatalogOption, MultimodalKind, Taxonomy};

/// Emitted verbatim when no competitor is selected and no manual name is set
pub const NO_COMPETITOR_SENTENCE: &str = "Make no specific competitor comparison.";

/// Fallback click-through target when the operator left the CTA link blank
pub const CTA_LINK_PLACEHOLDER: &str = "https://example.com/contact";

/// Strip one trailing parenthetical suffix from a display name.
///
/// Handles ASCII and fullwidth parentheses; catalog names carry strategy
/// qualifiers there that must not appear on a rendered button.
pub fn strip_parenthetical(name: &str) -> String {
    let cut = name.find('(').or_else(|| name.find('（'));
    match cut {
        Some(idx) => name[..idx].trim_end().to_string(),
        None => name.trim().to_string(),
    }
}

/// Selected catalog competitors, unknown ids skipped
fn selected_competitors<'a>(
    state: &SelectionState,
    taxonomy: &'a Taxonomy,
) -> Vec<&'a CatalogOption> {
    state
        .competitors
        .iter()
        .filter_map(|id| taxonomy.find(Axis::Competitor, id))
        .collect()
}

/// The competitor clause of the strategy block. Always yields text; the
/// empty-selection case is the literal no-comparison sentence.
pub fn competitor_clause(state: &SelectionState, taxonomy: &Taxonomy) -> String {
    let catalog = selected_competitors(state, taxonomy);
    let manual = state.manual_competitor.trim();

    let mut names: Vec<&str> = catalog.iter().map(|opt| opt.name.as_str()).collect();
    if !manual.is_empty() {
        names.push(manual);
    }

    if names.is_empty() {
        return NO_COMPETITOR_SENTENCE.to_string();
    }

    let listed = names.join(", ");
    let mut clause = if state.show_competitor_name {
        format!(
            "Compare explicitly against {listed}, naming them where the contrast helps the reader."
        )
    } else {
        format!(
            "Compare implicitly against {listed}: make our relative strengths obvious without printing any competitor name in the output."
        )
    };

    if state.expand_competitor_detail && !catalog.is_empty() {
        clause.push_str("\nDifferentiation to work in:");
        for opt in &catalog {
            if let Some(edge) = opt.edge() {
                clause.push_str(&format!("\n- vs {}: {}", opt.name, edge));
            }
        }
    }

    clause
}

/// Instruction lines injecting the three image slots, empty slots skipped
pub fn image_lines(state: &SelectionState, format: OutputFormat) -> Vec<String> {
    let slots: [(&str, &ImageSlot); 3] = [
        ("at the top of the piece", &state.hero_image),
        ("mid-body, where it supports the argument", &state.body_image),
        ("just before the closing section", &state.footer_image),
    ];
    slots
        .iter()
        .filter(|(_, slot)| slot.is_set())
        .map(|(position, slot)| {
            format!(
                "Insert this image {position}: {}",
                format.image_snippet(slot.url.trim(), &slot.link)
            )
        })
        .collect()
}

/// The call-to-action snippet instruction
pub fn cta_block(resolved: &ResolvedSelection<'_>, format: OutputFormat) -> String {
    let link = resolved.state.cta_link.trim();
    let link = if link.is_empty() { CTA_LINK_PLACEHOLDER } else { link };
    let label = resolved
        .cta_strategy
        .map(|opt| strip_parenthetical(&opt.name))
        .unwrap_or_else(|| "Learn more".to_string());
    format!(
        "Close with this call to action, rendered exactly as given:\n{}",
        format.cta_snippet(&label, link)
    )
}

/// Knowledge items selected on the state, partitioned by reference mode.
/// Archived and unknown ids are skipped.
fn selected_knowledge<'a>(
    state: &SelectionState,
    store: &'a KnowledgeStore,
    mode: RefMode,
) -> Vec<&'a KnowledgeItem> {
    state
        .knowledge_refs
        .iter()
        .filter_map(|id| store.get(id))
        .filter(|item| !item.is_archived && item.ref_mode == mode)
        .collect()
}

fn knowledge_listing(items: &[&KnowledgeItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("### {}\n{}\n", item.title, item.content.trim()));
    }
    out
}

/// Mandatory-constraints block for strict knowledge entries
pub fn strict_knowledge_block(state: &SelectionState, store: &KnowledgeStore) -> Option<String> {
    let items = selected_knowledge(state, store, RefMode::Strict);
    if items.is_empty() {
        return None;
    }
    Some(format!(
        "## Mandatory constraints\nThe following reference material is non-negotiable. Every claim in the piece must stay consistent with it; where it conflicts with anything else, it wins.\n{}",
        knowledge_listing(&items)
    ))
}

/// Contextual-reference block for smart knowledge entries
pub fn smart_knowledge_block(state: &SelectionState, store: &KnowledgeStore) -> Option<String> {
    let items = selected_knowledge(state, store, RefMode::Smart);
    if items.is_empty() {
        return None;
    }
    Some(format!(
        "## Contextual reference\nDraw on the following material where it strengthens the piece; treat it as optional background, not as constraints.\n{}",
        knowledge_listing(&items)
    ))
}

/// Answer-engine optimization clause; omitted unless a question, keywords or
/// the schema toggle is set
pub fn geo_clause(resolved: &ResolvedSelection<'_>) -> Option<String> {
    let state = resolved.state;
    let question = state.geo_question.trim();
    let keywords = state.geo_keywords.trim();
    if question.is_empty() && keywords.is_empty() && !state.enable_schema_markup {
        return None;
    }

    let mut out = String::from("## Answer-engine optimization\n");
    if let Some(structure) = resolved.answer_structure {
        out.push_str(&format!(
            "Structure answers as {}: {}.\n",
            structure.name, structure.description
        ));
    }
    if !question.is_empty() {
        out.push_str(&format!(
            "Core question the piece must answer directly: {question}\n"
        ));
    }
    if !keywords.is_empty() {
        out.push_str(&format!("Work in these keywords naturally: {keywords}\n"));
    }
    if state.enable_schema_markup {
        out.push_str(
            "Include structured markup (JSON-LD) describing the piece so answer engines can parse it.\n",
        );
    }
    Some(out)
}

/// Image-generation-prompt clause; omitted unless the toggle is on
pub fn image_prompt_clause(resolved: &ResolvedSelection<'_>) -> Option<String> {
    if !resolved.state.show_image_prompts {
        return None;
    }
    let style = ResolvedSelection::name_of(resolved.image_style);
    let ratio = ResolvedSelection::name_of(resolved.aspect_ratio);
    Some(format!(
        "## Image generation prompts\nAppend three ready-to-use image generation prompts matching the piece, in the {style} style, {ratio} aspect ratio. One per major section.\n"
    ))
}

/// Multimodal clause; one line per selected option, dispatched on kind
pub fn multimodal_clause(state: &SelectionState, taxonomy: &Taxonomy) -> Option<String> {
    let options: Vec<&CatalogOption> = state
        .multimodal
        .iter()
        .filter_map(|id| taxonomy.find(Axis::Multimodal, id))
        .collect();
    if options.is_empty() {
        return None;
    }

    let mut out = String::from("## Multimodal assets\n");
    for opt in options {
        let line = match opt.multimodal_kind() {
            Some(MultimodalKind::Video) if !state.video_link.trim().is_empty() => {
                format!(
                    "- Embed and reference the video at {} where it carries the argument.",
                    state.video_link.trim()
                )
            }
            Some(MultimodalKind::Interactive) if !state.interactive_goal.trim().is_empty() => {
                format!(
                    "- Propose an interactive element built around this goal: {}.",
                    state.interactive_goal.trim()
                )
            }
            _ => format!("- {}: {}.", opt.name, opt.description),
        };
        out.push_str(&line);
        out.push('\n');
    }
    Some(out)
}

/// Atomization clause: one derivative instruction per distribution channel
pub fn atomization_clause(state: &SelectionState, taxonomy: &Taxonomy) -> Option<String> {
    let channels: Vec<&CatalogOption> = state
        .distribution_channels
        .iter()
        .filter_map(|id| taxonomy.find(Axis::DistributionChannel, id))
        .collect();
    if channels.is_empty() {
        return None;
    }

    let mut out = String::from("## Channel atomization\nAfter the main piece, derive:\n");
    for channel in channels {
        out.push_str(&format!("- {}: {}\n", channel.name, channel.description));
    }
    Some(out)
}

/// The contiguous, renumbered output-requirements list
pub fn requirements_list(state: &SelectionState) -> String {
    let mut items: Vec<&str> = Vec::new();
    if state.sections.headlines {
        items.push("Headline set: three candidate headlines, each under 60 characters, each taking a different angle.");
    }
    if state.sections.meta {
        items.push("Meta summary: one SEO description under 160 characters.");
    }
    items.push("Body: the full piece at the target length, following every constraint above.");
    if state.sections.quotes {
        items.push("Quotable lines: three standalone one-liners lifted from or distilled out of the body.");
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::selection::SelectionState;
    use crate::taxonomy::Taxonomy;

    fn state_with_competitors(ids: &[&str]) -> SelectionState {
        let mut state = SelectionState::new();
        for id in ids {
            state.competitors.push(id.to_string());
        }
        state
    }

    #[test]
    fn test_SECT_001_no_competitor_literal_sentence() {
        let tax = Taxonomy::builtin();
        let state = SelectionState::new();
        assert_eq!(competitor_clause(&state, &tax), NO_COMPETITOR_SENTENCE);
    }

    #[test]
    fn test_SECT_002_explicit_competitor_names_all() {
        let tax = Taxonomy::builtin();
        let mut state = state_with_competitors(&["acme-crm", "pipeflow"]);
        state.manual_competitor = "ShadowCo".to_string();
        let clause = competitor_clause(&state, &tax);
        assert!(clause.contains("Compare explicitly"));
        assert!(clause.contains("Acme CRM"));
        assert!(clause.contains("Pipeflow"));
        assert!(clause.contains("ShadowCo"));
    }

    #[test]
    fn test_SECT_003_implicit_mode_forbids_printing_names() {
        let tax = Taxonomy::builtin();
        let mut state = state_with_competitors(&["acme-crm"]);
        state.show_competitor_name = false;
        let clause = competitor_clause(&state, &tax);
        assert!(clause.contains("implicitly"));
        assert!(clause.contains("without printing any competitor name"));
    }

    #[test]
    fn test_SECT_004_expand_detail_adds_edge_bullets() {
        let tax = Taxonomy::builtin();
        let mut state = state_with_competitors(&["acme-crm", "pipeflow"]);
        state.expand_competitor_detail = true;
        let clause = competitor_clause(&state, &tax);
        assert!(clause.contains("- vs Acme CRM:"));
        assert!(clause.contains("- vs Pipeflow:"));
        assert!(clause.contains("days, not quarters"));
    }

    #[test]
    fn test_SECT_005_expand_detail_needs_catalog_competitor() {
        let tax = Taxonomy::builtin();
        let mut state = SelectionState::new();
        state.manual_competitor = "ShadowCo".to_string();
        state.expand_competitor_detail = true;
        let clause = competitor_clause(&state, &tax);
        assert!(!clause.contains("Differentiation"));
    }

    #[test]
    fn test_SECT_006_unknown_competitor_ids_skipped() {
        let tax = Taxonomy::builtin();
        let state = state_with_competitors(&["deleted-rival"]);
        assert_eq!(competitor_clause(&state, &tax), NO_COMPETITOR_SENTENCE);
    }

    #[test]
    fn test_SECT_007_strip_parenthetical() {
        assert_eq!(strip_parenthetical("Start a free trial (low friction)"), "Start a free trial");
        assert_eq!(strip_parenthetical("预约演示（销售主导）"), "预约演示");
        assert_eq!(strip_parenthetical("Plain label"), "Plain label");
    }

    #[test]
    fn test_SECT_008_image_lines_skip_empty_slots() {
        let mut state = SelectionState::new();
        state.body_image.url = "https://cdn.example.com/mid.png".to_string();
        let lines = image_lines(&state, OutputFormat::Markdown);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("mid-body"));
        assert!(lines[0].contains("![image](https://cdn.example.com/mid.png)"));
    }

    #[test]
    fn test_SECT_009_requirements_renumber_without_gaps() {
        let mut state = SelectionState::new();
        state.sections.meta = false;
        let list = requirements_list(&state);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1. Headline set"));
        assert!(lines[1].starts_with("2. Body"));
        assert!(lines[2].starts_with("3. Quotable lines"));
    }

    #[test]
    fn test_SECT_010_body_always_present() {
        let mut state = SelectionState::new();
        state.sections.headlines = false;
        state.sections.meta = false;
        state.sections.quotes = false;
        let list = requirements_list(&state);
        assert_eq!(list.lines().count(), 1);
        assert!(list.starts_with("1. Body"));
    }

    #[test]
    fn test_SECT_011_geo_clause_triggers() {
        let tax = Taxonomy::builtin();
        let mut state = SelectionState::new();
        assert!(geo_clause(&state.resolve(&tax)).is_none());

        state.geo_question = "What does onboarding cost?".to_string();
        let clause = geo_clause(&state.resolve(&tax)).unwrap();
        assert!(clause.contains("What does onboarding cost?"));
        assert!(!clause.contains("JSON-LD"));

        state.geo_question.clear();
        state.enable_schema_markup = true;
        let clause = geo_clause(&state.resolve(&tax)).unwrap();
        assert!(clause.contains("JSON-LD"));
    }

    #[test]
    fn test_SECT_012_multimodal_dispatch() {
        let tax = Taxonomy::builtin();
        let mut state = SelectionState::new();
        assert!(multimodal_clause(&state, &tax).is_none());

        state.multimodal = vec!["video".to_string(), "interactive".to_string(), "audio".to_string()];
        state.video_link = "https://video.example.com/demo".to_string();
        let clause = multimodal_clause(&state, &tax).unwrap();
        assert!(clause.contains("https://video.example.com/demo"));
        // No goal set: interactive falls back to its generic description
        assert!(clause.contains("Interactive Element"));
        assert!(clause.contains("Audio Companion"));

        state.interactive_goal = "estimate rollout savings".to_string();
        let clause = multimodal_clause(&state, &tax).unwrap();
        assert!(clause.contains("estimate rollout savings"));
        assert!(!clause.contains("Interactive Element:"));
    }

    #[test]
    fn test_SECT_013_atomization_lists_each_channel() {
        let tax = Taxonomy::builtin();
        let mut state = SelectionState::new();
        assert!(atomization_clause(&state, &tax).is_none());

        state.distribution_channels = vec!["x-thread".to_string(), "email-digest".to_string()];
        let clause = atomization_clause(&state, &tax).unwrap();
        assert!(clause.contains("X Thread"));
        assert!(clause.contains("Email Digest Blurb"));
        assert_eq!(clause.matches("- ").count(), 2);
    }

    #[test]
    fn test_SECT_014_cta_defaults_link_and_strips_label() {
        let tax = Taxonomy::builtin();
        let mut state = SelectionState::new();
        state.cta_strategy = Some("free-trial".to_string());
        let resolved = state.resolve(&tax);
        let block = cta_block(&resolved, OutputFormat::Markdown);
        assert!(block.contains(CTA_LINK_PLACEHOLDER));
        assert!(block.contains("[Start a free trial]"));
        assert!(!block.contains("low friction"));
    }
}
