//! Command logic behind the binary.
//!
//! Everything a test needs to drive lives here; main.rs keeps argument
//! parsing and terminal display.

use crate::config::DefaultsConfig;
use crate::selection::SelectionState;
use crate::taxonomy::{Axis, Taxonomy};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

// ============================================================================
// State File Management
// ============================================================================

/// Fresh working state seeded with the configured defaults
pub fn initial_state(defaults: &DefaultsConfig) -> SelectionState {
    let mut state = SelectionState::new();
    state.language = Some(defaults.language.clone());
    state.word_count = Some(defaults.word_count.clone());
    state
}

/// Restore the operator's working state from disk; a missing file is a fresh
/// state seeded from the configured defaults, not an error.
pub fn load_state_file(path: &Path, defaults: &DefaultsConfig) -> Result<SelectionState> {
    if !path.exists() {
        return Ok(initial_state(defaults));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing state file {}", path.display()))
}

/// Persist the operator's working state to disk
pub fn save_state_file(path: &Path, state: &SelectionState) -> Result<()> {
    let raw = serde_json::to_string_pretty(state)?;
    std::fs::write(path, raw)
        .with_context(|| format!("writing state file {}", path.display()))?;
    info!(path = %path.display(), "state saved");
    Ok(())
}

// ============================================================================
// Selection Mutations
// ============================================================================

/// Apply a `select` command: set a single-select axis or toggle membership
/// in a multi-select one. The id must exist in the catalog (knowledge refs
/// are accepted verbatim; they resolve against the knowledge store later).
pub fn apply_select(
    state: &mut SelectionState,
    taxonomy: &Taxonomy,
    axis: Axis,
    id: &str,
) -> Result<()> {
    if axis.is_catalog_backed() && taxonomy.find(axis, id).is_none() {
        bail!("no option '{}' on axis {}", id, axis);
    }
    if axis.is_multi() {
        state.toggle_multi(axis, id);
    } else {
        state.set_single(axis, Some(id.to_string()));
    }
    Ok(())
}

/// Apply a `clear` command: drop a single-select choice (falling back to the
/// axis default) or empty a multi-select set.
pub fn apply_clear(state: &mut SelectionState, axis: Axis) {
    if axis.is_multi() {
        let ids: Vec<String> = state.multi_ids(axis).to_vec();
        for id in ids {
            state.toggle_multi(axis, &id);
        }
    } else {
        state.set_single(axis, None);
    }
}

/// Apply a `set` command: write one free-text field by its kebab-case name
pub fn apply_set(state: &mut SelectionState, field: &str, value: &str) -> Result<()> {
    let slot: &mut String = match field {
        "custom-audience" => &mut state.custom_audience,
        "custom-pain-point" => &mut state.custom_pain_point,
        "custom-value-prop" => &mut state.custom_value_prop,
        "custom-market-value" => &mut state.custom_market_value,
        "custom-scenarios" => &mut state.custom_scenarios,
        "custom-proof" => &mut state.custom_proof,
        "manual-competitor" => &mut state.manual_competitor,
        "geo-question" => &mut state.geo_question,
        "geo-keywords" => &mut state.geo_keywords,
        "author-name" => &mut state.author_name,
        "cta-link" => &mut state.cta_link,
        "video-link" => &mut state.video_link,
        "interactive-goal" => &mut state.interactive_goal,
        "hero-image-url" => &mut state.hero_image.url,
        "hero-image-link" => &mut state.hero_image.link,
        "body-image-url" => &mut state.body_image.url,
        "body-image-link" => &mut state.body_image.link,
        "footer-image-url" => &mut state.footer_image.url,
        "footer-image-link" => &mut state.footer_image.link,
        _ => bail!("unknown field '{}'", field),
    };
    *slot = value.to_string();
    Ok(())
}

/// Apply a `toggle` command: flip one boolean flag by its kebab-case name
pub fn apply_toggle(state: &mut SelectionState, flag: &str) -> Result<bool> {
    let slot: &mut bool = match flag {
        "show-competitor-name" => &mut state.show_competitor_name,
        "expand-competitor-detail" => &mut state.expand_competitor_detail,
        "enable-schema-markup" => &mut state.enable_schema_markup,
        "show-image-prompts" => &mut state.show_image_prompts,
        "headlines" => &mut state.sections.headlines,
        "meta" => &mut state.sections.meta,
        "quotes" => &mut state.sections.quotes,
        _ => bail!("unknown flag '{}'", flag),
    };
    *slot = !*slot;
    Ok(*slot)
}

/// All field names accepted by `set`, for help output
pub fn set_field_names() -> &'static [&'static str] {
    &[
        "custom-audience",
        "custom-pain-point",
        "custom-value-prop",
        "custom-market-value",
        "custom-scenarios",
        "custom-proof",
        "manual-competitor",
        "geo-question",
        "geo-keywords",
        "author-name",
        "cta-link",
        "video-link",
        "interactive-goal",
        "hero-image-url",
        "hero-image-link",
        "body-image-url",
        "body-image-link",
        "footer-image-url",
        "footer-image-link",
    ]
}

/// All flag names accepted by `toggle`, for help output
pub fn toggle_flag_names() -> &'static [&'static str] {
    &[
        "show-competitor-name",
        "expand-competitor-detail",
        "enable-schema-markup",
        "show-image-prompts",
        "headlines",
        "meta",
        "quotes",
    ]
}
