//! Selection state: the operator's current choice on every axis, plus
//! free-text overrides and toggles.
//!
//! Every field is serde-defaulted so partial documents from older state
//! files deserialize cleanly. Axis ids are stored as plain strings; they are
//! resolved against a taxonomy exactly once, at composition start.

use crate::taxonomy::{Axis, CatalogOption, Taxonomy};
use serde::{Deserialize, Serialize};

/// One of the three inline image slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSlot {
    /// Image URL; an empty string means the slot is unused
    #[serde(default)]
    pub url: String,
    /// Optional click-through link
    #[serde(default)]
    pub link: String,
}

impl ImageSlot {
    pub fn is_set(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Per-output-section checkboxes.
///
/// The body is always produced and has no checkbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSections {
    #[serde(default = "default_true")]
    pub headlines: bool,
    #[serde(default = "default_true")]
    pub meta: bool,
    #[serde(default = "default_true")]
    pub quotes: bool,
}

impl Default for OutputSections {
    fn default() -> Self {
        Self {
            headlines: true,
            meta: true,
            quotes: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// The mutable record of the operator's current configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    // Single-select axis ids. `None` means "use the axis default".
    pub role: Option<String>,
    pub product: Option<String>,
    pub industry: Option<String>,
    pub audience: Option<String>,
    pub journey_stage: Option<String>,
    pub brand_tone: Option<String>,
    pub writing_style: Option<String>,
    pub layout_style: Option<String>,
    pub primary_channel: Option<String>,
    pub output_format: Option<String>,
    pub word_count: Option<String>,
    pub language: Option<String>,
    pub cta_strategy: Option<String>,
    pub opening_hook: Option<String>,
    pub answer_structure: Option<String>,
    pub image_style: Option<String>,
    pub aspect_ratio: Option<String>,

    // Multi-select axis id sets.
    pub competitors: Vec<String>,
    pub knowledge_refs: Vec<String>,
    pub multimodal: Vec<String>,
    pub distribution_channels: Vec<String>,

    // Free-text overrides. Empty string means "not set".
    pub custom_audience: String,
    pub custom_pain_point: String,
    pub custom_value_prop: String,
    pub custom_market_value: String,
    pub custom_scenarios: String,
    pub custom_proof: String,
    pub manual_competitor: String,
    pub geo_question: String,
    pub geo_keywords: String,
    pub author_name: String,
    pub cta_link: String,
    pub video_link: String,
    pub interactive_goal: String,

    pub hero_image: ImageSlot,
    pub body_image: ImageSlot,
    pub footer_image: ImageSlot,

    // Toggles.
    pub show_competitor_name: bool,
    pub expand_competitor_detail: bool,
    pub enable_schema_markup: bool,
    pub show_image_prompts: bool,
    pub sections: OutputSections,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            role: None,
            product: None,
            industry: None,
            audience: None,
            journey_stage: None,
            brand_tone: None,
            writing_style: None,
            layout_style: None,
            primary_channel: None,
            output_format: None,
            word_count: None,
            language: None,
            cta_strategy: None,
            opening_hook: None,
            answer_structure: None,
            image_style: None,
            aspect_ratio: None,
            competitors: Vec::new(),
            knowledge_refs: Vec::new(),
            multimodal: Vec::new(),
            distribution_channels: Vec::new(),
            custom_audience: String::new(),
            custom_pain_point: String::new(),
            custom_value_prop: String::new(),
            custom_market_value: String::new(),
            custom_scenarios: String::new(),
            custom_proof: String::new(),
            manual_competitor: String::new(),
            geo_question: String::new(),
            geo_keywords: String::new(),
            author_name: String::new(),
            cta_link: String::new(),
            video_link: String::new(),
            interactive_goal: String::new(),
            hero_image: ImageSlot::default(),
            body_image: ImageSlot::default(),
            footer_image: ImageSlot::default(),
            show_competitor_name: true,
            expand_competitor_detail: false,
            enable_schema_markup: false,
            show_image_prompts: false,
            sections: OutputSections::default(),
        }
    }
}

impl SelectionState {
    /// Fresh state: no explicit choices, name-showing on, all output
    /// sections enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored id for a single-select axis
    pub fn single_id(&self, axis: Axis) -> Option<&str> {
        let field = match axis {
            Axis::Role => &self.role,
            Axis::Product => &self.product,
            Axis::Industry => &self.industry,
            Axis::Audience => &self.audience,
            Axis::JourneyStage => &self.journey_stage,
            Axis::BrandTone => &self.brand_tone,
            Axis::WritingStyle => &self.writing_style,
            Axis::LayoutStyle => &self.layout_style,
            Axis::PrimaryChannel => &self.primary_channel,
            Axis::OutputFormat => &self.output_format,
            Axis::WordCount => &self.word_count,
            Axis::Language => &self.language,
            Axis::CtaStrategy => &self.cta_strategy,
            Axis::OpeningHook => &self.opening_hook,
            Axis::AnswerStructure => &self.answer_structure,
            Axis::ImageStyle => &self.image_style,
            Axis::AspectRatio => &self.aspect_ratio,
            _ => return None,
        };
        field.as_deref()
    }

    /// Set or clear the stored id for a single-select axis.
    ///
    /// Ignored for multi-select axes; use [`SelectionState::toggle_multi`].
    pub fn set_single(&mut self, axis: Axis, id: Option<String>) {
        let field = match axis {
            Axis::Role => &mut self.role,
            Axis::Product => &mut self.product,
            Axis::Industry => &mut self.industry,
            Axis::Audience => &mut self.audience,
            Axis::JourneyStage => &mut self.journey_stage,
            Axis::BrandTone => &mut self.brand_tone,
            Axis::WritingStyle => &mut self.writing_style,
            Axis::LayoutStyle => &mut self.layout_style,
            Axis::PrimaryChannel => &mut self.primary_channel,
            Axis::OutputFormat => &mut self.output_format,
            Axis::WordCount => &mut self.word_count,
            Axis::Language => &mut self.language,
            Axis::CtaStrategy => &mut self.cta_strategy,
            Axis::OpeningHook => &mut self.opening_hook,
            Axis::AnswerStructure => &mut self.answer_structure,
            Axis::ImageStyle => &mut self.image_style,
            Axis::AspectRatio => &mut self.aspect_ratio,
            _ => return,
        };
        *field = id;
    }

    /// The id set for a multi-select axis
    pub fn multi_ids(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Competitor => &self.competitors,
            Axis::KnowledgeRef => &self.knowledge_refs,
            Axis::Multimodal => &self.multimodal,
            Axis::DistributionChannel => &self.distribution_channels,
            _ => &[],
        }
    }

    /// Toggle membership of an id in a multi-select axis set
    pub fn toggle_multi(&mut self, axis: Axis, id: &str) {
        let set = match axis {
            Axis::Competitor => &mut self.competitors,
            Axis::KnowledgeRef => &mut self.knowledge_refs,
            Axis::Multimodal => &mut self.multimodal,
            Axis::DistributionChannel => &mut self.distribution_channels,
            _ => return,
        };
        if let Some(pos) = set.iter().position(|existing| existing == id) {
            set.remove(pos);
        } else {
            set.push(id.to_string());
        }
    }

    /// Resolve every single-select axis once against `taxonomy`.
    pub fn resolve<'a>(&'a self, taxonomy: &'a Taxonomy) -> ResolvedSelection<'a> {
        let get = |axis: Axis| taxonomy.resolve(axis, self.single_id(axis));
        ResolvedSelection {
            state: self,
            role: get(Axis::Role),
            product: get(Axis::Product),
            industry: get(Axis::Industry),
            audience: get(Axis::Audience),
            journey_stage: get(Axis::JourneyStage),
            brand_tone: get(Axis::BrandTone),
            writing_style: get(Axis::WritingStyle),
            layout_style: get(Axis::LayoutStyle),
            primary_channel: get(Axis::PrimaryChannel),
            output_format: get(Axis::OutputFormat),
            word_count: get(Axis::WordCount),
            language: get(Axis::Language),
            cta_strategy: get(Axis::CtaStrategy),
            opening_hook: get(Axis::OpeningHook),
            answer_structure: get(Axis::AnswerStructure),
            image_style: get(Axis::ImageStyle),
            aspect_ratio: get(Axis::AspectRatio),
        }
    }
}

/// Every single-select axis resolved against a concrete taxonomy.
///
/// A `None` entry means the axis list was empty (degraded taxonomy); section
/// builders render an empty fragment for it rather than failing.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection<'a> {
    pub state: &'a SelectionState,
    pub role: Option<&'a CatalogOption>,
    pub product: Option<&'a CatalogOption>,
    pub industry: Option<&'a CatalogOption>,
    pub audience: Option<&'a CatalogOption>,
    pub journey_stage: Option<&'a CatalogOption>,
    pub brand_tone: Option<&'a CatalogOption>,
    pub writing_style: Option<&'a CatalogOption>,
    pub layout_style: Option<&'a CatalogOption>,
    pub primary_channel: Option<&'a CatalogOption>,
    pub output_format: Option<&'a CatalogOption>,
    pub word_count: Option<&'a CatalogOption>,
    pub language: Option<&'a CatalogOption>,
    pub cta_strategy: Option<&'a CatalogOption>,
    pub opening_hook: Option<&'a CatalogOption>,
    pub answer_structure: Option<&'a CatalogOption>,
    pub image_style: Option<&'a CatalogOption>,
    pub aspect_ratio: Option<&'a CatalogOption>,
}

impl<'a> ResolvedSelection<'a> {
    /// Name of a resolved option, or the empty string
    pub fn name_of(opt: Option<&CatalogOption>) -> &str {
        opt.map(|o| o.name.as_str()).unwrap_or("")
    }

    /// Description of a resolved option, or the empty string
    pub fn description_of(opt: Option<&CatalogOption>) -> &str {
        opt.map(|o| o.description.as_str()).unwrap_or("")
    }
}
