//! Option taxonomy: the catalog of selectable entities behind every
//! configuration axis of the authoring console.
//!
//! The taxonomy is an immutable value threaded explicitly through every
//! consumer. Loading and reloading happen at the edges; the composition
//! engine only ever sees a snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while addressing the taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaxonomyError {
    #[error("Unknown axis: {0}")]
    UnknownAxis(String),
}

// ============================================================================
// AXES
// ============================================================================

/// One independent configuration dimension of the console.
///
/// Seventeen axes are single-select; `Competitor`, `KnowledgeRef`,
/// `Multimodal` and `DistributionChannel` accept a set of ids.
/// `KnowledgeRef` ids address the knowledge store rather than the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Role,
    Product,
    Industry,
    Audience,
    JourneyStage,
    BrandTone,
    WritingStyle,
    LayoutStyle,
    PrimaryChannel,
    OutputFormat,
    WordCount,
    Language,
    CtaStrategy,
    OpeningHook,
    AnswerStructure,
    ImageStyle,
    AspectRatio,
    Competitor,
    KnowledgeRef,
    Multimodal,
    DistributionChannel,
}

impl Axis {
    /// All axes, in the order the console presents them
    pub fn all() -> Vec<Axis> {
        vec![
            Axis::Role,
            Axis::Product,
            Axis::Industry,
            Axis::Audience,
            Axis::JourneyStage,
            Axis::BrandTone,
            Axis::WritingStyle,
            Axis::LayoutStyle,
            Axis::PrimaryChannel,
            Axis::OutputFormat,
            Axis::WordCount,
            Axis::Language,
            Axis::CtaStrategy,
            Axis::OpeningHook,
            Axis::AnswerStructure,
            Axis::ImageStyle,
            Axis::AspectRatio,
            Axis::Competitor,
            Axis::KnowledgeRef,
            Axis::Multimodal,
            Axis::DistributionChannel,
        ]
    }

    /// Whether this axis accepts a set of ids instead of a single one
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            Axis::Competitor | Axis::KnowledgeRef | Axis::Multimodal | Axis::DistributionChannel
        )
    }

    /// Whether this axis is backed by the catalog.
    ///
    /// `KnowledgeRef` ids resolve against the knowledge store instead.
    pub fn is_catalog_backed(&self) -> bool {
        !matches!(self, Axis::KnowledgeRef)
    }

    /// Stable kebab-case code used in CLI arguments and state files
    pub fn code(&self) -> &'static str {
        match self {
            Axis::Role => "role",
            Axis::Product => "product",
            Axis::Industry => "industry",
            Axis::Audience => "audience",
            Axis::JourneyStage => "journey-stage",
            Axis::BrandTone => "brand-tone",
            Axis::WritingStyle => "writing-style",
            Axis::LayoutStyle => "layout-style",
            Axis::PrimaryChannel => "primary-channel",
            Axis::OutputFormat => "output-format",
            Axis::WordCount => "word-count",
            Axis::Language => "language",
            Axis::CtaStrategy => "cta-strategy",
            Axis::OpeningHook => "opening-hook",
            Axis::AnswerStructure => "answer-structure",
            Axis::ImageStyle => "image-style",
            Axis::AspectRatio => "aspect-ratio",
            Axis::Competitor => "competitor",
            Axis::KnowledgeRef => "knowledge-ref",
            Axis::Multimodal => "multimodal",
            Axis::DistributionChannel => "distribution-channel",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Axis {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::all()
            .into_iter()
            .find(|axis| axis.code() == s.to_lowercase())
            .ok_or_else(|| TaxonomyError::UnknownAxis(s.to_string()))
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Kind tag for multimodal catalog options.
///
/// Typed dispatch key: the composition engine branches on this, never on the
/// option's string id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultimodalKind {
    Video,
    Interactive,
    Audio,
}

/// Category-specific typed fields carried by some catalog entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionDetail {
    /// No extra fields for this category
    None,
    /// Industry entries carry curated pain-point copy and suggested tags
    Industry {
        pain_points: String,
        suggested_tags: Vec<String>,
    },
    /// Competitor entries carry their market category and our edge over them
    Competitor { category: String, edge: String },
    /// Layout entries carry raw style directives
    Layout { style_text: String },
    /// Multimodal entries carry their dispatch kind
    Multimodal {
        #[serde(rename = "mode")]
        kind: MultimodalKind,
    },
}

impl Default for OptionDetail {
    fn default() -> Self {
        OptionDetail::None
    }
}

/// A single selectable catalog entry within one axis.
///
/// Immutable once loaded; `id` is unique within its axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub detail: OptionDetail,
}

impl CatalogOption {
    /// Plain entry with no category-specific fields
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            detail: OptionDetail::None,
        }
    }

    /// Entry with category-specific fields
    pub fn with_detail(id: &str, name: &str, description: &str, detail: OptionDetail) -> Self {
        Self {
            detail,
            ..Self::new(id, name, description)
        }
    }

    /// Industry pain-point copy, when this is an industry entry
    pub fn pain_points(&self) -> Option<&str> {
        match &self.detail {
            OptionDetail::Industry { pain_points, .. } => Some(pain_points),
            _ => None,
        }
    }

    /// Competitive edge copy, when this is a competitor entry
    pub fn edge(&self) -> Option<&str> {
        match &self.detail {
            OptionDetail::Competitor { edge, .. } => Some(edge),
            _ => None,
        }
    }

    /// Multimodal dispatch kind, when this is a multimodal entry
    pub fn multimodal_kind(&self) -> Option<MultimodalKind> {
        match &self.detail {
            OptionDetail::Multimodal { kind } => Some(*kind),
            _ => None,
        }
    }
}

// ============================================================================
// TAXONOMY
// ============================================================================

/// The full option catalog: one ordered list of entries per catalog-backed
/// axis.
///
/// Passed by reference into composition, snapshot restore and the CLI; never
/// held in module-level state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    axes: IndexMap<Axis, Vec<CatalogOption>>,
}

impl Taxonomy {
    /// Empty taxonomy (degraded mode; every resolve yields `None`)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the option list for one axis
    pub fn set_axis(&mut self, axis: Axis, options: Vec<CatalogOption>) {
        self.axes.insert(axis, options);
    }

    /// Options available on one axis
    pub fn options(&self, axis: Axis) -> &[CatalogOption] {
        self.axes.get(&axis).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up an entry by id within one axis
    pub fn find(&self, axis: Axis, id: &str) -> Option<&CatalogOption> {
        self.options(axis).iter().find(|opt| opt.id == id)
    }

    /// The default entry for an axis: its first catalog entry
    pub fn default_for(&self, axis: Axis) -> Option<&CatalogOption> {
        self.options(axis).first()
    }

    /// Resolve a possibly-missing, possibly-stale id against the current
    /// catalog, falling back to the axis default.
    ///
    /// Returns `None` only when the axis list itself is empty.
    pub fn resolve(&self, axis: Axis, id: Option<&str>) -> Option<&CatalogOption> {
        id.and_then(|id| self.find(axis, id))
            .or_else(|| self.default_for(axis))
    }

    /// Number of catalog-backed axes with at least one entry
    pub fn populated_axes(&self) -> usize {
        self.axes.values().filter(|opts| !opts.is_empty()).count()
    }

    /// The built-in catalog the console ships with.
    ///
    /// Every catalog-backed axis is non-empty, so a default selection always
    /// exists.
    pub fn builtin() -> Self {
        let mut tax = Taxonomy::default();

        tax.set_axis(
            Axis::Role,
            vec![
                CatalogOption::new(
                    "veteran-cmo",
                    "Veteran CMO",
                    "a marketing executive with 15 years of B2B brand building behind them",
                ),
                CatalogOption::new(
                    "growth-hacker",
                    "Growth Hacker",
                    "a data-driven growth specialist who optimizes every funnel step",
                ),
                CatalogOption::new(
                    "industry-analyst",
                    "Industry Analyst",
                    "an independent analyst trusted for balanced, evidence-backed takes",
                ),
                CatalogOption::new(
                    "brand-storyteller",
                    "Brand Storyteller",
                    "a narrative-first writer who turns product facts into human stories",
                ),
            ],
        );

        tax.set_axis(
            Axis::Product,
            vec![
                CatalogOption::new(
                    "flagship-saas",
                    "Flagship SaaS Suite",
                    "the all-in-one workspace that unifies planning, execution and reporting",
                ),
                CatalogOption::new(
                    "data-platform",
                    "Data Platform",
                    "a managed analytics platform that turns raw events into decisions",
                ),
                CatalogOption::new(
                    "mobile-app",
                    "Mobile Companion App",
                    "the on-the-go client that keeps field teams in sync",
                ),
            ],
        );

        tax.set_axis(
            Axis::Industry,
            vec![
                CatalogOption::with_detail(
                    "finance",
                    "Finance & Securities",
                    "banks, brokerages and asset managers",
                    OptionDetail::Industry {
                        pain_points: "compliance pressure, audit trails, and slow manual reporting"
                            .to_string(),
                        suggested_tags: vec![
                            "compliance".to_string(),
                            "risk".to_string(),
                            "reporting".to_string(),
                        ],
                    },
                ),
                CatalogOption::with_detail(
                    "retail",
                    "Retail & E-commerce",
                    "omnichannel retailers and marketplace sellers",
                    OptionDetail::Industry {
                        pain_points: "thin margins, inventory blind spots, and fragmented customer data"
                            .to_string(),
                        suggested_tags: vec![
                            "inventory".to_string(),
                            "conversion".to_string(),
                            "loyalty".to_string(),
                        ],
                    },
                ),
                CatalogOption::with_detail(
                    "healthcare",
                    "Healthcare",
                    "providers, payers and digital-health vendors",
                    OptionDetail::Industry {
                        pain_points: "privacy regulation, staff shortages, and legacy system lock-in"
                            .to_string(),
                        suggested_tags: vec!["privacy".to_string(), "interoperability".to_string()],
                    },
                ),
                CatalogOption::with_detail(
                    "manufacturing",
                    "Manufacturing",
                    "discrete and process manufacturers",
                    OptionDetail::Industry {
                        pain_points: "supply-chain volatility, unplanned downtime, and siloed plant data"
                            .to_string(),
                        suggested_tags: vec!["oee".to_string(), "supply-chain".to_string()],
                    },
                ),
            ],
        );

        tax.set_axis(
            Axis::Audience,
            vec![
                CatalogOption::new(
                    "founders",
                    "Startup Founders",
                    "founders and early executives who buy fast and churn faster",
                ),
                CatalogOption::new(
                    "it-managers",
                    "IT Managers",
                    "infrastructure owners who care about integration and security",
                ),
                CatalogOption::new(
                    "marketing-leads",
                    "Marketing Leads",
                    "hands-on marketing managers judged on pipeline contribution",
                ),
                CatalogOption::new(
                    "developers",
                    "Developers",
                    "practitioners who distrust marketing and read the docs first",
                ),
            ],
        );

        tax.set_axis(
            Axis::JourneyStage,
            vec![
                CatalogOption::new(
                    "awareness",
                    "Awareness",
                    "the reader is discovering the problem space and owes us nothing",
                ),
                CatalogOption::new(
                    "consideration",
                    "Consideration",
                    "the reader is shortlisting approaches and comparing vendors",
                ),
                CatalogOption::new(
                    "decision",
                    "Decision",
                    "the reader needs final proof to justify a purchase internally",
                ),
                CatalogOption::new(
                    "retention",
                    "Retention",
                    "the reader is a customer we want to deepen and keep",
                ),
            ],
        );

        tax.set_axis(
            Axis::BrandTone,
            vec![
                CatalogOption::new(
                    "professional",
                    "Professional",
                    "measured, precise, confident without swagger",
                ),
                CatalogOption::new(
                    "warm",
                    "Warm",
                    "human, encouraging, plain-spoken",
                ),
                CatalogOption::new(
                    "bold",
                    "Bold",
                    "direct, contrarian where earned, allergic to hedging",
                ),
            ],
        );

        tax.set_axis(
            Axis::WritingStyle,
            vec![
                CatalogOption::new(
                    "deep-dive",
                    "Deep-Dive Analysis",
                    "long-form argument built on evidence and worked examples",
                ),
                CatalogOption::new(
                    "listicle",
                    "Listicle",
                    "scannable numbered takeaways with one idea per item",
                ),
                CatalogOption::new(
                    "case-study",
                    "Case Study",
                    "narrative around one customer problem, intervention and result",
                ),
                CatalogOption::new(
                    "qa-explainer",
                    "Q&A Explainer",
                    "question-led structure that mirrors how readers actually search",
                ),
            ],
        );

        tax.set_axis(
            Axis::LayoutStyle,
            vec![
                CatalogOption::with_detail(
                    "airy",
                    "Airy",
                    "generous whitespace, short paragraphs",
                    OptionDetail::Layout {
                        style_text: "max 3 sentences per paragraph; subhead every 150 words"
                            .to_string(),
                    },
                ),
                CatalogOption::with_detail(
                    "dense",
                    "Dense",
                    "information-rich, reference-style",
                    OptionDetail::Layout {
                        style_text: "tables and definition lists preferred over prose".to_string(),
                    },
                ),
            ],
        );

        tax.set_axis(
            Axis::PrimaryChannel,
            vec![
                CatalogOption::new(
                    "company-blog",
                    "Company Blog",
                    "owned long-form surface, SEO-indexed",
                ),
                CatalogOption::new(
                    "email-newsletter",
                    "Email Newsletter",
                    "subscriber inbox, high trust, limited length",
                ),
                CatalogOption::new(
                    "linkedin",
                    "LinkedIn",
                    "professional feed, first two lines decide everything",
                ),
            ],
        );

        tax.set_axis(
            Axis::OutputFormat,
            vec![
                CatalogOption::new("html", "Rich HTML", "inline-styled HTML for web publishing"),
                CatalogOption::new("markdown", "Markdown", "portable lightweight markup"),
            ],
        );

        tax.set_axis(
            Axis::WordCount,
            vec![
                CatalogOption::new("standard", "Standard (~1200 words)", "room for one full argument"),
                CatalogOption::new("short", "Short (~600 words)", "single-point, fast read"),
                CatalogOption::new("long", "Long (~2500 words)", "pillar piece with sections"),
            ],
        );

        tax.set_axis(
            Axis::Language,
            vec![
                CatalogOption::new("en", "English", "write in English"),
                CatalogOption::new("zh", "Chinese (Simplified)", "write in Simplified Chinese"),
                CatalogOption::new("es", "Spanish", "write in Spanish"),
            ],
        );

        tax.set_axis(
            Axis::CtaStrategy,
            vec![
                CatalogOption::new(
                    "free-trial",
                    "Start a free trial (low friction)",
                    "send the reader to self-serve onboarding",
                ),
                CatalogOption::new(
                    "book-demo",
                    "Book a demo (sales-led)",
                    "route the reader to a guided conversation",
                ),
                CatalogOption::new(
                    "join-newsletter",
                    "Join the newsletter (nurture)",
                    "capture the not-yet-ready reader",
                ),
            ],
        );

        tax.set_axis(
            Axis::OpeningHook,
            vec![
                CatalogOption::new(
                    "bold-claim",
                    "Bold Claim",
                    "open with a defensible but surprising assertion",
                ),
                CatalogOption::new(
                    "statistic",
                    "Hard Statistic",
                    "open with one number the reader cannot ignore",
                ),
                CatalogOption::new(
                    "mini-story",
                    "Mini Story",
                    "open with a 3-sentence scene the reader recognizes",
                ),
            ],
        );

        tax.set_axis(
            Axis::AnswerStructure,
            vec![
                CatalogOption::new(
                    "inverted-pyramid",
                    "Inverted Pyramid",
                    "answer first, evidence after",
                ),
                CatalogOption::new(
                    "faq-first",
                    "FAQ First",
                    "lead with the questions answer engines extract",
                ),
                CatalogOption::new(
                    "step-by-step",
                    "Step by Step",
                    "numbered procedure with one action per step",
                ),
            ],
        );

        tax.set_axis(
            Axis::ImageStyle,
            vec![
                CatalogOption::new("flat-illustration", "Flat Illustration", "clean vector shapes, brand palette"),
                CatalogOption::new("photo-real", "Photorealistic", "natural light, editorial photography"),
                CatalogOption::new("isometric-3d", "Isometric 3D", "soft-shadow isometric renders"),
            ],
        );

        tax.set_axis(
            Axis::AspectRatio,
            vec![
                CatalogOption::new("wide-16x9", "Wide 16:9", "hero and social-card friendly"),
                CatalogOption::new("square-1x1", "Square 1:1", "feed-native"),
                CatalogOption::new("vertical-9x16", "Vertical 9:16", "stories and shorts"),
            ],
        );

        tax.set_axis(
            Axis::Competitor,
            vec![
                CatalogOption::with_detail(
                    "acme-crm",
                    "Acme CRM",
                    "incumbent enterprise suite",
                    OptionDetail::Competitor {
                        category: "Enterprise CRM".to_string(),
                        edge: "we deploy in days, not quarters, with no consultants required"
                            .to_string(),
                    },
                ),
                CatalogOption::with_detail(
                    "pipeflow",
                    "Pipeflow",
                    "SMB-focused pipeline tool",
                    OptionDetail::Competitor {
                        category: "SMB sales tools".to_string(),
                        edge: "we keep working past 50 seats where Pipeflow teams start exporting to spreadsheets"
                            .to_string(),
                    },
                ),
                CatalogOption::with_detail(
                    "orbit-suite",
                    "Orbit Suite",
                    "bundled marketing cloud",
                    OptionDetail::Competitor {
                        category: "Marketing clouds".to_string(),
                        edge: "our per-seat price includes every module Orbit sells as add-ons"
                            .to_string(),
                    },
                ),
            ],
        );

        tax.set_axis(
            Axis::Multimodal,
            vec![
                CatalogOption::with_detail(
                    "video",
                    "Embedded Video",
                    "reference or embed a supporting video",
                    OptionDetail::Multimodal {
                        kind: MultimodalKind::Video,
                    },
                ),
                CatalogOption::with_detail(
                    "interactive",
                    "Interactive Element",
                    "propose an interactive element (calculator, quiz, configurator)",
                    OptionDetail::Multimodal {
                        kind: MultimodalKind::Interactive,
                    },
                ),
                CatalogOption::with_detail(
                    "audio",
                    "Audio Companion",
                    "propose a narrated audio version of the piece",
                    OptionDetail::Multimodal {
                        kind: MultimodalKind::Audio,
                    },
                ),
            ],
        );

        tax.set_axis(
            Axis::DistributionChannel,
            vec![
                CatalogOption::new(
                    "x-thread",
                    "X Thread",
                    "6-10 post thread distilling the argument",
                ),
                CatalogOption::new(
                    "linkedin-post",
                    "LinkedIn Post",
                    "single post with a strong first line and one takeaway",
                ),
                CatalogOption::new(
                    "short-video-script",
                    "Short Video Script",
                    "45-second vertical video script",
                ),
                CatalogOption::new(
                    "email-digest",
                    "Email Digest Blurb",
                    "80-word teaser linking back to the piece",
                ),
            ],
        );

        tax
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn test_TAX_001_axis_roundtrip_codes() {
        for axis in Axis::all() {
            assert_eq!(Axis::from_str(axis.code()).unwrap(), axis);
        }
    }

    #[test]
    fn test_TAX_002_axis_from_str_invalid() {
        let result = Axis::from_str("not-an-axis");
        assert!(matches!(result, Err(TaxonomyError::UnknownAxis(_))));
    }

    #[test]
    fn test_TAX_003_axis_multi_flags() {
        assert!(Axis::Competitor.is_multi());
        assert!(Axis::KnowledgeRef.is_multi());
        assert!(Axis::Multimodal.is_multi());
        assert!(Axis::DistributionChannel.is_multi());
        assert!(!Axis::Role.is_multi());
        assert!(!Axis::OutputFormat.is_multi());
    }

    #[test]
    fn test_TAX_004_builtin_covers_every_catalog_axis() {
        let tax = Taxonomy::builtin();
        for axis in Axis::all() {
            if axis.is_catalog_backed() {
                assert!(
                    !tax.options(axis).is_empty(),
                    "axis {} has no builtin options",
                    axis
                );
            }
        }
    }

    #[test]
    fn test_TAX_005_find_and_default() {
        let tax = Taxonomy::builtin();
        assert_eq!(tax.find(Axis::Industry, "finance").unwrap().id, "finance");
        assert!(tax.find(Axis::Industry, "deleted-industry").is_none());
        assert_eq!(
            tax.default_for(Axis::Industry).unwrap().id,
            tax.options(Axis::Industry)[0].id
        );
    }

    #[test]
    fn test_TAX_006_resolve_falls_back_to_default() {
        let tax = Taxonomy::builtin();
        let resolved = tax.resolve(Axis::Role, Some("deleted-role")).unwrap();
        assert_eq!(resolved.id, tax.default_for(Axis::Role).unwrap().id);

        let resolved = tax.resolve(Axis::Role, None).unwrap();
        assert_eq!(resolved.id, tax.default_for(Axis::Role).unwrap().id);

        let resolved = tax.resolve(Axis::Role, Some("growth-hacker")).unwrap();
        assert_eq!(resolved.id, "growth-hacker");
    }

    #[test]
    fn test_TAX_007_resolve_on_empty_taxonomy() {
        let tax = Taxonomy::empty();
        assert!(tax.resolve(Axis::Role, Some("veteran-cmo")).is_none());
    }

    #[test]
    fn test_TAX_008_option_detail_accessors() {
        let tax = Taxonomy::builtin();
        let finance = tax.find(Axis::Industry, "finance").unwrap();
        assert!(finance.pain_points().unwrap().contains("compliance"));
        assert!(finance.edge().is_none());

        let acme = tax.find(Axis::Competitor, "acme-crm").unwrap();
        assert!(acme.edge().unwrap().contains("days"));
        assert!(acme.pain_points().is_none());

        let video = tax.find(Axis::Multimodal, "video").unwrap();
        assert_eq!(video.multimodal_kind(), Some(MultimodalKind::Video));
    }

    #[test]
    fn test_TAX_009_unknown_axis_options_empty() {
        let tax = Taxonomy::builtin();
        assert!(tax.options(Axis::KnowledgeRef).is_empty());
    }

    #[test]
    fn test_TAX_010_serde_roundtrip() {
        let tax = Taxonomy::builtin();
        let json = serde_json::to_string(&tax).unwrap();
        let back: Taxonomy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.options(Axis::Role).len(), tax.options(Axis::Role).len());
        assert_eq!(
            back.find(Axis::Competitor, "pipeflow").unwrap().edge(),
            tax.find(Axis::Competitor, "pipeflow").unwrap().edge()
        );
    }
}
