use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolId {
    ProductDesc,
    ImageListing,
    AdsWaste,
    PromptGen,
    ProblemFinder,
    KeywordCluster,
    ReviewAnalyzer,
    BrandVoice,
    BusinessInsights,
    ReelIdeas,
}

/// Dashboard card for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl ToolId {
    pub const ALL: [ToolId; 10] = [
        ToolId::ProductDesc,
        ToolId::ImageListing,
        ToolId::AdsWaste,
        ToolId::PromptGen,
        ToolId::ProblemFinder,
        ToolId::KeywordCluster,
        ToolId::ReviewAnalyzer,
        ToolId::BrandVoice,
        ToolId::BusinessInsights,
        ToolId::ReelIdeas,
    ];

    pub fn tool(self) -> Tool {
        let (name, description, icon, color) = match self {
            ToolId::ProductDesc => ("Product Desc Generator", "Tone-aware SEO descriptions for Amazon & more.", "FileText", "bg-blue-500"),
            ToolId::ImageListing => ("Image-to-Listing", "Analyze product photos for instant listing drafts.", "Camera", "bg-indigo-500"),
            ToolId::AdsWaste => ("Ads Waste Detector", "Find zero-order, high-spend keywords in reports.", "Trash2", "bg-red-500"),
            ToolId::PromptGen => ("Ad Prompt Generator", "Create high-converting image/video prompts.", "Zap", "bg-yellow-500"),
            ToolId::ProblemFinder => ("Listing Problem Finder", "Fix CTR and conversion issues instantly.", "AlertTriangle", "bg-orange-500"),
            ToolId::KeywordCluster => ("Keyword Cluster Tool", "Group hundreds of keywords by intent.", "Search", "bg-green-500"),
            ToolId::ReviewAnalyzer => ("Review Analyzer", "Extract sizing, fabric & complaint trends.", "MessageSquare", "bg-purple-500"),
            ToolId::BrandVoice => ("Brand Voice Trainer", "Train AI on your unique brand personality.", "Target", "bg-pink-500"),
            ToolId::BusinessInsights => ("Daily Insight Bot", "Plain English summaries of your sales data.", "TrendingUp", "bg-emerald-500"),
            ToolId::ReelIdeas => ("Reel & Ad Ideas", "10 hooks and scripts for viral reach.", "Video", "bg-cyan-500"),
        };
        Tool { id: self, name, description, icon, color }
    }

    pub fn catalog() -> Vec<Tool> {
        Self::ALL.into_iter().map(ToolId::tool).collect()
    }
}

// --- Tool inputs ---

fn default_platform() -> String { "Amazon".into() }
fn default_tone() -> String { "Professional & Informative".into() }
fn default_prompt_tone() -> String { "Luxury".into() }
fn default_reel_platform() -> String { "Instagram Reels".into() }

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescInput {
    pub product_info: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageListingInput {
    /// Data URLs or bare base64 payloads.
    pub images: Vec<String>,
    pub brand_name: String,
    pub min_size: String,
    pub max_size: String,
    pub fabric: String,
    pub length: String,
    pub neck_style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsWasteInput {
    pub csv_data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptGenInput {
    pub image: String,
    #[serde(default = "default_prompt_tone")]
    pub tone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemFinderInput {
    pub clicks: String,
    pub conversions: String,
    pub ctr: String,
    pub listing_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordClusterInput {
    pub keywords: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnalyzerInput {
    pub reviews: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoiceInput {
    pub examples: String,
    pub test_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInsightsInput {
    pub data_input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelIdeasInput {
    pub product: String,
    pub audience: String,
    #[serde(default = "default_reel_platform")]
    pub platform: String,
}

/// Request body for a run, tagged by tool id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolInput {
    ProductDesc(ProductDescInput),
    ImageListing(ImageListingInput),
    AdsWaste(AdsWasteInput),
    PromptGen(PromptGenInput),
    ProblemFinder(ProblemFinderInput),
    KeywordCluster(KeywordClusterInput),
    ReviewAnalyzer(ReviewAnalyzerInput),
    BrandVoice(BrandVoiceInput),
    BusinessInsights(BusinessInsightsInput),
    ReelIdeas(ReelIdeasInput),
}

impl ToolInput {
    pub fn tool_id(&self) -> ToolId {
        match self {
            ToolInput::ProductDesc(_) => ToolId::ProductDesc,
            ToolInput::ImageListing(_) => ToolId::ImageListing,
            ToolInput::AdsWaste(_) => ToolId::AdsWaste,
            ToolInput::PromptGen(_) => ToolId::PromptGen,
            ToolInput::ProblemFinder(_) => ToolId::ProblemFinder,
            ToolInput::KeywordCluster(_) => ToolId::KeywordCluster,
            ToolInput::ReviewAnalyzer(_) => ToolId::ReviewAnalyzer,
            ToolInput::BrandVoice(_) => ToolId::BrandVoice,
            ToolInput::BusinessInsights(_) => ToolId::BusinessInsights,
            ToolInput::ReelIdeas(_) => ToolId::ReelIdeas,
        }
    }
}

// --- Misc request/response bodies ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub tool: ToolId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOptions {
    pub sizes: Vec<&'static str>,
    pub fabrics: Vec<&'static str>,
    pub lengths: Vec<&'static str>,
    pub neck_styles: Vec<&'static str>,
}
