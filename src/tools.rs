use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ToolError;
use crate::generation::{Generation, GenerativeService, ImagePayload, MAX_IMAGES};
use crate::models::ToolInput;
use crate::normalize::{self, ValidationWarning};
use crate::prompts::{self, ListingSpecs};
use crate::schema;
use crate::sizes::SizeRange;

/// What a tool will send, plus what it needs to post-process the reply.
#[derive(Debug, Clone)]
pub struct Plan {
    pub generation: Generation,
    /// Only the listing tool resolves a size range.
    pub sizes: Option<SizeRange>,
}

impl Plan {
    fn plain(generation: Generation) -> Self { Self { generation, sizes: None } }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub result: Value,
    pub warnings: Vec<ValidationWarning>,
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ToolError> {
    if value.trim().is_empty() {
        Err(ToolError::InvalidInput(format!("`{field}` is required")))
    } else {
        Ok(value)
    }
}

fn decode_image(input: &str, index: usize) -> Result<ImagePayload, ToolError> {
    ImagePayload::from_data_url(input).map_err(|e| ToolError::InvalidInput(format!("images[{index}]: {e}")))
}

impl ToolInput {
    pub fn plan(&self) -> Result<Plan, ToolError> {
        let plan = match self {
            ToolInput::ProductDesc(i) => Plan::plain(Generation::Streaming {
                prompt: prompts::product_description(required(&i.product_info, "productInfo")?, &i.platform, &i.tone),
                system: prompts::copywriter_system(&i.platform),
            }),
            ToolInput::ImageListing(i) => {
                if i.images.is_empty() {
                    return Err(ToolError::InvalidInput("at least one image is required".into()));
                }
                if i.images.len() > MAX_IMAGES {
                    return Err(ToolError::InvalidInput(format!("at most {MAX_IMAGES} images are accepted")));
                }
                let images = i
                    .images
                    .iter()
                    .enumerate()
                    .map(|(idx, img)| decode_image(img, idx))
                    .collect::<Result<Vec<_>, _>>()?;
                let range = SizeRange::resolve(&i.min_size, &i.max_size);
                let specs = ListingSpecs {
                    brand_name: &i.brand_name,
                    min_size: &i.min_size,
                    max_size: &i.max_size,
                    fabric: &i.fabric,
                    length: &i.length,
                    neck_style: &i.neck_style,
                };
                let prompt = prompts::listing_prompt(images.len(), &specs, &range, prompts::TARGET_KEYWORDS);
                Plan {
                    generation: Generation::Vision { images, prompt, shape: schema::listing() },
                    sizes: Some(range),
                }
            }
            ToolInput::AdsWaste(i) => Plan::plain(Generation::Structured {
                prompt: prompts::ads_waste(required(&i.csv_data, "csvData")?),
                shape: schema::ads_waste(),
            }),
            ToolInput::PromptGen(i) => Plan::plain(Generation::Vision {
                images: vec![decode_image(required(&i.image, "image")?, 0)?],
                prompt: prompts::ad_prompts(&i.tone),
                shape: schema::prompt_gen(),
            }),
            ToolInput::ProblemFinder(i) => Plan::plain(Generation::Streaming {
                prompt: prompts::problem_finder(
                    &i.clicks,
                    &i.conversions,
                    &i.ctr,
                    required(&i.listing_text, "listingText")?,
                ),
                system: prompts::GROWTH_STRATEGIST_SYSTEM.to_string(),
            }),
            ToolInput::KeywordCluster(i) => Plan::plain(Generation::Structured {
                prompt: prompts::keyword_clusters(required(&i.keywords, "keywords")?),
                shape: schema::keyword_clusters(),
            }),
            ToolInput::ReviewAnalyzer(i) => Plan::plain(Generation::Structured {
                prompt: prompts::review_insights(required(&i.reviews, "reviews")?),
                shape: schema::review_insights(),
            }),
            ToolInput::BrandVoice(i) => Plan::plain(Generation::Streaming {
                prompt: prompts::brand_voice(
                    required(&i.examples, "examples")?,
                    required(&i.test_prompt, "testPrompt")?,
                ),
                system: prompts::BRAND_STRATEGIST_SYSTEM.to_string(),
            }),
            ToolInput::BusinessInsights(i) => Plan::plain(Generation::Structured {
                prompt: prompts::business_insights(required(&i.data_input, "dataInput")?),
                shape: schema::business_insights(),
            }),
            ToolInput::ReelIdeas(i) => Plan::plain(Generation::Structured {
                prompt: prompts::reel_ideas(
                    required(&i.product, "product")?,
                    required(&i.audience, "audience")?,
                    &i.platform,
                ),
                shape: schema::reel_planner(),
            }),
        };
        Ok(plan)
    }
}

/// Runs a structured or vision plan and normalizes the reply.
pub async fn run_structured(service: &dyn GenerativeService, plan: &Plan) -> Result<Outcome, ToolError> {
    let (raw, shape) = match &plan.generation {
        Generation::Structured { prompt, shape } => (service.generate_json(prompt, shape).await, shape),
        Generation::Vision { images, prompt, shape } => (service.analyze_images(images, prompt, shape).await, shape),
        Generation::Streaming { .. } => {
            return Err(ToolError::InvalidInput("streaming tools answer with an event stream".into()))
        }
    };
    let raw = raw.map_err(|e| {
        error!("❌ {} call failed: {}", shape.name, e);
        ToolError::from(e)
    })?;

    let outcome = match &plan.sizes {
        Some(range) => {
            let result = normalize::normalize_listing(&raw, shape, &range.sizes).map_err(ToolError::Parse)?;
            let warnings = normalize::listing_warnings(&result);
            Outcome { result, warnings }
        }
        None => Outcome {
            result: normalize::parse_reply(&raw, shape).map_err(ToolError::Parse)?,
            warnings: Vec::new(),
        },
    };

    if outcome.warnings.is_empty() {
        info!("✅ {} result ready", shape.name);
    } else {
        warn!("⚠️ {} result has {} length warning(s)", shape.name, outcome.warnings.len());
    }
    Ok(outcome)
}
