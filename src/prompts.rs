use crate::sizes::{SizeRange, ANALYZE_FROM_IMAGE};

/// SEO keyword list the listing tool asks the model to draw from.
pub const TARGET_KEYWORDS: &str = "baby girl night dress, nighty for girls, 6 month baby girl dress, girls ethnic wear, girls clothes, black dress for girls, beach dresses, girls night dress, three piece, girls wear, girls dresses, western dresses for girls, kids dress for girls, hopscotch girls dress, night dresses for girls, 5 years girls dress, kids girl dress, kids dress, long dress for girls, wedding dress for girls, party wear dress for girls, baby cotton dress, fancy dress for girls, stylish dress for girls, middies for girls, fashion dream, birthday dress for girls, traditional dress for girls, cotton frock for girls, baby frock, girls frock, kids nighty for girls, children's dress, frock for girls, jeans top for girls, short dress for girls, modern dress for girls, frock for girls 7-8 years, babies dress, kids dresses, cotton frocks, girl frock, kids daily wear for girls, 12 years girls dresses, 14 years girls dresses, outfit for girls, girls frocks, girls fancy dress, party dress for girls, cotton dress for girls, kids wear, girl clothes, beach dress for kids girls, 3 year old girl dress, dresses for kids girls, western wear for kids girls, summer dress for girls, casual dress for girls, birthday dresses for kids, frocks for kids, kids frock, cinderella dress, sharara set for girls, ethnic wear for kids girls, lehenga choli for girls, denim dress for girls, ethnic dresses for girls, dungarees for girls, indowestern dress for girls, traditional wear for girls, yellow dress for kids, lacha for kids girls, rainbow frock for girls, floral dress for girls, polka dot dress for kids girls";

/// Free-text product details entered next to the listing photos.
#[derive(Debug, Clone, Default)]
pub struct ListingSpecs<'a> {
    pub brand_name: &'a str,
    pub min_size: &'a str,
    pub max_size: &'a str,
    pub fabric: &'a str,
    pub length: &'a str,
    pub neck_style: &'a str,
}

fn or_analyze(value: &str) -> &str {
    if value.trim().is_empty() { ANALYZE_FROM_IMAGE } else { value }
}

pub fn listing_prompt(image_count: usize, specs: &ListingSpecs<'_>, range: &SizeRange, keywords: &str) -> String {
    let age_numbers = range.age_tokens.join(" ");
    let age_phrases = range.sizes.join(", ");
    let title_range = &range.age_range;
    let brand = or_analyze(specs.brand_name);
    let fabric = or_analyze(specs.fabric);
    let length = or_analyze(specs.length);
    let neck = or_analyze(specs.neck_style);
    let (min_size, max_size) = (specs.min_size, specs.max_size);

    format!(
        "Analyze these {image_count} product images for an Amazon/E-commerce listing.

CRITICAL BRAND DATA:
- Brand: {brand}
- Fabric: {fabric}
- Length: {length}
- Neck: {neck}

MANDATORY VARIATION SEO MAPPING (FULL RANGE INDEXING):
The user has selected a range from {min_size} to {max_size}.
To ensure every middle size variation is indexed, you MUST explicitly integrate all these specific age variations:
[ {age_phrases} ]

SEO KEYWORDS TO USE:
{keywords}

STRICT OUTPUT RULES:
1. TITLE: 150-200 characters. Start with Brand.
   - YOU MUST EXPLICITLY INCLUDE THE AGE RANGE SUMMARY: \"{title_range}\" in the title to show it covers all variations.
2. BULLET POINTS: 5 points (160-199 chars each).
   - Distribute ALL intermediate age variations across the 5 points.
   - Each bullet must be high-density and specific about {fabric} and detected design details.
3. BACKEND KEYWORDS: STRICT UNDER 200 CHARS.
   - Use a space-separated string.
   - MUST include all age numbers: \"{age_numbers} years girl dress\".
   - Include detected color, fabric, and unique keywords from the target list.
   - NO COMMAS. NO REPEATS.
4. DESCRIPTION: 3-paragraph SEO copy. Mention: \"Perfectly fits girls aged {age_phrases}.\""
    )
}

pub fn product_description(product_info: &str, platform: &str, tone: &str) -> String {
    format!(
        "Generate a highly optimized e-commerce product description for {platform}.
Product Info: {product_info}
Tone: {tone}
Rules:
1. Include SEO keywords naturally.
2. Use bullet points for features.
3. Maximum length 2000 characters.
4. Focus on benefits, not just features.

Format the output with clear headers and bullet points."
    )
}

pub fn copywriter_system(platform: &str) -> String {
    format!("You are an expert e-commerce copywriter specialized in {platform}.")
}

pub fn ads_waste(csv_data: &str) -> String {
    format!(
        "Analyze this Amazon Search Term Report data:
{csv_data}

Find:
1. Zero-order keywords with > $5 spend.
2. High spend, low CTR (< 0.2%) terms.
3. Terms with high ACoS (> 100%).

Output a structured list of Negative Keywords with reasons and confidence levels."
    )
}

pub fn ad_prompts(tone: &str) -> String {
    format!(
        "Analyze this product and create high-converting image and video prompts for AI generation (Midjourney/Runway/Veo).
Brand Tone: {tone}
Include:
- 2 ultra-realistic image prompts.
- 1 cinematic video prompt with motion descriptions.
- Lighting and composition details.

Respond with a JSON object matching the requested schema."
    )
}

pub const GROWTH_STRATEGIST_SYSTEM: &str =
    "You are an Amazon Growth Strategist specializing in Conversion Rate Optimization.";

pub fn problem_finder(clicks: &str, conversions: &str, ctr: &str, listing_text: &str) -> String {
    format!(
        "Analyze this Amazon listing performance:
Stats: {clicks} Clicks, {conversions} Sales, {ctr}% CTR
Listing: {listing_text}

Diagnose:
1. If High Clicks + Low Conversion -> Identify content/pricing/review issues.
2. If Low CTR -> Identify image/title issues.
3. Provide EXACT fixes and a rewritten high-converting Title and Bullets.

Respond in Markdown format with clear headings."
    )
}

pub fn keyword_clusters(keywords: &str) -> String {
    format!(
        "Cluster these e-commerce keywords by customer intent:
Keywords: {keywords}

Intents to use: Buying (Transactional), Browsing (Informational), Waste (Irrelevant).
For each cluster, suggest an Amazon campaign strategy (Exact/Phrase/Broad)."
    )
}

pub fn review_insights(reviews: &str) -> String {
    format!(
        "Analyze these customer reviews for an e-commerce product:
Reviews: {reviews}

Extract:
1. Common complaints.
2. Sizing issues.
3. Fabric/Material feedback.
4. What customers LOVE.
5. New ad angles based on real feedback.
6. Product improvement ideas."
    )
}

pub const BRAND_STRATEGIST_SYSTEM: &str =
    "You are a master brand strategist. You mimic brand personalities with 100% accuracy.";

pub fn brand_voice(examples: &str, test_prompt: &str) -> String {
    format!(
        "You are a Brand Voice Engine. First, analyze these existing brand assets (ads, listings, captions):
{examples}

Now, using that EXACT tone, style, and vocabulary, generate content for:
{test_prompt}"
    )
}

pub fn business_insights(data_input: &str) -> String {
    format!(
        "Analyze this daily sales and ad performance data:
{data_input}

Explain what happened in plain English:
1. Overall trend (Why did sales drop/rise?).
2. Specific keyword performance.
3. Action items (Pause this, scale that).
4. Metrics interpretation (CTR vs CR)."
    )
}

pub fn reel_ideas(product: &str, audience: &str, platform: &str) -> String {
    format!(
        "Generate high-reach social media ideas for:
Product: {product}
Audience: {audience}
Platform: {platform}

Required Output:
1. 10 thumb-stopping hooks.
2. 3 detailed 30-sec scripts with visual instructions.
3. Strong Call-to-Action (CTA) ideas."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> ListingSpecs<'static> {
        ListingSpecs {
            brand_name: "Tiny Threads",
            min_size: "1-2 Years",
            max_size: "4-5 Years",
            fabric: "Cotton",
            length: "",
            neck_style: "  ",
        }
    }

    #[test]
    fn listing_prompt_spells_out_every_size() {
        let range = SizeRange::resolve("1-2 Years", "4-5 Years");
        let prompt = listing_prompt(3, &specs(), &range, TARGET_KEYWORDS);

        assert!(prompt.starts_with("Analyze these 3 product images"));
        assert!(prompt.contains("[ 1-2 Years, 2-3 Years, 3-4 Years, 4-5 Years ]"));
        assert!(prompt.contains("\"1 to 4 Years\""));
        assert!(prompt.contains("\"1 2 3 4 years girl dress\""));
        assert!(prompt.contains("Perfectly fits girls aged 1-2 Years, 2-3 Years, 3-4 Years, 4-5 Years."));
        assert!(prompt.contains("range from 1-2 Years to 4-5 Years"));
    }

    #[test]
    fn listing_prompt_embeds_numeric_constraints() {
        let prompt = listing_prompt(1, &specs(), &SizeRange::resolve("", ""), TARGET_KEYWORDS);
        assert!(prompt.contains("TITLE: 150-200 characters"));
        assert!(prompt.contains("5 points (160-199 chars each)"));
        assert!(prompt.contains("STRICT UNDER 200 CHARS"));
        assert!(prompt.contains(TARGET_KEYWORDS));
    }

    #[test]
    fn blank_specs_fall_back_to_image_analysis() {
        let prompt = listing_prompt(1, &specs(), &SizeRange::resolve("", ""), "kids dress");
        assert!(prompt.contains("- Brand: Tiny Threads"));
        assert!(prompt.contains("- Fabric: Cotton"));
        assert!(prompt.contains("- Length: Analyze from image"));
        assert!(prompt.contains("- Neck: Analyze from image"));
        assert!(prompt.contains("\"Analyze from image\" in the title"));
    }

    #[test]
    fn listing_prompt_is_deterministic() {
        let range = SizeRange::resolve("0-6 Months", "Free Size");
        assert_eq!(
            listing_prompt(5, &specs(), &range, TARGET_KEYWORDS),
            listing_prompt(5, &specs(), &range, TARGET_KEYWORDS)
        );
    }

    #[test]
    fn tool_templates_embed_inputs() {
        assert!(product_description("cotton frock", "Meesho", "Minimalist").contains("for Meesho."));
        assert!(copywriter_system("Ajio").ends_with("specialized in Ajio."));
        assert!(problem_finder("1000", "20", "0.3", "Title").contains("1000 Clicks, 20 Sales, 0.3% CTR"));
        assert!(reel_ideas("frock", "moms", "TikTok Ads").contains("Platform: TikTok Ads"));
        assert!(brand_voice("ad copy", "launch caption").ends_with("launch caption"));
    }
}
