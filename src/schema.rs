use serde_json::{json, Map, Value};

/// Value type of a declared response field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    StringList,
    ObjectList(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub description: Option<&'static str>,
}

impl Field {
    pub fn string(name: &'static str) -> Self { Self { name, ty: FieldType::String, description: None } }
    pub fn number(name: &'static str) -> Self { Self { name, ty: FieldType::Number, description: None } }
    pub fn strings(name: &'static str) -> Self { Self { name, ty: FieldType::StringList, description: None } }
    pub fn objects(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, ty: FieldType::ObjectList(fields), description: None }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Declarative description of the JSON object a tool expects back.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseShape {
    pub name: &'static str,
    pub fields: Vec<Field>,
    pub required: Vec<&'static str>,
}

impl ResponseShape {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, fields, required: Vec::new() }
    }

    pub fn require(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    /// Render as the OpenAPI subset accepted by `generationConfig.responseSchema`.
    pub fn to_gemini_schema(&self) -> Value {
        let mut schema = object_schema(&self.fields);
        if !self.required.is_empty() {
            schema["required"] = json!(self.required);
        }
        schema
    }

    /// Check a decoded reply against the declared fields.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let obj = value
            .as_object()
            .ok_or_else(|| format!("{}: expected a JSON object, got {}", self.name, kind_of(value)))?;
        for name in &self.required {
            match obj.get(*name) {
                None | Some(Value::Null) => {
                    return Err(format!("{}: missing required field `{}`", self.name, name))
                }
                Some(_) => {}
            }
        }
        check_fields(self.name, &self.fields, obj)
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.name.to_string(), field_schema(f)))
        .collect();
    json!({ "type": "OBJECT", "properties": properties })
}

fn field_schema(field: &Field) -> Value {
    let mut schema = match &field.ty {
        FieldType::String => json!({ "type": "STRING" }),
        FieldType::Number => json!({ "type": "NUMBER" }),
        FieldType::StringList => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        FieldType::ObjectList(inner) => json!({ "type": "ARRAY", "items": object_schema(inner) }),
    };
    if let Some(description) = field.description {
        schema["description"] = json!(description);
    }
    schema
}

fn check_fields(path: &str, fields: &[Field], obj: &Map<String, Value>) -> Result<(), String> {
    for field in fields {
        let Some(value) = obj.get(field.name) else { continue };
        if value.is_null() {
            continue;
        }
        let at = format!("{path}.{}", field.name);
        match &field.ty {
            FieldType::String if !value.is_string() => return Err(mismatch(&at, "string", value)),
            FieldType::Number if !value.is_number() => return Err(mismatch(&at, "number", value)),
            FieldType::StringList => {
                let items = value.as_array().ok_or_else(|| mismatch(&at, "array", value))?;
                if let Some((i, bad)) = items.iter().enumerate().find(|(_, v)| !v.is_string()) {
                    return Err(mismatch(&format!("{at}[{i}]"), "string", bad));
                }
            }
            FieldType::ObjectList(inner) => {
                let items = value.as_array().ok_or_else(|| mismatch(&at, "array", value))?;
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{at}[{i}]");
                    let item_obj = item.as_object().ok_or_else(|| mismatch(&item_path, "object", item))?;
                    check_fields(&item_path, inner, item_obj)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn mismatch(path: &str, expected: &str, got: &Value) -> String {
    format!("{path}: expected {expected}, got {}", kind_of(got))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --- Shapes used by the tools ---

pub fn listing() -> ResponseShape {
    ResponseShape::new(
        "LISTING_ANALYSIS",
        vec![
            Field::string("title").describe(
                "Optimized Title. MUST be 150-200 characters. Start with Brand Name. If a size range is provided, the title MUST include the age coverage in format 'Ages X to Y Years'. NO symbols or emojis. NO word repeated more than twice.",
            ),
            Field::strings("bullets").describe(
                "Exactly 5 detailed bullet points. Each MUST be between 160 and 199 characters long. Must include detected color, fabric, and size details.",
            ),
            Field::strings("keywords"),
            Field::string("description")
                .describe("A long-form SEO optimized product description. Strict limit of 1500 characters."),
            Field::string("backendKeywords").describe(
                "Amazon backend search terms. STRICT LIMIT: MUST BE LESS THAN 200 CHARACTERS. Combine detected Color, Size, Length, and Fabric with unique words from the target SEO list. NO REPEATED WORDS. NO COMMAS. ONLY SPACES.",
            ),
            Field::string("fabricGuess"),
            Field::string("styleType"),
            Field::strings("recommendations"),
        ],
    )
    .require(&["title", "bullets", "keywords", "description", "backendKeywords"])
}

pub fn ads_waste() -> ResponseShape {
    ResponseShape::new(
        "ADS_WASTE",
        vec![Field::objects(
            "negatives",
            vec![Field::string("keyword"), Field::string("reason"), Field::number("confidence")],
        )],
    )
    .require(&["negatives"])
}

pub fn keyword_clusters() -> ResponseShape {
    ResponseShape::new(
        "KEYWORD_CLUSTERS",
        vec![Field::objects(
            "clusters",
            vec![Field::string("intent"), Field::strings("keywords"), Field::string("strategy")],
        )],
    )
    .require(&["clusters"])
}

pub fn review_insights() -> ResponseShape {
    ResponseShape::new(
        "REVIEW_INSIGHTS",
        vec![
            Field::strings("pros"),
            Field::strings("cons"),
            Field::strings("sizeIssues"),
            Field::strings("newAdAngles"),
            Field::strings("productIdeas"),
        ],
    )
    .require(&["pros", "cons"])
}

pub fn business_insights() -> ResponseShape {
    ResponseShape::new(
        "BUSINESS_INSIGHTS",
        vec![
            Field::string("summary"),
            Field::strings("actionItems"),
            Field::strings("metricsInterpretation"),
        ],
    )
    .require(&["summary", "actionItems"])
}

pub fn reel_planner() -> ResponseShape {
    ResponseShape::new(
        "REEL_PLANNER",
        vec![
            Field::strings("hooks"),
            Field::objects(
                "scripts",
                vec![Field::string("duration"), Field::string("script"), Field::string("cta")],
            ),
        ],
    )
    .require(&["hooks", "scripts"])
}

pub fn prompt_gen() -> ResponseShape {
    ResponseShape::new("PROMPT_GEN", vec![Field::strings("image"), Field::strings("video")])
        .require(&["image", "video"])
}
