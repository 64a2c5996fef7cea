//! LLM prompt construction for tabular extraction

/// Builds the extraction prompt for one chunk
pub struct PromptBuilder<'a> {
    content: &'a str,
    description: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(content: &'a str, description: &'a str) -> Self {
        Self {
            content,
            description,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            EXTRACTION_TEMPLATE.len() + self.content.len() + self.description.len(),
        );

        prompt.push_str(CONTENT_PREAMBLE);
        prompt.push_str(self.content);
        prompt.push_str("\n\n");
        prompt.push_str(INSTRUCTIONS_HEADING);
        prompt.push_str("\n\n");
        prompt.push_str(DESCRIPTION_RULE);
        prompt.push_str(self.description);
        prompt.push('\n');
        prompt.push_str(FORMAT_RULES);

        prompt
    }
}

const CONTENT_PREAMBLE: &str =
    "You are tasked with extracting specific information from the following text content: ";

const INSTRUCTIONS_HEADING: &str = "Please follow these instructions carefully:";

const DESCRIPTION_RULE: &str = "1. Extract Information: Only extract the information that directly matches the provided description: ";

const FORMAT_RULES: &str = "2. No Extra Content: Do not include any additional text, comments, or explanations in your response.
3. Data Format: Format the data in CSV format with headers based on the parsed description.
4. Empty Response: If no information matches the description, return an empty string ('').";

/// The prompt as rendered for empty content and description
const EXTRACTION_TEMPLATE: &str = "You are tasked with extracting specific information from the following text content: \n\nPlease follow these instructions carefully:\n\n1. Extract Information: Only extract the information that directly matches the provided description: \n2. No Extra Content: Do not include any additional text, comments, or explanations in your response.\n3. Data Format: Format the data in CSV format with headers based on the parsed description.\n4. Empty Response: If no information matches the description, return an empty string ('').";
