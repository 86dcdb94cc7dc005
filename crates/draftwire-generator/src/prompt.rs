//! Prompt engineering for draft generation

/// Builds the generation prompt for one article
pub struct PromptBuilder {
    text: String,
    tone: String,
}

impl PromptBuilder {
    /// Create a prompt builder for extracted article text and a tone
    pub fn new(text: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: tone.into(),
        }
    }

    /// Build the complete generation prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and task
        prompt.push_str("You are a professional social media content writer.\n\n");
        prompt.push_str(
            "Summarise the article below into exactly 4 concise bullet points. ",
        );
        prompt.push_str(&format!(
            "Then craft a post (max 100 words) in a **{}** tone, \
             finishing with exactly 4 relevant hashtags.\n\n",
            self.tone
        ));

        // 2. Output contract
        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");

        // 3. The article
        prompt.push_str("Article:\n\"\"\"");
        prompt.push_str(&self.text);
        prompt.push_str("\"\"\"");

        prompt
    }
}

const OUTPUT_FORMAT: &str = r#"Return valid JSON with keys "summary" (string) and "post" (string). Do not include any code expressions."#;
