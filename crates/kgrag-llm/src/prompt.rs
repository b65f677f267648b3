//! Prompt templates for answering and extraction.

use crate::backend::{LlmError, LlmResult};
use kgrag_core::StructuredData;

const ANSWER_PREFIX: &str = "Given the context:\n";
const ANSWER_QUESTION: &str = "\nAnswer the question: ";
const ANSWER_SUFFIX: &str = "\nThe answer should include the data from context only not other info";

/// A prompt template for LLM requests.
pub trait PromptTemplate {
    /// Generate the prompt text.
    fn generate(&self) -> String;

    /// Get the system prompt (if any).
    fn system_prompt(&self) -> Option<String> {
        None
    }
}

/// Prompt that restricts an answer to a retrieved context.
#[derive(Debug, Clone)]
pub struct AnswerPrompt {
    pub question: String,
    pub context: String,
}

impl AnswerPrompt {
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: context.into(),
        }
    }

    /// Recover the context section from a generated answer prompt.
    pub fn context_of(prompt: &str) -> Option<&str> {
        let rest = prompt.strip_prefix(ANSWER_PREFIX)?;
        let end = rest.rfind(ANSWER_QUESTION)?;
        Some(&rest[..end])
    }
}

impl PromptTemplate for AnswerPrompt {
    fn generate(&self) -> String {
        format!(
            "{ANSWER_PREFIX}{}{ANSWER_QUESTION}{}{ANSWER_SUFFIX}",
            self.context, self.question
        )
    }
}

/// Prompt for entity/relationship extraction from one chunk of text.
///
/// The chunk itself is the user message; the record schema lives in the
/// system prompt.
#[derive(Debug, Clone)]
pub struct ExtractionPrompt {
    pub text: String,
}

impl ExtractionPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PromptTemplate for ExtractionPrompt {
    fn system_prompt(&self) -> Option<String> {
        Some(
            r#"Extract entities and relationships in JSON format to store them in a graph database. Return the response in the following structure. The keys should be present in the entities and relationships:

{
  "entities": [
    { "id": "1", "name": "India", "type": "Country", "description": "A country in South Asia." },
    { "id": "2", "name": "Pandemic", "type": "Event", "description": "Global outbreak of a disease." }
  ],
  "relationships": [
    { "from": "1", "to": "2", "type": "affected_by", "context": "Economic impact due to the pandemic" }
  ]
}

Make sure to store longer sentences in the description and context fields so that meaningful answers can be retrieved. Respond ONLY with the JSON object."#
                .to_string(),
        )
    }

    fn generate(&self) -> String {
        self.text.clone()
    }
}

/// Parse an extraction response into records.
///
/// Markdown code fences and any prose around the outermost JSON object are
/// ignored. Missing keys become empty strings.
pub fn parse_extraction_json(response: &str) -> LlmResult<StructuredData> {
    let json = extract_json_object(response);
    StructuredData::from_json_str(json).map_err(|e| {
        LlmError::ParseError(format!(
            "Failed to parse extraction: {}. Response: {}",
            e, response
        ))
    })
}

fn extract_json_object(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    let text = text.trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_wording() {
        let prompt = AnswerPrompt::new("Where?", "Name: Paris").generate();
        assert_eq!(
            prompt,
            "Given the context:\nName: Paris\nAnswer the question: Where?\nThe answer should include the data from context only not other info"
        );
    }

    #[test]
    fn context_round_trips_through_prompt() {
        let context = "Description: x\nName: y\nRelationships: none";
        let prompt = AnswerPrompt::new("q", context).generate();
        assert_eq!(AnswerPrompt::context_of(&prompt), Some(context));
        assert_eq!(AnswerPrompt::context_of("free text"), None);
    }

    #[test]
    fn extraction_prompt_carries_schema() {
        let prompt = ExtractionPrompt::new("India was affected by the pandemic.");
        let system = prompt.system_prompt().unwrap();
        assert!(system.contains("\"relationships\""));
        assert!(system.contains("affected_by"));
        assert_eq!(prompt.generate(), "India was affected by the pandemic.");
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = r#"{"entities": [{"id": "1", "name": "India", "type": "Country"}],
                        "relationships": [{"from": "1", "to": "2", "type": "affected_by"}]}"#;
        let data = parse_extraction_json(plain).unwrap();
        assert_eq!(data.entities[0].entity_type, "Country");
        assert_eq!(data.relationships[0].context, "");

        let fenced = format!("```json\n{}\n```", plain);
        assert_eq!(parse_extraction_json(&fenced).unwrap(), data);

        let chatty = format!("Here you go:\n{}\nHope this helps.", plain);
        assert_eq!(parse_extraction_json(&chatty).unwrap(), data);
    }

    #[test]
    fn unparseable_response_is_parse_error() {
        assert!(matches!(
            parse_extraction_json("I cannot do that."),
            Err(LlmError::ParseError(_))
        ));
    }
}
