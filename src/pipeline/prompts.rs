//! System prompts for the text-generation stages.

use serde::{Deserialize, Serialize};

/// Style directive sent to instruction-capable speech models when the
/// caller gives none.
pub const DEFAULT_STYLE_DIRECTIVE: &str = "Speak in a clear, natural, and professional tone.\n\
Keep a moderate pace that is easy to follow.\n\
Use intonation and emphasis that make the meaning obvious.";

/// Longest contextual prompt forwarded to a transcription call.
pub const MAX_TRANSCRIPTION_PROMPT_CHARS: usize = 500;

const PROMPT_OPTIMIZATION_TEMPLATE: &str = r#"You are a speech-recognition specialist fluent in {language}.

Read the draft transcription supplied by the user and write a short context prompt (at most 500 characters) that will help a second transcription pass over the same audio in {language}.

The prompt must cover, in this order:
1. Context: topic and domain of the recording.
2. Vocabulary: names, proper nouns and technical or domain terms that appear in the draft.
3. Style: register (formal, casual, technical) and whether filler words should be kept.
4. Conventions: any {language}-specific transcription conventions that apply.

Use only information present in the draft. Do not explain yourself.

Answer with exactly one JSON object:
{"prompt": "<the prompt>"}

If you cannot satisfy these rules, answer:
{"error": "<reason>"}"#;

const TRANSCRIPT_CLEANUP_TEMPLATE: &str = r#"You are a careful transcription editor working in {language}.

The user sends a raw automatic transcription. Return the same text with recognition errors fixed: misheard words, broken punctuation, wrong capitalisation and obviously split or merged words.

Rules:
- Keep the language ({language}); never translate.
- Do not summarise, add or remove content.
- Keep names and technical terms unless they are clearly misrecognised.
- Output only the corrected transcript, with no commentary."#;

const TRANSLATION_TEMPLATE: &str = r#"You are a professional translator producing natural, fluent text.

Translate the user's message from {source_language} to {target_language}.

Requirements:
- The result must read as if originally written by a native {target_language} speaker.
- Keep the tone and the level of formality of the source.
- Adapt idioms and cultural references so the meaning survives.
- Leave proper nouns, brand names and technical terms unchanged where appropriate.

Constraints:
- Output only the translation. No preface, notes or explanations.
- Do not add, drop or alter information."#;

/// Renders the prompt-optimizer system message.
pub fn prompt_optimization_system(language_name: &str) -> String {
    PROMPT_OPTIMIZATION_TEMPLATE.replace("{language}", language_name)
}

/// User message for the prompt optimizer.
pub fn prompt_optimization_user(language_name: &str, transcript: &str) -> String {
    format!(
        "Language: {}\n\nDraft transcription:\n{}",
        language_name, transcript
    )
}

/// Renders the transcript-cleanup system message.
pub fn transcript_cleanup_system(language_name: &str) -> String {
    TRANSCRIPT_CLEANUP_TEMPLATE.replace("{language}", language_name)
}

/// Renders the translation system message.
pub fn translation_system(source_language: &str, target_language: &str) -> String {
    TRANSLATION_TEMPLATE
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
}

/// Prompt used when optimization fails.
pub fn fallback_prompt(language_name: &str) -> String {
    format!("Audio content in {}.", language_name)
}

/// Named style directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoicePreset {
    Narration,
    Conversation,
    Professional,
    Emotional,
}

impl VoicePreset {
    pub const ALL: [VoicePreset; 4] = [
        VoicePreset::Narration,
        VoicePreset::Conversation,
        VoicePreset::Professional,
        VoicePreset::Emotional,
    ];

    pub fn directive(&self) -> &'static str {
        match self {
            VoicePreset::Narration => {
                "Speak in a warm, engaging narrator voice with steady pacing and clear enunciation."
            }
            VoicePreset::Conversation => {
                "Speak naturally, as in a relaxed conversation, with varied intonation."
            }
            VoicePreset::Professional => {
                "Speak in a clear, confident and professional tone suited to business content."
            }
            VoicePreset::Emotional => {
                "Speak expressively, letting the tone follow the sentiment of the content."
            }
        }
    }
}

impl std::str::FromStr for VoicePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narration" => Ok(VoicePreset::Narration),
            "conversation" => Ok(VoicePreset::Conversation),
            "professional" => Ok(VoicePreset::Professional),
            "emotional" => Ok(VoicePreset::Emotional),
            other => Err(format!("unknown voice preset '{}'", other)),
        }
    }
}

/// Extracts the prompt from the optimizer's answer.
///
/// Accepts `{"prompt": ...}` (optionally inside a code fence) or bare text.
/// `{"error": ...}`, blank answers, JSON without a usable prompt and prompts
/// longer than [`MAX_TRANSCRIPTION_PROMPT_CHARS`] are failures.
pub fn parse_optimized_prompt(raw: &str) -> Result<String, String> {
    let prompt = extract_prompt(raw)?;
    let chars = prompt.chars().count();
    if chars > MAX_TRANSCRIPTION_PROMPT_CHARS {
        return Err(format!(
            "prompt optimization returned {} characters, limit is {}",
            chars, MAX_TRANSCRIPTION_PROMPT_CHARS
        ));
    }
    Ok(prompt)
}

fn extract_prompt(raw: &str) -> Result<String, String> {
    let trimmed = strip_code_fence(raw.trim());
    if trimmed.is_empty() {
        return Err("prompt optimization returned empty output".to_string());
    }

    if !trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("prompt optimization returned malformed JSON: {}", e))?;

    if let Some(error) = value.get("error") {
        let reason = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
        return Err(format!("prompt optimization declined: {}", reason));
    }

    value
        .get("prompt")
        .and_then(|p| p.as_str())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .ok_or_else(|| "prompt optimization JSON has no prompt".to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_templates_are_filled() {
        let system = translation_system("Hebrew", "Russian");
        assert!(system.contains("from Hebrew to Russian"));
        assert!(!system.contains('{'));

        let optimizer = prompt_optimization_system("Spanish");
        assert!(optimizer.contains("fluent in Spanish"));
        assert!(!optimizer.contains("{language}"));

        assert!(transcript_cleanup_system("German").contains("(German)"));
    }

    #[test]
    fn test_fallback_prompt() {
        assert_eq!(fallback_prompt("English"), "Audio content in English.");
    }

    #[test_case(r#"{"prompt": "Context: a lecture."}"#, Ok("Context: a lecture."); "json envelope")]
    #[test_case("```json\n{\"prompt\": \"Context: news.\"}\n```", Ok("Context: news."); "fenced json")]
    #[test_case("Context: a podcast about cooking.", Ok("Context: a podcast about cooking."); "bare text")]
    #[test_case(r#"{"error": "Prompt exceeds length"}"#, Err(()); "declined")]
    #[test_case(r#"{"prompt": "  "}"#, Err(()); "blank prompt")]
    #[test_case("   ", Err(()); "empty")]
    #[test_case("{not json", Err(()); "malformed")]
    #[test_case(&"x".repeat(MAX_TRANSCRIPTION_PROMPT_CHARS + 1), Err(()); "bare text over limit")]
    #[test_case(&format!(r#"{{"prompt": "{}"}}"#, "é".repeat(MAX_TRANSCRIPTION_PROMPT_CHARS + 1)), Err(()); "json prompt over limit")]
    fn test_parse_optimized_prompt(raw: &str, expected: Result<&str, ()>) {
        let parsed = parse_optimized_prompt(raw);
        match expected {
            Ok(prompt) => assert_eq!(parsed.unwrap(), prompt),
            Err(()) => assert!(parsed.is_err()),
        }
    }

    #[test]
    fn test_prompt_limit_counts_characters() {
        let prompt = "é".repeat(MAX_TRANSCRIPTION_PROMPT_CHARS);
        assert_eq!(parse_optimized_prompt(&prompt).unwrap(), prompt);
    }

    #[test]
    fn test_presets_parse() {
        for preset in VoicePreset::ALL {
            let name = serde_json::to_value(preset).unwrap();
            let parsed: VoicePreset = name.as_str().unwrap().parse().unwrap();
            assert_eq!(parsed, preset);
            assert!(!preset.directive().is_empty());
        }
    }
}
