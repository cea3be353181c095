//! Prompts and instruction text sent to the model.
//!
//! Centralising every prompt here keeps prompt tweaks out of the request
//! and retry code, and lets unit tests inspect the exact strings without a
//! live API. Callers can override the system prompt via
//! [`crate::config::SummarizeConfig::system_prompt`].

use crate::language::Language;

/// Default system instruction: the model acts as an academic summariser.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert academic research assistant. Your task is to read the provided document (a research paper, report or article) and write a clear, well-structured summary report in Markdown.

Follow these rules precisely:

1. STRUCTURE
   - Start with a single # title naming the document
   - Use ## sections: Overview, Key Contributions, Methodology, Results, Limitations, Conclusion
   - Omit a section only when the document has nothing relevant for it

2. CONTENT
   - Be faithful to the source; never invent results, numbers or citations
   - Keep important figures, metrics and named methods exactly as written
   - Prefer short paragraphs and bullet lists over long prose

3. FOCUS
   - If the user gives a focus instruction, emphasise that aspect throughout

4. OUTPUT FORMAT
   - Output ONLY the Markdown report
   - Do NOT wrap the report in ```markdown fences
   - Do NOT add commentary about these instructions"#;

/// Marker placed before pasted text.
pub const TEXT_START_MARKER: &str = "--- START OF TEXT ---";

/// Marker placed after pasted text.
pub const TEXT_END_MARKER: &str = "--- END OF TEXT ---";

/// Directive asking for the final output in `language`.
pub fn language_directive(language: Language) -> String {
    format!(
        "Translate the final summary into {}.",
        language.display_name()
    )
}

/// Compose the user instruction from an optional focus and the language
/// directive.
///
/// A blank focus yields the directive alone, with no leading separator.
pub fn compose_instruction(focus: &str, language: Language) -> String {
    let focus = focus.trim();
    let directive = language_directive(language);
    if focus.is_empty() {
        directive
    } else {
        format!("{focus}\n\n{directive}")
    }
}

/// Wrap pasted text in start/end markers after the instruction.
pub fn text_turn(instruction: &str, text: &str) -> String {
    format!("{instruction}\n\n{TEXT_START_MARKER}\n{text}\n{TEXT_END_MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_focus_yields_bare_directive() {
        assert_eq!(
            compose_instruction("", Language::English),
            "Translate the final summary into English."
        );
        assert_eq!(
            compose_instruction("   \n", Language::Spanish),
            "Translate the final summary into Spanish."
        );
    }

    #[test]
    fn focus_precedes_directive() {
        let s = compose_instruction("  Focus on the evaluation. ", Language::Korean);
        assert_eq!(
            s,
            "Focus on the evaluation.\n\nTranslate the final summary into Korean."
        );
    }

    #[test]
    fn text_turn_has_markers_in_order() {
        let t = text_turn("Summarise.", "body");
        let start = t.find(TEXT_START_MARKER).unwrap();
        let body = t.find("body").unwrap();
        let end = t.find(TEXT_END_MARKER).unwrap();
        assert!(t.starts_with("Summarise."));
        assert!(start < body && body < end);
    }
}
