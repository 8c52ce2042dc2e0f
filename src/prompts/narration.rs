use crate::annotation::{AnnotationRequest, SegmentType};

const INTRO: &str = "You are a world-class, award-winning voice actor and narration director.\n\
Your task is to analyze a manuscript and provide creative performance suggestions as a JSON array.";

const CREATIVITY_INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "subtle",
        "You should be conservative with your annotations. Use the 'normal' type frequently and only add performance suggestions for the most impactful moments.",
    ),
    (
        "balanced",
        "You should provide a healthy mix of performance suggestions and 'normal' text, ensuring a dynamic but not overly dramatic reading.",
    ),
    (
        "dramatic",
        "You should be very liberal with your annotations. Use a wide variety of performance types and avoid using 'normal' unless absolutely necessary to create a highly emotive performance.",
    ),
];

const STYLE_INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "neutral storyteller",
        "Your suggestions should create a clear, objective, and engaging narration without a strong character bias.",
    ),
    (
        "grave detective",
        "Your suggestions should evoke a sense of mystery, seriousness, and suspense. Favor 'lower-pitch', 'slow-down', and 'emphasize' to build tension.",
    ),
    (
        "energetic youth",
        "Your suggestions should be full of energy and excitement. Favor 'speed-up', 'raise-pitch', and exclamation.",
    ),
    (
        "calm mentor",
        "Your suggestions should create a feeling of wisdom, patience, and reassurance. Favor 'slow-down', gentle tones, and thoughtful pauses.",
    ),
];

const CRITICAL_RULE: &str = "**CRITICAL RULE:** The concatenation of all \"text\" fields in your final JSON array must exactly match the original manuscript text, including all whitespace and newlines.";

const EMOJI_CHOICES: &str = "😊, 😢, 😠, 😨, 😲";

const OUTPUT_CONTRACT: &str = "You MUST return your response as a valid JSON array of objects. Each object must have these exact keys: \"text\", \"type\", \"feedback\", and \"emotion_emoji\".";

fn lookup(table: &[(&str, &'static str)], key: &str) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or("")
}

/// Guidance for a creativity level. Unknown levels get none.
pub fn creativity_instruction(level: &str) -> &'static str {
    lookup(CREATIVITY_INSTRUCTIONS, level)
}

/// Guidance for a narrator persona. Unknown styles get none.
pub fn style_instruction(style: &str) -> &'static str {
    lookup(STYLE_INSTRUCTIONS, style)
}

fn annotation_types() -> String {
    SegmentType::ALL
        .iter()
        .map(|ty| format!("'{}'", ty.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the full instruction prompt for one annotation request.
pub fn build_narration_prompt(request: &AnnotationRequest) -> String {
    let persona = join_clause(
        &format!(
            "You must embody the persona of a **{}**.",
            request.narrator_style
        ),
        style_instruction(&request.narrator_style),
    );
    let creativity = join_clause(
        &format!(
            "Your level of annotation activity should be **{}**.",
            request.creativity_level
        ),
        creativity_instruction(&request.creativity_level),
    );

    let context = match request.book_context() {
        Some(description) => format!(
            "**BOOK CONTEXT:**\nUse the following book description to inform your suggestions, matching the overall tone and message:\n\"{description}\"\n\n"
        ),
        None => String::new(),
    };

    format!(
        "{intro}\n\n\
         **YOUR PERSONA:**\n{persona}\n\n\
         **CREATIVITY GUIDELINE:**\n{creativity}\n\n\
         {context}\
         {critical_rule}\n\n\
         **ANALYSIS INSTRUCTIONS:**\n\
         1. **Annotation Type**: Choose ONE from: {types}.\n\
         2. **Feedback**: A short, one-sentence explanation for your choice, aligned with your persona.\n\
         3. **Emotion Emoji**: A single emoji: {emoji}. Use \"\" if no strong emotion is present.\n\n\
         {output_contract}\n\n\
         Now, analyze this manuscript:\n---\n{text}",
        intro = INTRO,
        persona = persona,
        creativity = creativity,
        context = context,
        critical_rule = CRITICAL_RULE,
        types = annotation_types(),
        emoji = EMOJI_CHOICES,
        output_contract = OUTPUT_CONTRACT,
        text = request.text,
    )
}

fn join_clause(head: &str, instruction: &str) -> String {
    if instruction.is_empty() {
        head.to_string()
    } else {
        format!("{head} {instruction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_ends_with_manuscript() {
        let text = "The door creaked.\n\n  She froze.";
        let prompt = build_narration_prompt(&AnnotationRequest::new(text));
        assert!(prompt.ends_with(text));
    }

    #[test]
    fn prompt_lists_all_annotation_types() {
        let prompt = build_narration_prompt(&AnnotationRequest::new("x"));
        for ty in SegmentType::ALL {
            assert!(prompt.contains(&format!("'{}'", ty.as_str())));
        }
    }

    #[test]
    fn prompt_includes_known_instructions() {
        let req = AnnotationRequest::new("x")
            .with_style("grave detective")
            .with_creativity("dramatic");
        let prompt = build_narration_prompt(&req);
        assert!(prompt.contains(style_instruction("grave detective")));
        assert!(prompt.contains(creativity_instruction("dramatic")));
        assert!(prompt.contains("**grave detective**"));
    }

    #[test]
    fn unknown_values_have_no_instruction() {
        assert_eq!(style_instruction("pirate captain"), "");
        assert_eq!(creativity_instruction("unhinged"), "");
    }

    #[test]
    fn unknown_values_omit_clause() {
        let req = AnnotationRequest::new("x")
            .with_style("pirate captain")
            .with_creativity("unhinged");
        let prompt = build_narration_prompt(&req);
        assert!(prompt.contains("persona of a **pirate captain**.\n"));
        assert!(prompt.contains("should be **unhinged**.\n"));
        for (_, instruction) in STYLE_INSTRUCTIONS.iter().chain(CREATIVITY_INSTRUCTIONS) {
            assert!(!prompt.contains(instruction));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(style_instruction("Calm Mentor"), "");
        assert!(!style_instruction("calm mentor").is_empty());
    }

    #[test]
    fn every_table_entry_is_non_empty() {
        for (key, instruction) in STYLE_INSTRUCTIONS.iter().chain(CREATIVITY_INSTRUCTIONS) {
            assert!(!key.is_empty());
            assert!(!instruction.is_empty());
        }
    }

    #[test]
    fn book_context_present_when_described() {
        let req = AnnotationRequest::new("x").with_book_description("\n  A cozy mystery.  ");
        let prompt = build_narration_prompt(&req);
        assert!(prompt.contains("BOOK CONTEXT"));
        assert!(prompt.contains("\"A cozy mystery.\""));
    }

    #[test]
    fn book_context_absent_when_blank() {
        for description in ["", "   ", "\n\t"] {
            let req = AnnotationRequest::new("x").with_book_description(description);
            assert!(!build_narration_prompt(&req).contains("BOOK CONTEXT"));
        }
    }

    #[test]
    fn prompt_states_concatenation_rule_and_keys() {
        let prompt = build_narration_prompt(&AnnotationRequest::new("x"));
        assert!(prompt.contains(CRITICAL_RULE));
        assert!(prompt.contains("\"emotion_emoji\""));
    }

    #[test]
    fn prompt_is_deterministic() {
        let req = AnnotationRequest::new("Same input.")
            .with_style("calm mentor")
            .with_book_description("Essays.");
        assert_eq!(build_narration_prompt(&req), build_narration_prompt(&req));
    }
}
