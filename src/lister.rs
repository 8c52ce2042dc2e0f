//! Text report for the `list-models` binary.

use crate::generator::gemini::ModelInfo;

pub const HEADER: &str = "Available Generative AI Models (supporting generateContent):";

fn rule() -> String {
    "-".repeat(60)
}

/// One model block, terminated by a dashed rule.
pub fn format_model(model: &ModelInfo) -> String {
    let mut out = format!("Model Name: {}\n", model.name);
    if !model.display_name.is_empty() {
        out.push_str(&format!("  Display Name: {}\n", model.display_name));
    }
    out.push_str(&format!("  Description: {}\n", model.description));
    out.push_str(&format!("  Input Token Limit: {}\n", model.input_token_limit));
    out.push_str(&format!("  Output Token Limit: {}\n", model.output_token_limit));
    out.push_str(&format!(
        "  Supported Methods: {}\n",
        model.supported_generation_methods.join(", ")
    ));
    out.push_str(&rule());
    out.push('\n');
    out
}

/// Full report for the models that support content generation.
pub fn render_report(models: &[ModelInfo]) -> String {
    let mut out = format!("{HEADER}\n{}\n", rule());
    for model in models.iter().filter(|m| m.supports_generation()) {
        out.push_str(&format_model(model));
    }
    out
}
