//! Chat-style messages describing a [`GenerationResult`].

use super::types::GenerationResult;

/// Render the message shown to the user after a generation.
///
/// `saved` holds the names the files were actually written under, main file
/// first, which may differ from the generated names after collision
/// handling. Files missing from it are listed under their generated name.
pub fn render_message(result: &GenerationResult, saved: &[String]) -> String {
    match result {
        GenerationResult::Files {
            main_file,
            testbench_file,
        } => {
            let main_name = saved.first().unwrap_or(&main_file.name);
            let testbench_name = testbench_file
                .as_ref()
                .map(|f| saved.get(1).unwrap_or(&f.name));

            let mut message = format!(
                "**Code Generated Successfully!**\n\n**Files Created:**\n• {main_name}"
            );
            match testbench_name {
                Some(name) => message.push_str(&format!("\n• {name}")),
                None => message.push_str("\n\nNo testbench was returned for this module."),
            }
            message.push_str(
                "\n\nThe files have been added to your project and are ready for simulation.",
            );
            message
        }
        GenerationResult::Debug { debug_info } => format!(
            "**Debug Analysis Complete**\n\n**Errors Found:**\n{}\n\n**Suggested Fixes:**\n{}",
            bullets(&debug_info.errors),
            bullets(&debug_info.fixes)
        ),
        GenerationResult::Raw { raw_response } => format!(
            "**Partial Response Received**\n\nThe AI model returned unstructured text. Here's what it generated:\n\n**Raw AI Output:**\n```\n{raw_response}\n```\n\n**Tip:** Try rephrasing your request with more specific details."
        ),
    }
}

/// Render the banner for a failed generation.
pub fn render_error(message: &str) -> String {
    format!(
        "**Generation Failed**\n\n**Error:** {message}\n\n**Troubleshooting:**\n• Try a simpler request (e.g., \"Generate a 2-bit adder\")\n• Be more specific about inputs/outputs\n• Ensure your prompt is clear and concise"
    )
}

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "• (none)".to_string();
    }

    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
