/// Prompt templates for the analysis and reformatting passes

pub const SECURITY_ANALYSIS_INSTRUCTION: &str =
    "Perform a detailed security analysis of these logs:";

pub const ADDITIONAL_CONTEXT_LABEL: &str = "Additional context:";

pub const MARKDOWN_OUTPUT_INSTRUCTION: &str = "Format the response as Markdown. Use headings \
    for each section (for example Summary, Findings, Indicators of Compromise and Recommended \
    Actions) and bullet points for individual findings and actions.";

pub const REFACTOR_INSTRUCTION: &str = "Please refactor the following text into a \
    well-structured report in valid Markdown with appropriate headings, bullet points, and \
    paragraphs separated by blank lines. Keep every finding, indicator and recommendation. \
    Fix any grammatical errors and unusual spaces:";

/// Build the analysis prompt around the log text and the user's context
pub fn security_analysis_prompt(log_contents: &str, additional_context: &str) -> String {
    format!(
        "{}\n{}\n\n{} {}\n\n{}",
        SECURITY_ANALYSIS_INSTRUCTION,
        log_contents,
        ADDITIONAL_CONTEXT_LABEL,
        additional_context,
        MARKDOWN_OUTPUT_INSTRUCTION
    )
}

/// Build the reformatting prompt for already-cleaned model output
pub fn refactor_prompt(cleaned_text: &str) -> String {
    format!("{}\n\n{}", REFACTOR_INSTRUCTION, cleaned_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_logs_and_context() {
        let prompt = security_analysis_prompt("root login from 10.0.0.5", "bastion host");

        assert!(prompt.starts_with("Perform a detailed security analysis of these logs:\nroot login"));
        assert!(prompt.contains("Additional context: bastion host"));
        assert!(prompt.contains("Markdown"));
        assert!(prompt.contains("bullet points"));
    }

    #[test]
    fn test_refactor_prompt_ends_with_text() {
        let prompt = refactor_prompt("# Summary\n- item");
        assert!(prompt.starts_with("Please refactor"));
        assert!(prompt.ends_with("\n\n# Summary\n- item"));
    }
}
