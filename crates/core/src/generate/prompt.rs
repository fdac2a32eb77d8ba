use super::types::GenerationRequest;

/// System preamble sent with every generation request.
pub const SYSTEM_PREAMBLE: &str = r#"You are a VLSI design expert. Generate Verilog code based on user requirements.

IMPORTANT: Always respond with valid JSON in this exact format:
{
  "mainFile": {
    "name": "descriptive-name.v",
    "content": "// Verilog module code here"
  },
  "testbenchFile": {
    "name": "descriptive-name-testbench.v",
    "content": "// Testbench code here"
  }
}

If the user asks you to debug existing code instead, respond with:
{
  "debugInfo": {
    "errors": ["description of each problem"],
    "fixes": ["description of each fix"]
  }
}

Rules:
- Use kebab-case for file names (e.g., "full-adder.v", "counter-4bit.v")
- Include comprehensive testbenches
- Add proper comments and documentation
- Follow Verilog best practices
- Make code synthesizable and simulation-ready
- Use proper indentation and formatting"#;

/// Build the user prompt for a generation request.
///
/// Project files come first so the instruction can refer to them, then the
/// optional context, then the instruction itself.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut parts = Vec::new();

    for file in &request.files {
        parts.push(format!("// File: {}\n{}", file.name, file.content));
    }

    if let Some(ctx) = &request.context {
        parts.push(format!("// Context\n// {}", ctx));
    }

    parts.push(request.instruction.clone());

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::types::GeneratedFile;

    #[test]
    fn test_instruction_only() {
        let request = GenerationRequest {
            instruction: "Generate a 2-bit adder".to_string(),
            context: None,
            files: vec![],
        };

        assert_eq!(build_prompt(&request), "Generate a 2-bit adder");
    }

    #[test]
    fn test_files_and_context_precede_instruction() {
        let request = GenerationRequest {
            instruction: "Add an enable input".to_string(),
            context: Some("Targets an iCE40 board".to_string()),
            files: vec![GeneratedFile {
                name: "counter.v".to_string(),
                content: "module counter; endmodule".to_string(),
            }],
        };

        let prompt = build_prompt(&request);
        assert!(prompt.starts_with("// File: counter.v\nmodule counter; endmodule"));
        assert!(prompt.contains("// Context\n// Targets an iCE40 board"));
        assert!(prompt.ends_with("Add an enable input"));
    }

    #[test]
    fn test_preamble_describes_both_shapes() {
        assert!(SYSTEM_PREAMBLE.contains("\"mainFile\""));
        assert!(SYSTEM_PREAMBLE.contains("\"testbenchFile\""));
        assert!(SYSTEM_PREAMBLE.contains("\"debugInfo\""));
    }
}
