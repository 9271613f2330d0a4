// src/generate/prompt.rs

//! Prompt construction for recipe generation

use super::GenerationRequest;

/// System and user messages for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrompt {
    pub system: String,
    pub user: String,
}

pub const SYSTEM_PROMPT: &str =
    "You are a senior build engineer. Output ONLY a valid Dockerfile. No prose.";

impl RecipePrompt {
    pub fn build(request: &GenerationRequest) -> Self {
        let filename = &request.filename;
        let user = [
            "Create a minimal Dockerfile that runs the provided script exactly like the example."
                .to_string(),
            format!("Script filename: {}", filename),
            format!(
                "Script contents:\n<<<BEGIN_SCRIPT\n{}\n<<<END_SCRIPT",
                request.script
            ),
            format!(
                "Script documentation:\n<<<BEGIN_README\n{}\n<<<END_README",
                request.documentation
            ),
            format!(
                "How it should be run INSIDE the container: {}",
                request.in_container_command
            ),
            "Rules:".to_string(),
            "- For bash scripts, use \"bash:latest\" base image.".to_string(),
            format!("- COPY the script to /{} in the container root.", filename),
            format!("- RUN chmod +x /{} to make it executable.", filename),
            format!(
                "- Use ENTRYPOINT [\"bash\", \"/{}\"] for bash scripts to ensure proper execution.",
                filename
            ),
            "- Use CMD with default arguments from the example.".to_string(),
            "- Do NOT modify the script or download external files.".to_string(),
            "- Use the README documentation to understand the script's purpose and requirements."
                .to_string(),
            "- Ensure the script runs exactly as shown in the documentation.".to_string(),
            "- Output ONLY the Dockerfile text.".to_string(),
        ]
        .join("\n");

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
