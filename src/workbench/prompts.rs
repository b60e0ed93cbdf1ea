// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Meta-operation prompt text
//!
//! Fixed instructions sent alongside the user's material for the AI-assisted
//! operations. The block names inside the agent-builder instruction are part
//! of the expected output contract and must not be localized.

/// System instruction for the create-agent and refine-agent operations
pub const META_SYSTEM_INSTRUCTION: &str = r##"You are a world-class Prompt Engineering expert with deep knowledge of LLM capabilities and limitations. Your expertise includes techniques from leading AI companies like Anthropic, OpenAI, and Google.

Your task is to create or modify system prompts following these strict guidelines:

1. STRUCTURE:
- Use clear, hierarchical blocks with specific purposes
- Each block must start with "# BLOCK_NAME"
- Ensure logical flow between blocks

2. CONTENT QUALITY:
- Be extremely specific and detailed
- Use clear, unambiguous language
- Include examples where helpful
- Add constraints to prevent unwanted behavior
- Define clear success criteria

3. BEST PRACTICES:
- Use Chain-of-Thought prompting
- Implement Few-Shot learning where applicable
- Include self-reflection mechanisms
- Add error handling instructions
- Specify output format requirements

4. REQUIRED BLOCKS:
# PAPEL
- Clear role definition
- Specific expertise areas
- Behavioral guidelines

# CONTEXTO
- Background information
- Target audience
- Relevant constraints
- Business context

# INSTRUÇÕES
- Step-by-step process
- Decision-making criteria
- Quality standards
- Error handling

# REGRAS
- Clear boundaries
- Ethical guidelines
- Safety constraints
- Format requirements

# FORMATO DE SAÍDA
- Exact output structure
- Examples of correct format
- Error response format
- Quality criteria

Your output must be ONLY the formatted prompt blocks, without any explanations or meta-commentary."##;

/// System instruction for the suggest-improvement operation
pub const IMPROVE_SYSTEM_INSTRUCTION: &str = "You are a world-class Prompt Engineering expert. Your task is to analyze and refine prompts to maximize their effectiveness with Large Language Models like Gemini. You follow instructions precisely and provide concise, direct, and actionable improvements.";

/// User prompt for the suggest-improvement operation
pub fn improve_user_prompt(current_system_prompt: &str, user_prompt: &str) -> String {
    let user_context = if user_prompt.is_empty() {
        "(No user prompt provided, assume a generic one related to the system prompt's context)"
    } else {
        user_prompt
    };

    format!(
        "Analyze the following prompt components and provide an improved version of the SYSTEM PROMPT blocks.\n\n\
         Your goal is to make the system prompt clearer, more detailed, and structured for optimal performance. \
         You can add, remove, or merge blocks as you see fit. Provide specific examples within the prompt content where helpful.\n\n\
         The response MUST BE ONLY the improved system prompt, formatted exactly as a series of blocks, \
         each starting with a title line like '# TITLE'. Do not add any extra explanations, greetings, \
         or introductory text like \"Here is the improved prompt:\".\n\n\
         ---\nCURRENT SYSTEM PROMPT:\n{current_system_prompt}\n---\nCURRENT USER PROMPT (for context):\n{user_context}\n---\n"
    )
}

/// User prompt for the create-agent operation
pub fn create_agent_user_prompt(description: &str) -> String {
    format!("USER's AGENT IDEA:\n\"{description}\"")
}

/// User prompt for the refine-agent operation
pub fn refine_agent_user_prompt(current_system_prompt: &str, observation: &str) -> String {
    format!(
        "CURRENT SYSTEM PROMPT:\n{current_system_prompt}\n\n\
         USER'S REFINEMENT REQUEST:\n\"{observation}\"\n\n\
         Please refine the system prompt based on the user's observation."
    )
}

/// Target language for the translate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateTarget {
    English,
    BrazilianPortuguese,
}

impl TranslateTarget {
    /// Fixed translation instruction for this target
    pub fn instruction(&self) -> &'static str {
        match self {
            TranslateTarget::English => {
                "Translate the following system prompt to English while maintaining its structure, \
                 meaning, and technical accuracy. Keep the block format intact."
            }
            TranslateTarget::BrazilianPortuguese => {
                "Traduza o seguinte system prompt para Português do Brasil, mantendo sua estrutura, \
                 significado e precisão técnica. Mantenha o formato dos blocos intacto."
            }
        }
    }

    /// User prompt wrapping the serialized system prompt
    pub fn user_prompt(&self, current_system_prompt: &str) -> String {
        match self {
            TranslateTarget::English => {
                format!("System Prompt to translate:\n\n{current_system_prompt}")
            }
            TranslateTarget::BrazilianPortuguese => {
                format!("System Prompt para traduzir:\n\n{current_system_prompt}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_instruction_demands_block_format() {
        assert!(META_SYSTEM_INSTRUCTION.contains("\"# BLOCK_NAME\""));
        assert!(META_SYSTEM_INSTRUCTION.contains("# PAPEL"));
        assert!(META_SYSTEM_INSTRUCTION.contains("# FORMATO DE SAÍDA"));
        // The required-blocks section sits past the quoted "# BLOCK_NAME"
        // marker; the constant must run through its closing sentence
        assert!(META_SYSTEM_INSTRUCTION
            .ends_with("without any explanations or meta-commentary."));
    }

    #[test]
    fn test_improve_prompt_includes_material() {
        let prompt = improve_user_prompt("# A\n\ncontent", "do something");
        assert!(prompt.contains("CURRENT SYSTEM PROMPT:\n# A\n\ncontent"));
        assert!(prompt.contains("CURRENT USER PROMPT (for context):\ndo something"));
    }

    #[test]
    fn test_improve_prompt_without_user_prompt() {
        let prompt = improve_user_prompt("# A\n\ncontent", "");
        assert!(prompt.contains("(No user prompt provided"));
    }

    #[test]
    fn test_create_agent_prompt_quotes_description() {
        assert_eq!(
            create_agent_user_prompt("a pirate chatbot"),
            "USER's AGENT IDEA:\n\"a pirate chatbot\""
        );
    }

    #[test]
    fn test_refine_prompt_carries_observation() {
        let prompt = refine_agent_user_prompt("# A\n\nx", "too verbose");
        assert!(prompt.contains("USER'S REFINEMENT REQUEST:\n\"too verbose\""));
    }

    #[test]
    fn test_translate_targets_differ() {
        assert_ne!(
            TranslateTarget::English.instruction(),
            TranslateTarget::BrazilianPortuguese.instruction()
        );
        assert!(TranslateTarget::English
            .user_prompt("# A")
            .starts_with("System Prompt to translate:"));
        assert!(TranslateTarget::BrazilianPortuguese
            .user_prompt("# A")
            .starts_with("System Prompt para traduzir:"));
    }
}
