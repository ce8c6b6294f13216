//! System prompts for the document assistant

use crate::model::ContextChunk;

/// Prompt used when no class context was retrieved
pub const PERSONAL_ASSISTANT_PROMPT: &str = "You are a Personal AI Document Assistant. You help users analyze, summarize, and extract insights from their personal documents. You have access to specialized document processing tools for extracting data, generating summaries, and finding key quotes. You operate exclusively on documents the user provides - you do not access external information or the internet. Use these tools when users ask for document analysis tasks. Be conversational and helpful. Always explain what tool you're using and why it's helpful for their document analysis.";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Render retrieved chunks, each tagged with its source document
pub fn format_context(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| format!("[Document: {}]\n{}", chunk.filename(), chunk.content))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Prompt grounding the answer in documents uploaded to a class
pub fn class_assistant_prompt(chunks: &[ContextChunk]) -> String {
    format!(
        r#"You are an AI Study Assistant for academic classes. You help students understand course materials by answering questions based on their uploaded documents.

CONTEXT FROM UPLOADED DOCUMENTS:
{}

Use this context to answer the student's questions. If the answer isn't in the provided context, say so clearly. Always cite which document you're referencing when possible. Be helpful and educational."#,
        format_context(chunks)
    )
}

/// Generic assistant prompt, optionally steering the model toward one tool
pub fn personal_assistant_prompt(preferred_tool: Option<&str>) -> String {
    match preferred_tool {
        Some(tool) => format!(
            "{}\n\nIMPORTANT: The user has specifically requested to use the tool: {}. Please prioritize using this tool if it's relevant to their request.",
            PERSONAL_ASSISTANT_PROMPT, tool
        ),
        None => PERSONAL_ASSISTANT_PROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChunkMetadata;

    fn chunk(filename: Option<&str>, content: &str) -> ContextChunk {
        ContextChunk {
            content: content.to_string(),
            metadata: filename.map(|f| ChunkMetadata {
                filename: Some(f.to_string()),
            }),
        }
    }

    #[test]
    fn test_context_tags_each_chunk() {
        let context = format_context(&[
            chunk(Some("lecture1.pdf"), "Mitosis has four phases."),
            chunk(None, "Cells divide."),
        ]);
        assert_eq!(
            context,
            "[Document: lecture1.pdf]\nMitosis has four phases.\n\n---\n\n[Document: Unknown]\nCells divide."
        );
    }

    #[test]
    fn test_class_prompt_embeds_context() {
        let prompt = class_assistant_prompt(&[chunk(Some("notes.md"), "Osmosis moves water.")]);
        assert!(prompt.starts_with("You are an AI Study Assistant"));
        assert!(prompt.contains("[Document: notes.md]\nOsmosis moves water."));
    }

    #[test]
    fn test_preferred_tool_suffix() {
        assert_eq!(personal_assistant_prompt(None), PERSONAL_ASSISTANT_PROMPT);

        let prompt = personal_assistant_prompt(Some("extract_statistics"));
        assert!(prompt.starts_with(PERSONAL_ASSISTANT_PROMPT));
        assert!(prompt.ends_with(
            "IMPORTANT: The user has specifically requested to use the tool: extract_statistics. Please prioritize using this tool if it's relevant to their request."
        ));
    }
}
