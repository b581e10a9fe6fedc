//! Prompt assembly with a character budget.
//!
//! [`PromptAssembler`] formats retrieved context into numbered blocks,
//! keeps their combined size under a character budget, and appends the
//! grounding instructions and the user's question.

/// Instructions appended after the context blocks.
const INSTRUCTIONS: &str = "Answer the question using ONLY the context above. \
If the answer is not in the context, say \"I don't know.\" \
Keep the answer under 3 sentences.";

/// A fully assembled prompt plus how much context made it in.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    /// The complete prompt text to send to the completion model.
    pub prompt: String,
    /// Number of context blocks included, counted from the front of the
    /// candidate list. Candidates past the first overflow are dropped.
    pub included: usize,
}

/// Assembles prompts from ranked context passages under a character budget.
///
/// Each passage becomes a block of the form `[context {i}] {text}\n` with
/// 1-based numbering. Blocks are taken in order until adding one would push
/// the running character total past the budget; assembly stops at the first
/// block that does not fit, even if a later, shorter block would. This keeps
/// included context a prefix of the ranked candidates, so relevance order is
/// never reshuffled by size.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    char_budget: usize,
}

impl PromptAssembler {
    /// Create an assembler with the given context budget, in characters.
    ///
    /// The budget bounds the formatted context blocks only; instructions
    /// and the question are always appended in full.
    pub fn new(char_budget: usize) -> Self {
        Self { char_budget }
    }

    /// Assemble a prompt for `query` from ranked context passages.
    ///
    /// With no candidates (or a budget too small for the first block) the
    /// prompt still carries the instructions and question, and the model is
    /// expected to answer that it does not know.
    pub fn assemble(&self, query: &str, contexts: &[&str]) -> AssembledPrompt {
        let mut blocks = String::new();
        let mut used = 0;
        let mut included = 0;

        for (i, text) in contexts.iter().enumerate() {
            let block = format!("[context {}] {}\n", i + 1, text);
            let block_chars = block.chars().count();
            if used + block_chars > self.char_budget {
                break;
            }
            blocks.push_str(&block);
            used += block_chars;
            included += 1;
        }

        let prompt = format!("{blocks}{INSTRUCTIONS}\n\nQuestion: {query}\nAnswer:");
        AssembledPrompt { prompt, included }
    }
}
