//! System prompt construction for the chat flow.

use zenith_retrieval::ScoredDocument;

/// Build the Zenith system prompt with the retrieved documents inlined as
/// context. The model is constrained to the inventory/order domain; anything
/// the context does not cover must be declined rather than guessed.
pub fn build_system_prompt(context_docs: &[ScoredDocument]) -> String {
    let context_text: Vec<&str> = context_docs
        .iter()
        .map(|d| d.document.content.as_str())
        .collect();

    let mut prompt = String::from(
        "You are Zenith AI, a strictly focused assistant for MSME operations, \
         inventory management, and order tracking.\n\n",
    );

    prompt.push_str(
        "CRITICAL RULES:\n\
         - ONLY answer questions related to the provided context (inventory, products, orders, supplies).\n\
         - If a user asks ANYTHING outside of this domain, you MUST politely decline.\n\
         - Avoid speculative answers. If the data isn't in the context, state it clearly.\n\n",
    );

    prompt.push_str("Context from Database:\n");
    prompt.push_str(&context_text.join("\n"));

    prompt.push_str(
        "\n\nData Handling:\n\
         - Refer to 'Current Level' for stock queries.\n\
         - Refer to 'Status' and 'Priority' for order queries.\n",
    );

    prompt
}
