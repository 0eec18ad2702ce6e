// Fragments shared by every LLM-backed collaborator.

/// Appended to the system prompt of every JSON call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites resume content.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: NEVER invent experience, employers, technologies, metrics or qualifications \
    the candidate does not already have. Only rephrase, reorder, clarify and emphasize \
    what is present in the resume. Add a number only if the resume already states it.";
