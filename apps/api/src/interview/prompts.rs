// Prompt templates for the interview collaborators, and the fixed texts the stage machine replies with.

/// Evaluation prompt template. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert Excel interviewer. Evaluate the following candidate answer.

Question: "{question}"
Answer: "{answer}"

Give a score out of 10, and briefly explain the rating."#;

/// Summary prompt template. Replace `{transcript}` with the rendered Q/A/Eval blocks.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Here is an Excel mock interview session:

{transcript}

Summarize the candidate's performance: strengths, weaknesses, and overall impression."#;

/// Clarification prompt template. Replace `{question}`.
pub const CLARIFICATION_PROMPT_TEMPLATE: &str = r#"You are an Excel interviewer.
A candidate is confused by this question: "{question}"
Give a short clarification or rephrasing -- do not give the full answer."#;

pub const GREETING: &str =
    "Hi! I'm your AI Excel interviewer. Before we begin, let's get to know each other a bit.";

pub const INTERVIEW_TRANSITION: &str = "Thanks for sharing! Let's begin the interview.";

pub const CLARIFICATION_LEAD_IN: &str = "Sure! Here's a hint:";

/// Used when the clarifier is unavailable. Followed by the question itself.
pub const REPHRASE_LEAD_IN: &str = "Let me rephrase the question:";

pub const FILLER_NUDGE: &str =
    "Great! Now could you try answering the question in your own words?";

pub const EVALUATION_FALLBACK: &str = "Unable to evaluate this answer.";

pub const SUMMARY_FALLBACK: &str = "Error generating feedback. Interview completed.";

pub const INTERVIEW_COMPLETED: &str = "Interview completed. Click restart to begin again.";

pub const APOLOGY: &str = "An unexpected error occurred. Please refresh and try again.";
