//! System prompt for quiz generation.

/// Instruction sent as the system message with every generation request.
/// The user message is the crawled website content.
pub const SYSTEM_PROMPT: &str = "Please refer the attached file. It is a summary of a website.\n\
Using the attached file, identify the website's target customer.\n\n\
If the target customer is a business (B2B), create a quiz/assessment for them.\n\n\
If the target customer is a consumer (B2C), create a quiz/assessment for potential partners.\n\n\
The quiz should help the audience understand the problem solved by the website and its offerings. \
Keep it simple (10-15 questions), but extend if needed. Finally, calculate a score and provide \
a personalized message based on the score range.";
