//! Canned replies for the job assistant.

const JOB_REPLY: &str = "I can help you find jobs that match your skills and preferences. What type of role are you looking for?";
const RESUME_REPLY: &str = "Great question! A strong profile is key to getting noticed. Make sure to include relevant keywords and highlight your achievements.";
const SALARY_REPLY: &str = "Salary research is important! I recommend checking industry standards for your role and location.";
const INTERVIEW_REPLY: &str = "Interview preparation is crucial! I suggest researching the company and practicing common questions.";
const DEFAULT_REPLY: &str = "I understand you're looking for assistance with your job search. How can I help you today?";

/// Pick the reply for a user message by keyword, first match wins
pub fn reply_for(message: &str) -> &'static str {
  let lower = message.to_lowercase();
  let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

  if mentions(&["job", "position"]) {
    JOB_REPLY
  } else if mentions(&["resume", "profile"]) {
    RESUME_REPLY
  } else if mentions(&["salary", "pay"]) {
    SALARY_REPLY
  } else if mentions(&["interview"]) {
    INTERVIEW_REPLY
  } else {
    DEFAULT_REPLY
  }
}
