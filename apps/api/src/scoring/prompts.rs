pub const MATCH_SCORE_SYSTEM: &str = "You are an experienced technical recruiter. \
    You rate how well a candidate profile fits a job. \
    You MUST respond with valid JSON only, no markdown, no commentary.";

/// Placeholders: {job_json}, {candidate_json}
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"Rate the candidate below against the job.

JOB:
{job_json}

CANDIDATE PROFILE:
{candidate_json}

Consider seniority fit, overlap with the key skills, relevance of recent titles and
companies, and education where it matters for the role.

Respond with exactly this JSON shape:
{"score": <integer 0-100>, "reasoning": "<one or two sentences>"}"#;
