// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for job extraction. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const JOB_EXTRACT_SYSTEM: &str = "You are an expert job description analyst. \
    Extract job posting details from scraped text.";

/// Job extraction prompt template. Replace `{page_data}` before sending.
pub const JOB_EXTRACT_PROMPT_TEMPLATE: &str = r#"### SCRAPED TEXT (JOB DESCRIPTION):
{page_data}

### INSTRUCTION:
The scraped text is a job description.
Your job is to extract the job posting details and return them in JSON format containing the following keys: `title`, `company`, `role`, `experience`, `skills` and `description`.
Ensure the JSON is valid and contains ALL provided keys. If a key is not explicitly mentioned, use "N/A".
If the text describes several openings, return a JSON array with one object per opening.

### VALID JSON (NO PREAMBLE):"#;

/// System prompt for email drafting.
pub const EMAIL_DRAFT_SYSTEM: &str = "You are a skilled job applicant writing a cold application \
    email to a hiring manager. You write in the first person, as the candidate whose resume you \
    are given.";

/// Email drafting prompt template.
/// Replace: {resume_data}, {job_details}, {no_preamble}
pub const EMAIL_DRAFT_PROMPT_TEMPLATE: &str = r#"### CANDIDATE RESUME:
{resume_data}

### TARGET JOB DETAILS (Extracted from JD):
{job_details}

### INSTRUCTION:
You are the candidate described in the resume above, applying for the job detailed above. Write a highly tailored, professional application email to the hiring manager.

Use the following rules:
1. The email must be written from the perspective of the candidate, in the first person.
2. The email must be concise (max 4-5 short paragraphs).
3. Critically analyze the 'TARGET JOB DETAILS' and directly correlate the candidate's skills, projects, and work experience from the 'CANDIDATE RESUME' to the job requirements. Mention specific projects or achievements where possible.
4. Start with the subject line at the very top, on its own line, in the form 'Subject: <subject>'.
5. End with a professional closing and the candidate's full contact block (Email, Phone, LinkedIn/GitHub/Portfolio links if available in the resume).
6. {no_preamble}

### COLD EMAIL DRAFT:"#;
