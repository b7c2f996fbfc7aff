//! Prompt text for every generation panel.

/// Shared persona for plain-text calls (task assistant, questionnaire)
pub const SYSTEM_INSTRUCTION: &str = r#"Act as an expert insurance agent for Bill Layne Insurance Agency in Elkin, NC. Your tone should be professional, helpful, and clear.
Our agency's key carriers are: Nationwide, Progressive, National General, Alamance, Foremost, Travelers, and NC Grange.
When drafting communications, use our contact info:
Bill Layne Insurance Agency
1283 N Bridge ST, Elkin NC 28621
Phone: 336-835-1993
Email: save@billlayneinsurance.com
Website: BillLayneInsurance.com

Always provide concise, accurate, and actionable information tailored to the user's request. Format complex information in tables or lists for clarity."#;

pub const AGENCY_LOGO_URL: &str = "https://i.imgur.com/O25RJzu.png";
pub const AGENCY_LOGO_DARK_URL: &str = "https://i.imgur.com/qoWnvrv.png";
pub const PRIMARY_COLOR: &str = "#003366";
pub const ACCENT_COLOR: &str = "#FFC300";
pub const FONT_STACK: &str = "'Segoe UI', Inter, Arial, sans-serif";

/// Carrier name and logo URL, in the order they are listed to the model
pub const CARRIER_LOGOS: &[(&str, &str)] = &[
    ("Alamance", "https://i.imgur.com/GZPTa01.png"),
    ("Dairyland", "https://i.imgur.com/Ery1d4W.png"),
    ("Foremost", "https://i.imgur.com/1BneP2S.png"),
    ("Hagerty", "https://i.imgur.com/kS5W3aY.png"),
    ("JSA", "https://i.imgur.com/gKSlO1K.png"),
    ("NC Grange", "https://i.imgur.com/dO2gT8E.png"),
    ("National General", "https://i.imgur.com/V7YqM3P.png"),
    ("Nationwide", "https://i.imgur.com/K3337EV.png"),
    ("Progressive", "https://i.imgur.com/pYf1LcF.png"),
    ("Travelers", "https://i.imgur.com/B9421yZ.png"),
    ("NCJUA", "https://i.imgur.com/9C3VwYp.png"),
];

/// A built-in task template. The body is a guide with bracketed placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PromptTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

pub const PROMPT_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        key: "quote",
        title: "Generate Quote Comparison",
        body: "I need to create a comprehensive insurance quote comparison for a customer. Please help me analyze and present the following options:\n\nCustomer Details:\n[Enter customer name, age, location]\n\nCoverage Needed:\n[Auto/Home/Life/etc.]\n\nCarriers to Compare:\n- Nationwide\n- Progressive\n- [Other carriers]\n\nPlease provide a clear comparison table with coverage limits, deductibles, and annual premiums. Include pros/cons for each option and a recommendation based on the customer's needs.",
    },
    PromptTemplate {
        key: "coverage",
        title: "Explain Coverage",
        body: "Please explain the following insurance coverage in simple, customer-friendly terms:\n\nCoverage Type: [Enter coverage type - e.g., Comprehensive, Collision, Liability, Umbrella]\n\nCustomer Situation: [Brief description of customer's needs/concerns]\n\nInclude:\n1. What this coverage protects\n2. Common scenarios when it's used\n3. What's NOT covered\n4. Typical cost factors\n5. NC-specific requirements or considerations\n\nKeep the explanation clear for someone without insurance knowledge.",
    },
    PromptTemplate {
        key: "claim",
        title: "Draft Claim Letter",
        body: "Help me draft a professional claim letter/email:\n\nClaim Type: [Auto accident/Property damage/etc.]\n\nCarrier: [Insurance company name]\n\nSituation:\n[Describe the incident, date, parties involved]\n\nDesired Outcome:\n[What resolution we're seeking]\n\nTone: Professional but firm, advocating for our client.\n\nInclude all necessary claim information and documentation references.",
    },
    PromptTemplate {
        key: "email",
        title: "Customer Email",
        body: "Draft a professional email to a customer:\n\nPurpose: [Renewal reminder/Policy change/Follow-up/etc.]\n\nCustomer: [Name and brief context]\n\nKey Points to Cover:\n[List main points]\n\nDesired Action:\n[What we want the customer to do]\n\nTone: Friendly, professional, and helpful. Sign off as our agency.",
    },
    PromptTemplate {
        key: "nc-law",
        title: "NC Insurance Law Research",
        body: "Research North Carolina insurance law/regulation regarding:\n\nTopic: [Specific law, requirement, or regulation question]\n\nContext: [Why this information is needed]\n\nPlease provide:\n1. Current NC law/regulation\n2. Key requirements for insurance agents\n3. How this compares to neighboring states\n4. Recent changes or pending legislation\n5. Practical implications for our customers.\n\nCite sources when possible.",
    },
    PromptTemplate {
        key: "renewal",
        title: "Renewal Notice",
        body: "Create a renewal notice/reminder for:\n\nCustomer: [Name]\nPolicy Type: [Auto/Home/etc.]\nCurrent Carrier: [Carrier name]\nRenewal Date: [Date]\n\nInclude:\n1. Friendly renewal reminder\n2. Current coverage summary\n3. Any rate changes and explanation\n4. Opportunity to review/update coverage\n5. Call to action to contact office.",
    },
    PromptTemplate {
        key: "receipt",
        title: "Create Payment Receipt",
        body: "I need to create a professional payment receipt for a client.\n\nCustomer Name: [Enter customer name]\nPayment Amount: [Enter amount]\nPayment Date: [Enter date]\nPolicy Number(s): [Enter policy number(s)]\nPayment Method: [e.g., Check, Credit Card, EFT]\n\nPlease generate a clean, professional receipt acknowledging this payment. Include our agency branding and contact information. Thank the customer for their payment.",
    },
    PromptTemplate {
        key: "late-notice",
        title: "Draft Late Payment Notice",
        body: "I need to draft a professional but friendly late payment notice.\n\nCustomer Name: [Enter customer name]\nPolicy Number(s): [Enter policy number(s)]\nAmount Due: [Enter amount]\nOriginal Due Date: [Enter date]\n\nPlease create a reminder email. The tone should be helpful, not threatening. Remind them of the importance of keeping their coverage active and provide clear instructions on how to make a payment (e.g., call our office, pay online). Include a grace period if applicable.",
    },
    PromptTemplate {
        key: "proof-of-insurance",
        title: "Generate Proof of Insurance",
        body: "I need to generate a proof of insurance document for a client. The AI should determine if it's for home, auto, or another policy based on the details provided.\n\nCustomer Name: [Enter customer name]\nPolicy Number: [Enter policy number]\nPolicy Type & Details: [e.g., '2023 Honda CRV, VIN...', or 'Homeowners policy for 123 Main St', or 'General Liability for ABC Company']\nPolicy Period: [e.g., 01/01/2024 to 01/01/2025]\nInterested Party / Lienholder (if any): [Enter name and address]\n\nPlease create a standard proof of insurance document. Include all necessary details: our agency information, the carrier, the insured's information, the policy details, and effective dates.",
    },
];

/// Look up a built-in template by key
pub fn find_template(key: &str) -> Option<&'static PromptTemplate> {
    PROMPT_TEMPLATES.iter().find(|t| t.key == key)
}

/// Wrap user data in a template's instructional scaffold
pub fn wrap_in_template(template: &PromptTemplate, data: &str) -> String {
    format!(
        r#"Please perform the following task: "{}"

Here is a general template/guide for the task:
---
{}
---

Use the following data provided by me to populate the template and generate the final document. You need to extract the necessary information from this data block:
---
{}
---"#,
        template.title, template.body, data
    )
}

fn carrier_logo_lines() -> String {
    CARRIER_LOGOS
        .iter()
        .map(|(name, url)| format!("    *   **{}:** `{}`", name, url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output contract shared by every HTML-document panel
fn document_output_contract(subject_hint: &str) -> String {
    format!(
        r#"**Output:** You MUST return a single JSON object with two keys:
1. "subject": {}
2. "htmlBody": The full, self-contained HTML code for the email body."#,
        subject_hint
    )
}

/// Gmail/mobile layout, branding, carrier logos and print rules
fn email_html_requirements() -> String {
    format!(
        r#"**HTML Requirements (CRITICAL):**

1.  **Gmail & Mobile First:**
    *   Use a table-based layout (`<table>`, `<tr>`, `<td>`) for maximum compatibility.
    *   All CSS MUST be inlined (`style="..."`).
    *   Ensure the design is responsive and looks great on mobile devices, with a main content wrapper of `max-width: 600px;`.

2.  **Branding & Style:**
    *   **Agency:** Bill Layne Insurance Agency Inc.
    *   **Agency Logo:** Use this URL: `{logo}` (This is our agency's logo, not a carrier logo).
    *   **Primary Color (Deep Blue):** `{primary}`
    *   **Accent Color (Golden Yellow):** `{accent}`
    *   **Font:** Use a web-safe font stack like `{font}`.
    *   **Visuals:** Use emojis strategically (e.g., 🏡, 🛡️, ⭐, 📋).

3.  **Carrier Logos (Use these Imgur URLs when referencing a specific carrier):**
{logos}

4.  **Print Optimization:**
    *   Include a `<style type="text/css" media="print">` block with rules like `@page {{ margin: 1in; }}` and `.no-break {{ page-break-inside: avoid; }}`.
    *   Apply the `no-break` class to important elements like coverage sections.

5.  **Content Structure (Adapt based on the request):**
    *   **Hero Section:** Highlight the most important information.
    *   **Detailed Sections:** Clearly labeled sections for coverages, comparisons, etc.
    *   **Call to Action (CTA):** A clear "Next Steps" section if applicable.
    *   **Footer:** Agency contact information (1283 N Bridge ST, Elkin NC 28621, 336-835-1993, save@billlayneinsurance.com) and a disclaimer."#,
        logo = AGENCY_LOGO_URL,
        primary = PRIMARY_COLOR,
        accent = ACCENT_COLOR,
        font = FONT_STACK,
        logos = carrier_logo_lines(),
    )
}

/// Appended when a PDF travels with the request
pub const ATTACHMENT_INSTRUCTION: &str = "\n\n**Attached Document:** An insurance document (PDF) is attached. You MUST use the information from this document as the primary source to fulfill the user's request. Extract all relevant details (client name, policy numbers, dates, costs, coverage details, etc.) directly from it. If the user has also provided text input, use that text as additional context or instructions for how to handle the PDF data.";

/// Document styler: free text (possibly template-wrapped) to branded HTML email
pub fn build_document_prompt(user_request: &str, has_attachment: bool) -> String {
    let mut prompt = format!(
        r#"You are an expert insurance marketing designer and communications specialist for Bill Layne Insurance Agency. Your task is to take the user's request below and generate a beautifully designed, mobile-optimized, and Gmail-compatible HTML email. You will also generate a compelling subject line.

**User's Request:**
---
{}
---

**Your Goal:** Fulfill the user's request and present the information as an engaging, professional email that is easy for a client to read and understand.

{}

{}

Now, fulfill the user's request and generate the JSON output."#,
        user_request,
        document_output_contract("A compelling and relevant email subject line based on the user's request."),
        email_html_requirements(),
    );

    if has_attachment {
        prompt.push_str(ATTACHMENT_INSTRUCTION);
    }
    prompt
}

/// PDF parser: restyle one PDF, or compare two
pub fn build_pdf_prompt(comparison: bool, instructions: &str) -> String {
    let lead = if comparison {
        r#"You are an expert insurance analyst and marketing designer for Bill Layne Insurance Agency. Your task is to analyze and compare the two attached PDF documents (e.g., quotes, renewals) and present your findings in a beautifully designed, mobile-optimized, and Gmail-compatible HTML email. You will also generate a compelling subject line.

**Your Goal:** Create a clear, side-by-side comparison that helps a client easily understand the differences, pros, and cons of their options.

**Analysis Steps:**
1.  Extract key information from BOTH documents: Carrier, policy type, client name, total premium (annual/monthly), effective dates.
2.  Identify and list all coverages and their limits/deductibles from each document.
3.  Directly compare the key metrics in a structured table format.
4.  Write a summary highlighting the most significant differences (e.g., "Option 2 offers higher liability coverage for a slightly lower premium.").
5.  Conclude with a professional recommendation or a clear call to action for the client to discuss the options."#
    } else {
        r#"You are an expert insurance marketing designer and document processor for Bill Layne Insurance Agency. Your task is to transform the attached PDF document into a beautifully designed, mobile-optimized, and Gmail-compatible HTML email. You will also generate a compelling subject line.

**Your Goal:** Create an engaging, professional email that is easy for a client to read and understand."#
    };

    let mut prompt = lead.to_string();

    let instructions = instructions.trim();
    if !instructions.is_empty() {
        prompt.push_str(&format!(
            r#"

**User's Instructions:**
---
{}
---
You MUST prioritize and follow these instructions when processing the document(s). For example, if the user asks to combine two quotes, you must create a single, unified document reflecting that combination."#,
            instructions
        ));
    }

    prompt.push_str("\n\n");
    prompt.push_str(&document_output_contract(
        "A compelling and relevant email subject line.",
    ));
    prompt.push_str("\n\n");
    prompt.push_str(&email_html_requirements());
    if comparison {
        prompt.push_str("\n\nFor comparisons, use a two-column table.");
    }
    prompt.push_str("\n\nNow, analyze the attached PDF(s) and generate the JSON output.");
    prompt
}

/// Quote assistant: raw notes to a print-ready internal proposal
pub fn build_quote_proposal_prompt(notes: &str) -> String {
    format!(
        r#"You are an expert insurance quoting specialist and sales analyst for Bill Layne Insurance Agency. Your primary goal is to take unstructured, free-form client notes and transform them into a comprehensive, persuasive quote proposal. This proposal will be used internally by our agents to finalize the quote and MUST be formatted for printing on standard letterhead paper.

**User's Raw Notes:**
---
{notes}
---

**Your Task:**
1.  **Parse & Organize:** Meticulously read the user's raw notes and extract all key information (e.g., client name(s), DOB, address, contact info, vehicle details, driver information, current coverages, etc.). Organize this extracted data into a clean, easy-to-read summary at the top of the proposal.
2.  **Identify Upsell Opportunities & Coverage Gaps:** This is the most critical step. You MUST identify at least two potential upsells or recommendations. Common examples include:
    *   Liability limits are below our agency standard of 100/300/100.
    *   Missing Rental Reimbursement or Towing coverage.
    *   No or low Uninsured/Underinsured Motorist (UM/UIM) coverage.
    *   High deductibles that could be risky for the client.
    *   No mention of an umbrella policy, which could be a great value.
    *   Missing special endorsements (e.g., custom equipment coverage).
3.  **Create Actionable Recommendations:** For each identified gap or upsell opportunity, create a section titled "Recommended Coverage Enhancements". Clearly explain the *benefit* of each recommendation in simple, client-friendly terms.
4.  **Generate a Styled HTML Proposal:** Format the entire output as a single, beautifully designed, mobile-optimized, and Gmail-compatible HTML email.

**Output:** You MUST return a single JSON object with two keys:
1. "subject": A clear and concise subject line for the proposal (e.g., "Quote Proposal for John Doe - Auto").
2. "htmlBody": The full, self-contained HTML code for the proposal.

**HTML Requirements (CRITICAL):**

*   **Structure:**
    *   **Header:** IMPORTANT! Do NOT include a header with the agency logo or name. This document will be printed on company letterhead. Start the content directly with a clear title like "Internal Quote Proposal".
    *   **Client Summary:** A section with the organized client data you extracted.
    *   **Recommended Enhancements:** The section with your upsell analysis and explanations.
    *   **Next Steps:** A brief note for the agent (e.g., "Proceed with quoting these carriers...").
    *   **Footer:** Agency branding and contact information. This is acceptable at the bottom of the last page.
*   **Print Optimization:**
    *   Include this exact style block inside the HTML's `<head>`: `<style type="text/css" media="print"> @page {{ size: letter; margin: 1in; }} body {{ -webkit-print-color-adjust: exact; color-adjust: exact; }} .no-break {{ page-break-inside: avoid !important; }} </style>`.
    *   Wrap each major section in a container with `class="no-break"` to prevent it from being split across pages during printing.
*   **Gmail & Mobile First:** While this is for print, it should still be based on a table-layout and inline CSS for robustness.
*   **Agency Logo:** Do NOT use the agency logo.
*   **Primary Color (Deep Blue):** `{primary}`
*   **Accent Color (Golden Yellow):** `{accent}`
*   **Carrier Logos (Use these Imgur URLs when referencing a specific carrier):**
{logos}

Now, analyze the user's notes and generate the JSON output."#,
        notes = notes,
        primary = PRIMARY_COLOR,
        accent = ACCENT_COLOR,
        logos = carrier_logo_lines(),
    )
}

const NEEDS_ANALYSIS_GUIDE: &str = r#"For Auto insurance, ask about all drivers (name, DOB, license #), all vehicles (year, make, model, VIN), driving history (accidents, violations in past 5 years), and current insurance carrier if any.
For Home insurance, ask about the property address, year built, construction type (brick, frame), square footage, roof age, security systems, any pets (breed), and any valuable personal property.
For Life insurance, ask about the client's date of birth, gender, height, weight, health status (including smoking history), occupation, income, and any dependents.
For Commercial insurance, ask about the business name, address, type of business, number of employees, annual revenue, and any specific risks associated with the business operations."#;

fn needs_analysis_lead(types: &[&str], notes: &str) -> String {
    let notes = notes.trim();
    format!(
        r#"You are an expert insurance agent at Bill Layne Insurance Agency. Your task is to generate a friendly and comprehensive questionnaire for a potential new client to gather the necessary information for an insurance quote.

The client is interested in the following types of insurance: {}.

Here are some initial notes about the client:
{}

Please create a questionnaire that is easy for a client to understand and fill out. Group questions by insurance type. For each type, ask for all the critical information needed to provide an accurate quote.

{}

Start with a friendly introduction ("Hello! To help us find the best insurance coverage for your needs...") and end with a concluding remark ("Thank you for providing this information! We'll be in touch shortly with your personalized quotes.")."#,
        types.join(", "),
        if notes.is_empty() {
            "No initial notes provided."
        } else {
            notes
        },
        NEEDS_ANALYSIS_GUIDE,
    )
}

/// Needs analysis, streamed as plain text
pub fn build_questionnaire_prompt(types: &[&str], notes: &str) -> String {
    let mut prompt = needs_analysis_lead(types, notes);
    prompt.push_str(" Format the output clearly with headings and lists.");
    prompt
}

/// Needs analysis, returned as a branded HTML email the client can fill in
pub fn build_needs_analysis_prompt(types: &[&str], notes: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\nNow, generate the questionnaire as JSON output.",
        needs_analysis_lead(types, notes),
        document_output_contract(
            "A friendly subject line inviting the client to complete the questionnaire."
        ),
        email_html_requirements(),
    )
}

/// Property report: web-grounded research returned as raw JSON
pub fn build_property_report_prompt(address: &str) -> String {
    format!(
        r#"You are an expert real estate data analyst for Bill Layne Insurance Agency. Your goal is to use a web search to gather comprehensive property details for the address provided by the user, and then format this information into a professional, beautifully designed, mobile-optimized, and Gmail-compatible HTML email.

**Address to Research:**
---
{address}
---

**Your Task:**
1.  **Search & Extract:** Conduct a thorough web search for the property. Extract the following key details. If a detail cannot be found, explicitly state "Not Found" in the report.
    *   **Property Overview:** Full Address, County, Property Type (e.g., Single-Family).
    *   **Key Facts:** Year Built, Living Area (Sq. Ft.), Lot Size, Bedrooms, Bathrooms, Number of Stories.
    *   **Construction Details:** Foundation, Exterior Walls, Roof Material & Type, Garage description.
    *   **Features & Systems:** Heating/Cooling systems, Fireplace(s).
    *   **Valuation:** Estimated Value, Last Sale Date & Price.
    *   **Location Risk Factors:** Note any available information on flood zones or proximity to a fire station/hydrant.
2.  **Generate a Styled HTML Email:** Format the entire output as a single, beautifully designed HTML document.

**Output:** Your response MUST be a single, raw JSON object (no markdown, no surrounding text) with two keys:
1. "subject": A clear and concise subject line for the email (e.g., "Property Report for 123 Main St, Elkin NC").
2. "htmlBody": The full, self-contained HTML code for the email body.

**HTML Requirements (CRITICAL):**

1.  **Gmail & Mobile First:**
    *   Use a table-based layout (`<table>`, `<tr>`, `<td>`) for maximum compatibility.
    *   All CSS MUST be inlined (`style="..."`).
    *   Ensure the design is responsive and looks great on mobile devices, with a main content wrapper of `max-width: 600px;`.

2.  **Branding & Style:**
    *   **Agency:** Bill Layne Insurance Agency
    *   **Agency Logos:**
        *   **For light backgrounds:** `{logo}`
        *   **For dark backgrounds:** `{logo_dark}` (white text version)
    *   **Primary Color (Deep Blue):** `{primary}`
    *   **Accent Color (Golden Yellow):** `{accent}`
    *   **Font:** Use a web-safe font stack like `{font}`.
    *   **Visuals:** Use emojis strategically (e.g., 🏡, 🏗️, 💰).

3.  **Content Structure:**
    *   **Header:** Agency logo centered at the top. Use the appropriate logo based on the header's background color.
    *   **Title:** A clear, bold title like "Homeowner's Insurance Property Report".
    *   **Clear Sections:** Use styled headings to organize the data (e.g., "Property Overview", "Construction Details"). Use tables for structured data.
    *   **Footer:** A branded footer with this exact agency contact information: Bill Layne Insurance Agency, 1283 N Bridge ST, Elkin NC 28621, Phone: 336-835-1993, Email: save@billlayneinsurance.com, Website: BillLayneInsurance.com.

4.  **Print Optimization:**
    *   Include a `<style type="text/css" media="print">` block with rules like `@page {{ margin: 1in; }}` and `.no-break {{ page-break-inside: avoid; }}`.
    *   Apply the `no-break` class to important elements like data tables."#,
        address = address,
        logo = AGENCY_LOGO_URL,
        logo_dark = AGENCY_LOGO_DARK_URL,
        primary = PRIMARY_COLOR,
        accent = ACCENT_COLOR,
        font = FONT_STACK,
    )
}

/// Task extraction: free text and/or PDF to one structured task
pub fn build_task_extraction_prompt(text: &str, has_attachment: bool, today: &str) -> String {
    format!(
        r#"You are an intelligent task parser for an insurance agent's to-do list. Your job is to analyze the user's text and/or a provided PDF document and convert it into a structured task object.

Today's date is: {today}.

**Source Data:**
- User's text input (may contain instructions or the full task): "{text}"
- A PDF document is {pdf}

**Your Task:**
Extract the following details. If a piece of information is not found, return null for that field or an appropriate default.

1.  **text:** The main, concise title for the task (e.g., "Follow up with John Doe on auto renewal").
2.  **description:** A more detailed description if available.
3.  **dueDate:** The absolute due date in YYYY-MM-DD format.
4.  **priority:** 'high', 'medium', or 'low'. Default to 'medium'.
5.  **customerName:** The full name of the client.
6.  **phone:** Client's phone number.
7.  **email:** Client's email address.
8.  **customerValue:** The premium amount, as a number.
9.  **taskType:** A category like 'Policy Change', 'New Quote', 'Follow-up', 'Claim'.
10. **followUpDate:** A separate follow-up date in YYYY-MM-DD format.
11. **carrier:** The insurance carrier's name.
12. **policyNumber:** The policy number.
13. **internalNotes:** Any notes for internal use.
14. **isRecurring:** A boolean (true/false) if the task seems to be recurring.

Return a single JSON object with the keys corresponding to the fields above."#,
        today = today,
        text = text.trim(),
        pdf = if has_attachment {
            "also provided. Prioritize information from the PDF."
        } else {
            "not provided."
        },
    )
}

/// Task assistant: act on one task's full context
pub fn build_task_assistant_prompt(task_context: &str, action: &str) -> String {
    format!(
        r#"You are an expert insurance agent assistant for Bill Layne Insurance Agency.
Your goal is to help the agent complete their tasks efficiently.

Here is the full context for a specific task:
---
{}
---

Now, please perform the following action:
---
{}
---

Keep your response concise, professional, and directly useful. If drafting an email, sign off with our agency details."#,
        task_context.trim(),
        action.trim()
    )
}
