//! Prompt templates for statement analysis.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth**: changing the advice framework (say,
//!    adding a budgeting rule or tweaking the response template) means
//!    editing exactly one file.
//!
//! 2. **Testability**: unit tests can inspect the built prompt directly
//!    without a live model, making template regressions easy to catch.
//!
//! Both parts are fixed artifacts with no branching on content: the template
//! is the only steering mechanism available, so determinism of the
//! instructions is what keeps model output consistent across runs.

use std::fmt::Write as _;

/// System persona for the finance assistant.
pub const SYSTEM_PROMPT: &str = "\
You are a personal finance assistant that analyzes credit card transactions to identify spending \
patterns and provide recommendations for reducing unnecessary expenses, maximizing rewards, and \
budgeting effectively. You rely on budgeting principles, like the 50/30/20 rule (50% needs, 30% \
wants, 20% savings), zero-based budgeting, and predictive analytics, to help users manage their \
finances better.
Your responses should be:
- Clear, concise, and user-friendly.
- Non-judgmental and focused on financial well-being.
- Actionable, with personalized insights based on the user's spending habits.";

/// Ordered analysis procedure embedded in every user prompt.
const ANALYSIS_STEPS: &str = "\
**Analysis Steps:**
1. Categorize each transaction into needs or wants.
2. Sum up spending in each category and calculate the percentage of income allocated to each.
3. Calculate total expenses as the sum of needs and wants.
4. Calculate savings as the difference between income and total expenses.
5. Identify any unnecessary or excessive purchases that deviate from usual spending patterns.
6. Apply zero-based budgeting to optimize fund allocation and ensure every dollar is assigned purposefully.
7. Use predictive analytics to anticipate future expenses and potential financial risks.";

/// Fixed markdown template the model is asked to fill in.
const RESPONSE_FORMAT: &str = "\
**Response Format:**
## Financial Analysis & Recommendations
#### **Spending Breakdown (50/30/20 Rule):**
- **Needs**: $X (Y% of income) ✅/❌ (compared to 50%)
- **Wants**: $X (Y% of income) ✅/❌ (compared to 30%)
- **Total Expenses**: $X (Y% of income)
- **Savings (Income - Total Expenses)**: $X (Y% of income) ✅/❌ (compared to 20%)

#### **Identified Spending Issues:**
- [List flagged spending issues, if any (don't force) such as exceeding budget limits, frequent impulse purchases, high-cost recurring expenses, etc.]

#### **Actionable Recommendations:**
- [List personalized recommendations to optimize spending, cut unnecessary costs, maximize savings, and improve financial stability.]";

/// Build the user instruction embedding the income and the full extracted
/// statement text.
///
/// The statement text goes inside a `<transactions>` delimited block so the
/// model can tell the data apart from the instructions. The income value and
/// the text are embedded verbatim; everything around them is constant.
pub fn build_user_prompt(monthly_income: u32, statement_text: &str) -> String {
    let mut prompt = String::with_capacity(
        statement_text.len() + ANALYSIS_STEPS.len() + RESPONSE_FORMAT.len() + 512,
    );

    let _ = write!(
        prompt,
        "Please analyze the following financial data and provide recommendations.

### **Financial Data:**
- **Monthly Income**: ${monthly_income}
- **Transactions**:
<transactions>
{statement_text}
</transactions>

Follow these steps in your analysis:
{ANALYSIS_STEPS}

Respond in the following format:
{RESPONSE_FORMAT}

Ensure your response is **clear, concise, and user-friendly**, focusing on **actionable insights** for better financial management.",
    );

    prompt
}
