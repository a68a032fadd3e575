//! Prompt library: decks of prompt cards with a single bracketed placeholder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub input_placeholder: String,
}

impl Prompt {
    fn new(text: &str, placeholder: &str) -> Self {
        Self {
            text: text.to_string(),
            input_placeholder: format!("Enter [{}]", placeholder),
        }
    }

    /// The bracketed token in `text`, including brackets.
    pub fn placeholder(&self) -> Option<&str> {
        let start = self.text.find('[')?;
        let end = start + self.text[start..].find(']')?;
        Some(&self.text[start..=end])
    }

    /// Substitute `input` for the placeholder. Blank input leaves the text as is.
    pub fn render(&self, input: &str) -> String {
        let input = input.trim();
        match self.placeholder() {
            Some(token) if !input.is_empty() => self.text.replace(token, input),
            _ => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSection {
    pub id: String,
    pub title: String,
    pub subheadline: String,
    #[serde(default)]
    pub pill_text: Option<String>,
    pub prompts: Vec<Prompt>,
}

impl PromptSection {
    /// Label shown on each card of this section.
    pub fn pill(&self) -> &str {
        self.pill_text.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDeck {
    pub id: String,
    pub title: String,
    pub instructions: String,
    pub action_label: String,
    pub sections: Vec<PromptSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptLibrary {
    pub decks: Vec<PromptDeck>,
}

impl PromptLibrary {
    pub fn deck(&self, id: &str) -> Option<&PromptDeck> {
        self.decks.iter().find(|d| d.id == id)
    }
}

fn section(
    id: &str,
    title: &str,
    subheadline: &str,
    pill_text: Option<&str>,
    placeholder: &str,
    texts: &[&str],
) -> PromptSection {
    PromptSection {
        id: id.to_string(),
        title: title.to_string(),
        subheadline: subheadline.to_string(),
        pill_text: pill_text.map(str::to_string),
        prompts: texts.iter().map(|t| Prompt::new(t, placeholder)).collect(),
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        let instant_intel = PromptDeck {
            id: "strategic".to_string(),
            title: "Instant Intel".to_string(),
            instructions: "Choose an Intel Card below. Enter your input in the card. \
                           Click Generate to begin your research."
                .to_string(),
            action_label: "Generate".to_string(),
            sections: vec![
                section(
                    "industry",
                    "Industry Intel",
                    "Industry focused research",
                    None,
                    "industry",
                    &[
                        "What revenue-generating trends are most prominent in [industry] right now?",
                        "Where are companies in [industry] currently over-investing?",
                        "What are the key financial challenges facing [industry] companies this year?",
                        "What new technology or innovation is driving revenue in [industry]?",
                        "What are the high-growth customer segments in [industry]?",
                        "What budget cycles are most significant in [industry]?",
                        "Where are [industry] companies focusing on cost-saving measures?",
                        "What recent regulations are impacting revenue strategies in [industry]?",
                        "What competitive pressures are influencing revenue strategies in [industry]?",
                        "Which departments within [industry] are expected to receive budget increases this year?",
                    ],
                ),
                section(
                    "company",
                    "Company Intel",
                    "Company focused research",
                    None,
                    "company",
                    &[
                        "Provide a revenue-focused deep dive on [company]",
                        "What are [company]'s current budget priorities?",
                        "What recent financial initiatives has [company] undertaken, and what is the expected ROI?",
                        "How does [company] position itself against competitors in terms of revenue growth?",
                        "What recent acquisitions or partnerships is [company] pursuing to increase revenue?",
                        "What high-growth products or services is [company] focusing on?",
                        "What are the main financial challenges impacting [company]'s revenue?",
                        "How has [company] adapted its revenue strategy in response to recent market changes?",
                        "What are [company]'s key objectives for the next fiscal year?",
                        "How does [company] allocate budgets across different departments?",
                    ],
                ),
                section(
                    "role",
                    "Role Intel",
                    "Role based research",
                    None,
                    "role",
                    &[
                        "Give a revenue-focused overview of priorities for [role]",
                        "What metrics are most important to [role]?",
                        "What are the top financial concerns keeping [role] up at night?",
                        "What revenue-generating goals does [role] have for this year?",
                        "What achievements or metrics are likely to fast-track a promotion for [role]?",
                        "What budget constraints is [role] typically managing?",
                        "How does [role] prioritize short-term vs. long-term revenue growth?",
                        "What common challenges does [role] face in achieving revenue goals?",
                        "What recent trends are most relevant to [role]?",
                        "What key responsibilities does [role] have in driving profitability?",
                    ],
                ),
            ],
        };

        let sales_coach = PromptDeck {
            id: "coach".to_string(),
            title: "Sales Coach".to_string(),
            instructions: "Choose a Coaching Card below. Enter your input in the card. \
                           This input will launch a customized, real-world sales scenario."
                .to_string(),
            action_label: "Build".to_string(),
            sections: vec![
                section(
                    "objections",
                    "Overcoming Objections Coaching",
                    "Practice responding to common buyer objections around budget, ROI, time, and complexity",
                    Some("Overcoming Objections"),
                    "topic",
                    &[
                        "The buyer is concerned about budget constraints for [topic]",
                        "The buyer has concerns about the ROI of [topic]",
                        "The buyer doesn't have time to implement [topic]",
                        "The buyer thinks [topic] is too complex to implement",
                    ],
                ),
                section(
                    "urgency",
                    "Urgency & Value Coaching",
                    "Practice creating urgency and emphasizing the value, without being pushy",
                    Some("Urgency & Value"),
                    "topic",
                    &[
                        "The buyer doesn't see an urgent need for [topic]",
                        "The buyer is only focused on short-term gains and doesn't see the long-term value of [topic]",
                        "The buyer wants to understand the specific financial benefits of [topic]",
                    ],
                ),
                section(
                    "roleSpecific",
                    "Role-Specific Coaching",
                    "Tailor responses to address unique priorities of different buyer roles",
                    Some("Role-Specific"),
                    "topic",
                    &[
                        "The CFO is concerned about controlling costs and needs reassurance on financial impact of [topic]",
                        "The COO is concerned about operational efficiency and workload with [topic]",
                        "The CMO is focused on customer acquisition and wants to see how [topic] will help achieve that",
                        "The Head of HR is concerned about [topic] training and onboarding",
                    ],
                ),
                section(
                    "differentiation",
                    "Differentiation Coaching",
                    "Practice positioning your topic as a superior solution compared to alternatives",
                    Some("Differentiation"),
                    "competitor",
                    &[
                        "The buyer is considering a [competitor] solution instead of yours",
                        "The buyer feels that [competitor]'s pricing is more attractive than yours",
                        "The buyer believes [competitor] has a longer track record than you",
                    ],
                ),
            ],
        };

        Self {
            decks: vec![instant_intel, sales_coach],
        }
    }
}
