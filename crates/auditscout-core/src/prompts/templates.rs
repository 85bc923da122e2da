//! Domain-context variants for the emerging-risk prompt.
//!
//! Each variant is pure data: a role line, a domain-context block, and the two task
//! blocks (short-term events vs. longer-horizon trends). The builder owns the shared
//! output contract, so every variant produces the same Markdown structure.

/// One selectable prompt variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Variant key used in configuration (`prompt_variant`).
    pub name: &'static str,
    /// Role framing and target audience.
    pub role: &'static str,
    /// Organisation or focus-area context.
    pub domain_context: &'static str,
    /// Task block for Day / Week windows.
    pub short_term_task: &'static str,
    /// Task block for Month / Quarter / Year windows.
    pub trend_task: &'static str,
    /// Optional organisation-specific relevance section in the output structure.
    pub relevance_heading: Option<&'static str>,
    pub relevance_hint: &'static str,
}

impl PromptTemplate {
    /// Look a variant up by its configuration key.
    pub fn by_name(name: &str) -> Option<&'static PromptTemplate> {
        let key = name.trim();
        TEMPLATES
            .iter()
            .copied()
            .find(|t| t.name.eq_ignore_ascii_case(key))
    }
}

/// General corporate audit variant (dashboard default).
pub const GENERAL: PromptTemplate = PromptTemplate {
    name: "general",
    role: "You are a senior risk analyst for a corporate audit team.\n\
Target Audience: Internal Audit Planning Committee.",
    domain_context: "Focus Areas:\n\
- Regulatory changes (Global and Major Markets)\n\
- Cybersecurity and Technology (AI, Data Privacy)\n\
- Economic and Financial Stability\n\
- Operational and Supply Chain Disruptions",
    short_term_task: "TASK: Search for specific, recent EVENTS that occurred strictly within this date range that are relevant to internal audit planning.\n\n\
LOOK FOR:\n\
- Regulatory enforcement actions and newly effective rules.\n\
- Cybersecurity incidents, data breaches, and third-party failures.\n\
- Sudden market, credit, or liquidity shocks.\n\
- Supply chain disruptions with named companies or regions.\n\n\
STYLE: News-brief style. Factual and immediate.",
    trend_task: "TASK: Analyze broad TRENDS and systemic shifts over this period that should shape the audit plan.\n\n\
LOOK FOR:\n\
- Regulatory Horizon: proposed rules, supervisory priorities, and enforcement themes.\n\
- Technology: AI governance, data privacy regimes, and operational resilience expectations.\n\
- Macro Risks: interest rates, credit cycle, inflation, and geopolitical exposure.\n\
- Operational Trends: concentration risk in vendors and critical suppliers.\n\n\
STYLE: Strategic analysis. Thematic and forward-looking.",
    relevance_heading: None,
    relevance_hint: "",
};

/// Mutual life insurer and wealth manager variant (headless default).
pub const NORTHWESTERN_MUTUAL: PromptTemplate = PromptTemplate {
    name: "northwestern_mutual",
    role: "You are a Chief Audit Executive's AI assistant for **Northwestern Mutual**.\n\
Target Audience: Internal Audit Planning Committee & Risk Committee.",
    domain_context: "Company Context:\n\
- Structure: Major US Mutual Life Insurer & Wealth Management firm.\n\
- Distribution: Exclusive \"Career Agency\" system (Financial Representatives).\n\
- Products: Whole Life, Term, Disability Income (DI), Long-Term Care (LTC), Annuities, Advisory Services (NMIS).\n\
- Key Competitors: MassMutual, New York Life, Guardian, Prudential.\n\n\
Strategic Focus Areas:\n\
- Client Experience & Digital Transformation.\n\
- Integrated Financial Planning (Insurance + Investments).\n\
- Solvency & General Account Investment Performance.",
    short_term_task: "TASK: Search for specific, recent EVENTS that occurred strictly within this date range affecting Northwestern Mutual, its mutual peers, or the Financial Services sector.\n\n\
LOOK FOR:\n\
- Regulatory enforcement actions (SEC, FINRA, NYDFS) related to \"off-channel communications\", \"best interest\" (Reg BI), or sales practices.\n\
- Cybersecurity incidents involving insurers, third-party administrators (TPAs), or wealth platforms.\n\
- Specific negative news or lawsuits involving Northwestern Mutual or similar carrier/agency models.\n\
- Sudden market shifts affecting bond yields or commercial real estate (relevant to General Account).\n\n\
STYLE: News-brief style. Factual and immediate.",
    trend_task: "TASK: Analyze broad TRENDS and systemic shifts over this period relevant to Northwestern Mutual.\n\n\
LOOK FOR:\n\
- Regulatory Horizon: Department of Labor (DOL) Fiduciary Rule developments, NAIC AI/Model Governance bulletins, Tax law changes affecting estate planning.\n\
- Industry Trends: Shifts in \"Career Agency\" distribution models, direct-to-consumer competition, underwriting innovations (electronic health records).\n\
- Macro Risks: Commercial Mortgage Loan (CML) portfolio stress, credit cycle downturns, inflation impact on claims/expenses.\n\
- Emerging Tech: AI risks in financial advice, deepfakes impacting fraud verification.\n\n\
STYLE: Strategic analysis. Thematic and forward-looking.",
    relevance_heading: Some("Relevance to Northwestern Mutual"),
    relevance_hint: "[Why this matters: e.g., \"Impacts field force compliance,\" \"Affects whole life dividend performance,\" \"NMIS regulatory exposure\"]",
};

/// Every known variant.
pub const TEMPLATES: &[&PromptTemplate] = &[&GENERAL, &NORTHWESTERN_MUTUAL];
