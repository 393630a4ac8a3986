//! Canned search results

use super::{AcademicRecord, WebRecord};

fn web(title: &str, url: &str, snippet: &str) -> WebRecord {
    WebRecord {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

fn academic(
    title: &str,
    authors: [&str; 3],
    summary: &str,
    published: &str,
    source: &str,
    keywords: [&str; 4],
) -> AcademicRecord {
    AcademicRecord {
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        summary: summary.to_string(),
        published: published.to_string(),
        source: source.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Web results keyed by exact lowercase query
pub(super) fn web_table() -> Vec<(&'static str, Vec<WebRecord>)> {
    vec![
        (
            "environmental benefits of solar energy",
            vec![
                web(
                    "Environmental Benefits of Solar Energy | Department of Energy",
                    "https://www.energy.gov/solar-environmental-benefits",
                    "Solar energy reduces greenhouse gas emissions, decreases water usage, and minimizes air pollution compared to fossil fuels.",
                ),
                web(
                    "How Solar Power Helps the Environment - National Geographic",
                    "https://www.nationalgeographic.com/solar-environment",
                    "Solar panels produce clean, renewable energy without emitting carbon dioxide or other harmful pollutants.",
                ),
            ],
        ),
        (
            "economic benefits of solar power",
            vec![
                web(
                    "Economic Benefits of Solar Energy - SEIA",
                    "https://www.seia.org/solar-economic-benefits",
                    "Solar energy creates jobs, reduces electricity bills, and increases property values while providing energy independence.",
                ),
                web(
                    "Solar Power Economics: Costs and Benefits Analysis",
                    "https://www.energy.gov/solar-economics",
                    "The levelized cost of solar energy has decreased by over 70% in the past decade, making it competitive with traditional energy sources.",
                ),
            ],
        ),
    ]
}

/// Academic results keyed by a substring of the lowercase query; first key wins
pub(super) fn academic_table() -> Vec<(&'static str, Vec<AcademicRecord>)> {
    vec![
        (
            "environmental impact of solar energy",
            vec![academic(
                "Life Cycle Assessment of Solar PV Systems: Environmental Impacts",
                ["Smith, J.", "Johnson, A.", "Brown, M."],
                "Comprehensive LCA study showing solar PV systems have significantly lower environmental impact compared to fossil fuels over their lifecycle.",
                "2023",
                "Journal of Clean Energy Technologies",
                ["solar energy", "LCA", "environmental impact", "carbon footprint"],
            )],
        ),
        (
            "economic benefits solar power",
            vec![academic(
                "Economic Analysis of Solar Energy Adoption: Cost-Benefit Perspectives",
                ["Wilson, R.", "Davis, S.", "Chen, L."],
                "Study demonstrating the long-term economic benefits of solar energy adoption for both residential and commercial applications.",
                "2022",
                "Energy Economics Review",
                ["solar economics", "cost-benefit", "ROI", "energy savings"],
            )],
        ),
    ]
}
