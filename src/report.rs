//! Assembles the county health access report.
//!
//! The report opens with a cover and an executive summary, then walks through
//! the distribution grid, the grouped comparisons, the county gap ranking,
//! the state density ranking and the recommendations, closing with a detail
//! table for the ranked counties. Sections that depend on the
//! population-adjusted gap are skipped when no row carries a finite gap
//! score.

use chrono::NaiveDate;

use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element};

use crate::builder::{PdfBuilder, PdfOutput};
use crate::charts;
use crate::dataset::{CountyRecord, Dataset};
use crate::error::Result;
use crate::metrics::{self, StateStats};
use crate::model::{
    Block, Cover, FigureBlock, HorizontalAlignment, RichParagraph, Section, TableBlock,
};
use crate::richtext::Span;
use crate::summary::{self, SummaryFigures};

pub const REPORT_TITLE: &str = "Community Health Access Analysis";
pub const REPORT_SUBTITLE: &str = "County-Level Health Needs & Clinic Distribution Report";

/// Section headings, also used for the PDF outline.
pub mod sections {
    pub const EXECUTIVE_SUMMARY: &str = "Executive Summary";
    pub const KEY_STATISTICS: &str = "Key Statistics Overview";
    pub const COMPARATIVE: &str = "Comparative Analysis: Clinic Distribution by Vulnerability";
    pub const TOP_COUNTIES: &str = "Top 20 Most Underserved Counties";
    pub const STATE_SUMMARY: &str = "State-Level Summary";
    pub const RECOMMENDATIONS: &str = "Strategic Recommendations";
    pub const COUNTY_DETAIL: &str = "Underserved County Detail";
}

const FOOTER_HEIGHT_MM: f64 = 9.0;
const GRID_FIGURE_WIDTH_MM: f64 = 232.0;
const BOX_FIGURE_WIDTH_MM: f64 = 240.0;
const RANKING_FIGURE_WIDTH_MM: f64 = 190.0;
const STATE_FIGURE_WIDTH_MM: f64 = 205.0;

const CAPTION_GRAY: Color = Color::Rgb(110, 110, 110);
const FOOTER_GRAY: Color = Color::Rgb(120, 120, 120);

/// Report-level inputs that do not come from the dataset.
#[derive(Debug, Clone, Copy)]
pub struct ReportMeta {
    pub generated_on: NaiveDate,
}

impl ReportMeta {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self { generated_on }
    }

    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

/// The section headings the report will contain for this dataset, in order.
pub fn plan_sections(data: &Dataset) -> Vec<&'static str> {
    let has_ranking = !metrics::top_underserved(data, metrics::TOP_COUNTY_COUNT).is_empty();

    let mut plan = vec![
        sections::EXECUTIVE_SUMMARY,
        sections::KEY_STATISTICS,
        sections::COMPARATIVE,
    ];
    if has_ranking {
        plan.push(sections::TOP_COUNTIES);
    }
    plan.push(sections::STATE_SUMMARY);
    plan.push(sections::RECOMMENDATIONS);
    if has_ranking {
        plan.push(sections::COUNTY_DETAIL);
    }
    plan
}

/// Builds the full document without rendering it.
pub fn build_report(data: &Dataset, meta: &ReportMeta) -> Result<PdfBuilder> {
    let figures = SummaryFigures::compute(data);
    let ranked = metrics::top_underserved(data, metrics::TOP_COUNTY_COUNT);

    let generated_on = meta.generated_on;
    let mut builder = PdfBuilder::new()
        .with_title(REPORT_TITLE)
        .with_cover(cover(data.len(), meta))
        .with_footer(FOOTER_HEIGHT_MM, move |page| {
            page_footer(page, generated_on)
        });

    builder.push_section(executive_summary(&figures, &ranked));
    builder.push_section(key_statistics(data)?);
    builder.push_section(comparative_analysis(data)?);
    if !ranked.is_empty() {
        builder.push_section(top_counties(&ranked)?);
    }
    builder.push_section(state_summary(data)?);
    builder.push_section(recommendations()?);
    if !ranked.is_empty() {
        builder.push_section(county_detail(&ranked));
    }
    Ok(builder)
}

/// Renders the report for an already enriched dataset.
pub fn render_report(data: &Dataset, meta: &ReportMeta) -> Result<PdfOutput> {
    build_report(data, meta)?.render()
}

/// Like [`render_report`], with one outline entry per section.
#[cfg(feature = "bookmarks")]
pub fn render_report_with_bookmarks(data: &Dataset, meta: &ReportMeta) -> Result<PdfOutput> {
    build_report(data, meta)?.render_with_bookmarks()
}

fn cover(total_counties: usize, meta: &ReportMeta) -> Cover {
    Cover::new(REPORT_TITLE)
        .with_subtitle(REPORT_SUBTITLE.to_string())
        .with_meta_line(format!(
            "Generated: {}",
            meta.generated_on.format("%B %d, %Y")
        ))
        .with_meta_line(format!(
            "Total Counties Analyzed: {}",
            summary::format_count(total_counties as u64)
        ))
}

fn page_footer(page: usize, generated_on: NaiveDate) -> impl Element {
    let mut style = Style::new();
    style.set_font_size(9);
    style.set_color(FOOTER_GRAY);
    let mut line = genpdf::elements::Paragraph::new(format!(
        "{REPORT_TITLE} \u{2022} {} \u{2022} Page {page}",
        generated_on.format("%B %d, %Y")
    ));
    line.set_alignment(Alignment::Right);
    line.styled(style)
}

fn caption(text: impl Into<String>) -> RichParagraph {
    RichParagraph::new(vec![Span::new(text).italic().colored(CAPTION_GRAY)])
        .with_alignment(HorizontalAlignment::Center)
}

fn heading_block(text: &str) -> Block {
    Block::paragraph(vec![Span::new(text).bold()])
}

fn bullet_blocks(lines: Vec<String>) -> Vec<Block> {
    lines
        .into_iter()
        .map(|line| Block::paragraph(vec![Span::new(format!("\u{2022} {line}"))]))
        .collect()
}

fn finding(title: &str, bullets: Vec<String>) -> Vec<Block> {
    let mut blocks = vec![Block::Spacer(0.6), heading_block(title)];
    blocks.extend(bullet_blocks(bullets));
    blocks
}

/// Distinct states of the ranked counties, in ranking order.
fn leading_states<'a>(ranked: &[&'a CountyRecord], limit: usize) -> Vec<&'a str> {
    let mut states: Vec<&str> = Vec::new();
    for row in ranked {
        if !states.contains(&row.state.as_str()) {
            states.push(row.state.as_str());
            if states.len() == limit {
                break;
            }
        }
    }
    states
}

fn executive_summary(figures: &SummaryFigures, ranked: &[&CountyRecord]) -> Section {
    let mut section = Section::new(sections::EXECUTIVE_SUMMARY)
        .with_block(heading_block("Key Findings:"))
        .with_blocks(finding(
            "1. COVERAGE GAP",
            vec![
                format!(
                    "{:.1}% of counties have no walk-in clinic locations",
                    figures.share_without_clinics()
                ),
                format!(
                    "Only {} counties ({:.1}%) have at least one clinic",
                    summary::format_count(figures.counties_with_clinics as u64),
                    figures.share_with_clinics()
                ),
                format!(
                    "Total clinics across all counties: {}",
                    summary::format_count(figures.total_clinics.round().max(0.0) as u64)
                ),
            ],
        ))
        .with_blocks(finding(
            "2. SOCIOECONOMIC INEQUITY",
            vec![
                format!(
                    "Counties without clinics have higher SVI scores: {} vs {}",
                    summary::format_opt(figures.svi_overall.without_clinics, 3),
                    summary::format_opt(figures.svi_overall.with_clinics, 3)
                ),
                format!(
                    "Socioeconomic vulnerability: {} (no clinics) vs {} (with clinics)",
                    summary::format_opt(figures.svi_socioeconomic.without_clinics, 3),
                    summary::format_opt(figures.svi_socioeconomic.with_clinics, 3)
                ),
            ],
        ))
        .with_blocks(finding(
            "3. HEALTH NEED MISMATCH",
            vec![
                format!(
                    "Counties without clinics carry a higher health burden: {} vs {}",
                    summary::format_opt(figures.health_burden.without_clinics, 2),
                    summary::format_opt(figures.health_burden.with_clinics, 2)
                ),
                "Counties with greater health need have less access to walk-in care".to_string(),
            ],
        ));

    if let Some(top) = ranked.first() {
        let states = leading_states(ranked, 4);
        section = section
            .with_blocks(finding(
                "4. TOP UNDERSERVED REGIONS",
                vec![
                    format!(
                        "The largest population-adjusted gaps concentrate in: {}",
                        states.join(", ")
                    ),
                    format!("Highest-gap county: {}, {}", top.county, top.state),
                ],
            ))
            .with_blocks(finding(
                "5. URBAN OPPORTUNITIES",
                vec![
                    "Large metropolitan counties show the highest population-adjusted gaps"
                        .to_string(),
                    "High-population areas with few clinics represent unmet demand".to_string(),
                ],
            ));
    }

    section
}

fn key_statistics(data: &Dataset) -> Result<Section> {
    let png = charts::key_statistics_grid(data)?;
    Ok(Section::new(sections::KEY_STATISTICS).with_block(Block::Figure(
        FigureBlock::new(png)
            .with_width_mm(GRID_FIGURE_WIDTH_MM)
            .with_caption(caption(
                "Distributions of clinic counts, health burden and social vulnerability, \
                 with the average burden per clinic-presence group.",
            )),
    )))
}

fn comparative_analysis(data: &Dataset) -> Result<Section> {
    let png = charts::comparison_boxplots(data)?;
    Ok(Section::new(sections::COMPARATIVE).with_block(Block::Figure(
        FigureBlock::new(png)
            .with_width_mm(BOX_FIGURE_WIDTH_MM)
            .with_caption(caption(
                "Clinic counts across social vulnerability quartiles, and health burden \
                 across clinic-presence groups.",
            )),
    )))
}

fn top_counties(ranked: &[&CountyRecord]) -> Result<Section> {
    let png = charts::top_counties_chart(ranked)?;
    Ok(Section::new(sections::TOP_COUNTIES).with_block(Block::Figure(
        FigureBlock::new(png)
            .with_width_mm(RANKING_FIGURE_WIDTH_MM)
            .with_caption(caption(
                "Ranked by population-adjusted gap score (health need \u{d7} population), \
                 colored by clinic presence.",
            )),
    )))
}

fn state_summary(data: &Dataset) -> Result<Section> {
    let states = metrics::state_summaries(data);
    let top: Vec<&StateStats> = metrics::top_states_by_density(&states, metrics::TOP_STATE_COUNT);
    let png = charts::state_density_chart(&top)?;
    Ok(Section::new(sections::STATE_SUMMARY).with_block(Block::Figure(
        FigureBlock::new(png)
            .with_width_mm(STATE_FIGURE_WIDTH_MM)
            .with_caption(caption(format!(
                "Top {} states by clinic density per 100,000 residents.",
                top.len()
            ))),
    )))
}

fn recommendations() -> Result<Section> {
    let priorities = [
        (
            "Priority 1: High-Impact Urban Expansion",
            [
                "Focus on large metropolitan counties with high health burden and moderate-to-low clinic density",
                "Start with the metropolitan counties at the top of the population-adjusted gap ranking",
                "Rationale: maximum population impact with existing infrastructure",
            ],
        ),
        (
            "Priority 2: Rural High-Need Markets",
            [
                "Target rural counties with high health burden scores and zero clinics",
                "Concentrate on the states that dominate the zero-clinic ranking",
                "Consider mobile clinics or partnerships with existing healthcare facilities",
            ],
        ),
        (
            "Priority 3: Vulnerable Community Access",
            [
                "Prioritize counties with high SVI scores and zero clinics",
                "Address socioeconomic barriers to healthcare access",
                "Consider sliding-scale pricing or community health partnerships",
            ],
        ),
        (
            "Priority 4: Data-Driven Iteration",
            [
                "Refresh the derived metrics as new clinic and survey data arrive",
                "Re-rank counties after each expansion wave",
                "Retire targets once local coverage reaches the state average",
            ],
        ),
    ];

    let next_steps = [
        "Validate findings: cross-reference identified underserved counties with local healthcare infrastructure",
        "Market research: conduct feasibility studies for top-priority expansion targets",
        "Partnership opportunities: explore partnerships with local health systems in underserved areas",
        "Pilot programs: launch pilot clinics in two or three high-priority counties",
        "Monitor impact: track health outcomes and utilization rates around new locations",
        "Iterate strategy: refine expansion criteria with each data refresh",
    ];

    let mut section = Section::new(sections::RECOMMENDATIONS);
    for (title, bullets) in priorities {
        section = section.with_block(Block::markup(&format!("**{title}**"))?);
        for bullet in bullets {
            section = section.with_block(Block::markup(&format!("\u{2022} {bullet}"))?);
        }
        section = section.with_block(Block::Spacer(0.6));
    }

    section = section.with_block(Block::markup("**Next Steps**")?);
    for (i, step) in next_steps.iter().enumerate() {
        section = section.with_block(Block::markup(&format!("{}. {step}", i + 1))?);
    }
    Ok(section)
}

fn format_whole(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => summary::format_count(v.round() as u64),
        _ => "n/a".to_string(),
    }
}

fn county_detail(ranked: &[&CountyRecord]) -> Section {
    let headers = vec![
        "Rank".to_string(),
        "County".to_string(),
        "State".to_string(),
        "Gap Score".to_string(),
        "Health Burden".to_string(),
        "Clinics".to_string(),
        "Population".to_string(),
    ];
    let weights = vec![2, 7, 5, 4, 4, 3, 4];

    let mut table = TableBlock::new(headers, weights);
    for (i, row) in ranked.iter().enumerate() {
        table = table.with_row(vec![
            (i + 1).to_string(),
            row.county.clone(),
            row.state.clone(),
            format_whole(row.pop_adjusted_gap),
            summary::format_opt(row.health_burden_score, 2),
            format_whole(row.clinic_count),
            format_whole(row.population),
        ]);
    }

    Section::new(sections::COUNTY_DETAIL)
        .with_block(Block::paragraph(vec![Span::new(
            "The ranked counties from the gap chart, with the values behind the ranking.",
        )]))
        .with_block(Block::Spacer(0.4))
        .with_block(Block::Table(table))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::metrics;

    fn dataset(csv: &str) -> Dataset {
        let mut data = Dataset::from_reader(csv.as_bytes()).unwrap();
        metrics::enrich(&mut data);
        data
    }

    const SMALL: &str = indoc! {"
        county_full,state_full,clinic_count,population,svi_overall,svi_socioeconomic,stroke
        Adams County,Ohio,0,120000,0.82,0.79,5.1
        Baker County,Ohio,3,90000,0.31,0.30,3.2
        Cedar County,Iowa,1,45000,0.55,0.51,4.0
    "};

    #[test]
    fn plan_includes_ranking_sections_when_gaps_exist() {
        let data = dataset(SMALL);
        let plan = plan_sections(&data);
        assert_eq!(
            plan,
            vec![
                sections::EXECUTIVE_SUMMARY,
                sections::KEY_STATISTICS,
                sections::COMPARATIVE,
                sections::TOP_COUNTIES,
                sections::STATE_SUMMARY,
                sections::RECOMMENDATIONS,
                sections::COUNTY_DETAIL,
            ]
        );
    }

    #[test]
    fn plan_drops_ranking_sections_without_health_data() {
        // no health variables means no burden, no need and no gap scores
        let csv = indoc! {"
            county_full,state_full,clinic_count,population,svi_overall,svi_socioeconomic
            Adams County,Ohio,0,120000,0.82,0.79
            Baker County,Ohio,3,90000,0.31,0.30
        "};
        let data = dataset(csv);
        let plan = plan_sections(&data);
        assert!(!plan.contains(&sections::TOP_COUNTIES));
        assert!(!plan.contains(&sections::COUNTY_DETAIL));
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn leading_states_deduplicate_in_rank_order() {
        let data = dataset(SMALL);
        let ranked = metrics::top_underserved(&data, metrics::TOP_COUNTY_COUNT);
        let states = leading_states(&ranked, 4);
        assert!(!states.is_empty());
        let mut deduped = states.clone();
        deduped.dedup();
        assert_eq!(states, deduped);
    }

    #[test]
    fn executive_summary_has_five_findings_with_gap_data() {
        let data = dataset(SMALL);
        let figures = SummaryFigures::compute(&data);
        let ranked = metrics::top_underserved(&data, metrics::TOP_COUNTY_COUNT);
        let section = executive_summary(&figures, &ranked);

        let bold_headings: Vec<String> = section
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => p.spans().first().filter(|s| s.is_bold()).map(|s| s.text().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(bold_headings.len(), 6); // intro line plus five findings
        assert!(bold_headings[1].starts_with("1."));
        assert!(bold_headings[5].starts_with("5."));
    }

    #[test]
    fn county_detail_has_one_row_per_ranked_county() {
        let data = dataset(SMALL);
        let ranked = metrics::top_underserved(&data, metrics::TOP_COUNTY_COUNT);
        let section = county_detail(&ranked);
        let table = section
            .blocks()
            .iter()
            .find_map(|block| match block {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.rows().len(), ranked.len());
        assert_eq!(table.headers().len(), 7);
    }

    #[test]
    fn format_whole_rejects_non_finite_values() {
        assert_eq!(format_whole(Some(1234567.0)), "1,234,567");
        assert_eq!(format_whole(Some(f64::NAN)), "n/a");
        assert_eq!(format_whole(None), "n/a");
    }
}
