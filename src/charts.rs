//! Chart rendering with `plotters` into in-memory PNG buffers.
//!
//! Every chart draws into a bitmap backend buffer and comes back as encoded
//! PNG bytes ready to embed as a [`crate::model::FigureBlock`]. Labels use
//! the same font files as the PDF text layer, registered once per process,
//! so rendering never depends on system font lookup.

use std::io::Cursor;
use std::sync::OnceLock;

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use crate::dataset::{CountyRecord, Dataset};
use crate::error::{ReportError, Result};
use crate::fonts;
use crate::metrics::{self, ClinicPresence, StateStats, SviQuartile};
use crate::stats::{self, Quartiles};

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const TEAL: RGBColor = RGBColor(0, 128, 128);

const CATEGORY_RED: RGBColor = RGBColor(214, 39, 40);
const CATEGORY_ORANGE: RGBColor = RGBColor(255, 127, 14);
const CATEGORY_GREEN: RGBColor = RGBColor(44, 160, 44);

// viridis-like ramp for the SVI quartiles
const QUARTILE_COLORS: [RGBColor; 4] = [
    RGBColor(68, 1, 84),
    RGBColor(49, 104, 142),
    RGBColor(53, 183, 121),
    RGBColor(253, 231, 37),
];

const PRESENCE_BOX_COLORS: [RGBColor; 3] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
];

const GRID_CHART_SIZE: (u32, u32) = (2400, 1600);
const BOX_CHART_SIZE: (u32, u32) = (2400, 1200);
const RANKING_CHART_SIZE: (u32, u32) = (2000, 1600);
const STATE_CHART_SIZE: (u32, u32) = (2000, 1400);

const HISTOGRAM_BINS: usize = 50;

static CHART_FONTS: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Registers the report fonts as the `sans-serif` family for `plotters`.
/// Idempotent; the font bytes stay resident for the process lifetime.
pub fn register_chart_fonts() -> Result<()> {
    let outcome = CHART_FONTS.get_or_init(|| {
        let regular_path = fonts::regular_font_file();
        let regular = std::fs::read(&regular_path)
            .map_err(|e| format!("{}: {e}", regular_path.display()))?;
        let bold_path = fonts::bold_font_file();
        let bold =
            std::fs::read(&bold_path).map_err(|e| format!("{}: {e}", bold_path.display()))?;
        register_font(
            "sans-serif",
            FontStyle::Normal,
            Box::leak(regular.into_boxed_slice()),
        )
        .map_err(|_| format!("invalid font data in {}", regular_path.display()))?;
        register_font(
            "sans-serif",
            FontStyle::Bold,
            Box::leak(bold.into_boxed_slice()),
        )
        .map_err(|_| format!("invalid font data in {}", bold_path.display()))?;
        Ok(())
    });
    outcome.clone().map_err(ReportError::fonts)
}

fn presence_color(category: ClinicPresence) -> RGBColor {
    match category {
        ClinicPresence::Zero => CATEGORY_RED,
        ClinicPresence::Few => CATEGORY_ORANGE,
        ClinicPresence::Many => CATEGORY_GREEN,
    }
}

fn quartile_color(quartile: SviQuartile) -> RGBColor {
    let index = match quartile {
        SviQuartile::Q1 => 0,
        SviQuartile::Q2 => 1,
        SviQuartile::Q3 => 2,
        SviQuartile::Q4 => 3,
    };
    QUARTILE_COLORS[index]
}

fn buffer_for(size: (u32, u32)) -> Vec<u8> {
    vec![0u8; size.0 as usize * size.1 as usize * 3]
}

fn encode_png(raw: Vec<u8>, size: (u32, u32)) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(size.0, size.1, raw)
        .ok_or_else(|| ReportError::Chart("bitmap buffer size mismatch".into()))?;
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .map_err(ReportError::chart)?;
    Ok(png)
}

/// Which central marker a histogram panel draws, with the label precision.
enum PanelMarker {
    Median(usize),
    Mean(usize),
}

impl PanelMarker {
    fn compute(&self, values: &[f64]) -> Option<(f64, String)> {
        match self {
            Self::Median(precision) => stats::median(values)
                .map(|v| (v, format!("Median: {v:.prec$}", prec = *precision))),
            Self::Mean(precision) => {
                stats::mean(values).map(|v| (v, format!("Mean: {v:.prec$}", prec = *precision)))
            }
        }
    }
}

/// The two-by-two distribution grid: clinic counts, health burden, SVI and
/// the mean burden per clinic-presence bucket.
pub fn key_statistics_grid(data: &Dataset) -> Result<Vec<u8>> {
    register_chart_fonts()?;
    let size = GRID_CHART_SIZE;
    let mut raw = buffer_for(size);
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::chart)?;
        let panels = root.split_evenly((2, 2));

        draw_histogram_panel(
            &panels[0],
            "Distribution of Clinic Counts",
            &data.finite_values(|r| r.clinic_count),
            STEEL_BLUE,
            PanelMarker::Median(1),
            "Number of Clinics",
        )?;
        draw_histogram_panel(
            &panels[1],
            "Distribution of Health Burden Scores",
            &data.finite_values(|r| r.health_burden_score),
            PURPLE,
            PanelMarker::Mean(2),
            "Health Burden Score",
        )?;
        draw_histogram_panel(
            &panels[2],
            "Distribution of Social Vulnerability Index",
            &data.finite_values(|r| r.svi_overall),
            TEAL,
            PanelMarker::Mean(3),
            "SVI Score",
        )?;
        draw_presence_bar_panel(
            &panels[3],
            "Health Burden by Clinic Presence",
            &metrics::presence_groups(data, |r| r.health_burden_score),
        )?;

        root.present().map_err(ReportError::chart)?;
    }
    encode_png(raw, size)
}

/// Side-by-side box panels: clinic counts by SVI quartile, health burden by
/// clinic presence.
pub fn comparison_boxplots(data: &Dataset) -> Result<Vec<u8>> {
    register_chart_fonts()?;
    let size = BOX_CHART_SIZE;
    let mut raw = buffer_for(size);
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::chart)?;
        let panels = root.split_evenly((1, 2));

        let by_quartile: Vec<(&str, Vec<f64>, RGBColor)> =
            metrics::svi_quartile_groups(data, |r| r.clinic_count)
                .into_iter()
                .map(|(quartile, values)| (quartile.label(), values, quartile_color(quartile)))
                .collect();
        draw_box_panel(
            &panels[0],
            "Clinic Count by SVI Quartiles",
            "Number of Clinics",
            &by_quartile,
        )?;

        let by_presence: Vec<(&str, Vec<f64>, RGBColor)> =
            metrics::presence_groups(data, |r| r.health_burden_score)
                .into_iter()
                .enumerate()
                .map(|(i, (category, values))| {
                    let color = PRESENCE_BOX_COLORS[i % PRESENCE_BOX_COLORS.len()];
                    (category.label(), values, color)
                })
                .collect();
        draw_box_panel(
            &panels[1],
            "Health Burden by Clinic Presence",
            "Health Burden Score",
            &by_presence,
        )?;

        root.present().map_err(ReportError::chart)?;
    }
    encode_png(raw, size)
}

/// Horizontal ranking bars for the most underserved counties, colored by
/// clinic presence, highest gap at the top.
pub fn top_counties_chart(ranked: &[&CountyRecord]) -> Result<Vec<u8>> {
    if ranked.is_empty() {
        return Err(ReportError::Chart("no counties with a gap score".into()));
    }
    register_chart_fonts()?;
    let size = RANKING_CHART_SIZE;
    let mut raw = buffer_for(size);
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::chart)?;

        let n = ranked.len();
        let x_max = ranked
            .iter()
            .filter_map(|r| r.pop_adjusted_gap)
            .fold(0.0f64, f64::max)
            .max(f64::MIN_POSITIVE)
            * 1.06;

        let mut chart = ChartBuilder::on(&root)
            .margin(24)
            .x_label_area_size(70)
            .y_label_area_size(24)
            .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))
            .map_err(ReportError::chart)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_labels(8)
            .x_label_formatter(&scaled_tick)
            .x_desc("Population-Adjusted Gap Score")
            .axis_desc_style(("sans-serif", 30))
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(ReportError::chart)?;

        // rank 1 at the top
        let bar_y = |rank: usize| (n - 1 - rank) as f64;

        chart
            .draw_series(ranked.iter().enumerate().map(|(rank, row)| {
                let gap = row.pop_adjusted_gap.unwrap_or(0.0);
                let color = match metrics::presence_of(row) {
                    Some(category) => presence_color(category),
                    None => STEEL_BLUE,
                };
                let y = bar_y(rank);
                Rectangle::new([(0.0, y - 0.38), (gap, y + 0.38)], color.mix(0.8).filled())
            }))
            .map_err(ReportError::chart)?;

        let name_style = ("sans-serif", 24)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart
            .draw_series(ranked.iter().enumerate().map(|(rank, row)| {
                Text::new(
                    format!("{}, {}", row.county, row.state),
                    (x_max * 0.012, bar_y(rank)),
                    name_style.clone(),
                )
            }))
            .map_err(ReportError::chart)?;

        let mut present: Vec<ClinicPresence> = ranked
            .iter()
            .filter_map(|r| metrics::presence_of(r))
            .collect();
        present.sort_unstable();
        present.dedup();
        for category in present {
            let color = presence_color(category);
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(0.0, -0.5), (0.0, -0.5)],
                    color.mix(0.8).filled(),
                )))
                .map_err(ReportError::chart)?
                .label(category.label())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 7), (x + 20, y + 7)], color.mix(0.8).filled())
                });
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK.mix(0.3))
            .label_font(("sans-serif", 26))
            .draw()
            .map_err(ReportError::chart)?;

        root.present().map_err(ReportError::chart)?;
    }
    encode_png(raw, size)
}

/// Horizontal bars of clinic density for the leading states, with the value
/// printed at the end of each bar.
pub fn state_density_chart(top: &[&StateStats]) -> Result<Vec<u8>> {
    if top.is_empty() {
        return Err(ReportError::Chart("no states to rank".into()));
    }
    register_chart_fonts()?;
    let size = STATE_CHART_SIZE;
    let mut raw = buffer_for(size);
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::chart)?;

        let n = top.len();
        let x_max = top
            .iter()
            .map(|s| s.clinics_per_100k)
            .fold(0.0f64, f64::max)
            .max(f64::MIN_POSITIVE)
            * 1.18;

        let mut chart = ChartBuilder::on(&root)
            .margin(24)
            .x_label_area_size(70)
            .y_label_area_size(24)
            .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))
            .map_err(ReportError::chart)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_labels(8)
            .x_desc("Clinics per 100,000 Population")
            .axis_desc_style(("sans-serif", 30))
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(ReportError::chart)?;

        let bar_y = |rank: usize| (n - 1 - rank) as f64;

        chart
            .draw_series(top.iter().enumerate().map(|(rank, state)| {
                let y = bar_y(rank);
                Rectangle::new(
                    [(0.0, y - 0.36), (state.clinics_per_100k, y + 0.36)],
                    STEEL_BLUE.mix(0.8).filled(),
                )
            }))
            .map_err(ReportError::chart)?;

        let name_style = ("sans-serif", 26)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let value_style = ("sans-serif", 24)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (rank, state) in top.iter().enumerate() {
            let y = bar_y(rank);
            chart
                .draw_series(std::iter::once(Text::new(
                    state.state.clone(),
                    (x_max * 0.012, y),
                    name_style.clone(),
                )))
                .map_err(ReportError::chart)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.2}", state.clinics_per_100k),
                    (state.clinics_per_100k + x_max * 0.012, y),
                    value_style.clone(),
                )))
                .map_err(ReportError::chart)?;
        }

        root.present().map_err(ReportError::chart)?;
    }
    encode_png(raw, size)
}

fn draw_histogram_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    values: &[f64],
    color: RGBColor,
    marker: PanelMarker,
    x_desc: &str,
) -> Result<()> {
    if values.is_empty() {
        return draw_empty_panel(area, title);
    }

    let (min, max) = stats::min_max(values).unwrap_or((0.0, 1.0));
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let (edges, counts) = histogram_bins(values, lo, hi, HISTOGRAM_BINS);
    let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.08;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 34))
        .margin(18)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(ReportError::chart)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("Number of Counties")
        .axis_desc_style(("sans-serif", 26))
        .label_style(("sans-serif", 22))
        .x_labels(8)
        .y_labels(6)
        .draw()
        .map_err(ReportError::chart)?;

    chart
        .draw_series(edges.windows(2).zip(counts.iter()).map(|(edge, &count)| {
            Rectangle::new(
                [(edge[0], 0.0), (edge[1], count as f64)],
                color.mix(0.65).filled(),
            )
        }))
        .map_err(ReportError::chart)?;

    if let Some((value, label)) = marker.compute(values) {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(value, 0.0), (value, y_max)],
                RED.stroke_width(4),
            )))
            .map_err(ReportError::chart)?
            .label(label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], RED.stroke_width(4)));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK.mix(0.3))
            .label_font(("sans-serif", 24))
            .draw()
            .map_err(ReportError::chart)?;
    }

    Ok(())
}

fn draw_presence_bar_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    groups: &[(ClinicPresence, Vec<f64>)],
) -> Result<()> {
    let means: Vec<(ClinicPresence, f64)> = groups
        .iter()
        .filter_map(|(category, values)| stats::mean(values).map(|m| (*category, m)))
        .collect();
    if means.is_empty() {
        return draw_empty_panel(area, title);
    }

    let n = means.len();
    let y_max = means
        .iter()
        .map(|(_, m)| *m)
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE)
        * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 34))
        .margin(18)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..y_max)
        .map_err(ReportError::chart)?;

    let labels: Vec<&str> = means.iter().map(|(category, _)| category.label()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| index_label(*x, &labels))
        .y_desc("Average Health Burden Score")
        .axis_desc_style(("sans-serif", 26))
        .label_style(("sans-serif", 22))
        .y_labels(6)
        .draw()
        .map_err(ReportError::chart)?;

    chart
        .draw_series(means.iter().enumerate().map(|(i, (category, mean))| {
            Rectangle::new(
                [(i as f64 - 0.32, 0.0), (i as f64 + 0.32, *mean)],
                presence_color(*category).mix(0.85).filled(),
            )
        }))
        .map_err(ReportError::chart)?;

    let value_style = ("sans-serif", 24)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for (i, (_, mean)) in means.iter().enumerate() {
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{mean:.1}"),
                (i as f64, *mean + y_max * 0.015),
                value_style.clone(),
            )))
            .map_err(ReportError::chart)?;
    }

    Ok(())
}

fn draw_box_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    y_desc: &str,
    groups: &[(&str, Vec<f64>, RGBColor)],
) -> Result<()> {
    if groups.is_empty() {
        return draw_empty_panel(area, title);
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (_, values, _) in groups {
        for &v in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return draw_empty_panel(area, title);
    }
    let pad = (hi - lo).max(1.0) * 0.06;
    let n = groups.len();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 34))
        .margin(18)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), (lo - pad)..(hi + pad))
        .map_err(ReportError::chart)?;

    let labels: Vec<&str> = groups.iter().map(|(label, _, _)| *label).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| index_label(*x, &labels))
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 26))
        .label_style(("sans-serif", 22))
        .y_labels(6)
        .draw()
        .map_err(ReportError::chart)?;

    const HALF_WIDTH: f64 = 0.28;
    for (i, (_, values, color)) in groups.iter().enumerate() {
        let Some(quartiles) = Quartiles::of(values) else {
            continue;
        };
        let (lo_fence, hi_fence) = quartiles.fences();
        let whisker_lo = values
            .iter()
            .copied()
            .filter(|v| *v >= lo_fence)
            .fold(f64::INFINITY, f64::min);
        let whisker_hi = values
            .iter()
            .copied()
            .filter(|v| *v <= hi_fence)
            .fold(f64::NEG_INFINITY, f64::max);
        let whisker_lo = if whisker_lo.is_finite() { whisker_lo } else { quartiles.q1 };
        let whisker_hi = if whisker_hi.is_finite() { whisker_hi } else { quartiles.q3 };
        let x = i as f64;

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - HALF_WIDTH, quartiles.q1), (x + HALF_WIDTH, quartiles.q3)],
                color.mix(0.5).filled(),
            )))
            .map_err(ReportError::chart)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - HALF_WIDTH, quartiles.q1), (x + HALF_WIDTH, quartiles.q3)],
                color.stroke_width(3),
            )))
            .map_err(ReportError::chart)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (x - HALF_WIDTH, quartiles.median),
                    (x + HALF_WIDTH, quartiles.median),
                ],
                BLACK.stroke_width(4),
            )))
            .map_err(ReportError::chart)?;

        for (from, to) in [(quartiles.q3, whisker_hi), (quartiles.q1, whisker_lo)] {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, from), (x, to)],
                    color.stroke_width(3),
                )))
                .map_err(ReportError::chart)?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x - HALF_WIDTH * 0.6, to), (x + HALF_WIDTH * 0.6, to)],
                    color.stroke_width(3),
                )))
                .map_err(ReportError::chart)?;
        }

        chart
            .draw_series(
                values
                    .iter()
                    .filter(|v| **v < lo_fence || **v > hi_fence)
                    .map(|&v| Circle::new((x, v), 5, color.mix(0.45).filled())),
            )
            .map_err(ReportError::chart)?;
    }

    Ok(())
}

fn draw_empty_panel(area: &DrawingArea<BitMapBackend, Shift>, title: &str) -> Result<()> {
    area.draw(&Text::new(
        format!("{title}: no data available"),
        (48, 48),
        ("sans-serif", 28).into_font().color(&BLACK.mix(0.6)),
    ))
    .map_err(ReportError::chart)
}

/// Maps a fractional axis position back to a category label; positions off
/// the integer grid get no label.
fn index_label(x: f64, labels: &[&str]) -> String {
    let idx = x.round();
    if idx >= 0.0 && (x - idx).abs() < 0.25 && (idx as usize) < labels.len() {
        labels[idx as usize].to_string()
    } else {
        String::new()
    }
}

/// Equal-width bins over `[lo, hi]`; the top edge is inclusive.
fn histogram_bins(values: &[f64], lo: f64, hi: f64, bins: usize) -> (Vec<f64>, Vec<usize>) {
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut index = ((v - lo) / width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }
    (edges, counts)
}

fn scaled_tick(value: &f64) -> String {
    let v = *value;
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.0}K", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bins_cover_the_range() {
        let values = [0.0, 0.5, 1.0, 1.0, 2.0];
        let (edges, counts) = histogram_bins(&values, 0.0, 2.0, 4);
        assert_eq!(edges.len(), 5);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[4], 2.0);
        // bins are left-closed; 2.0 sits on the top edge and lands in the last bin
        assert_eq!(counts, vec![1, 1, 2, 1]);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn index_labels_only_hit_integer_positions() {
        let labels = ["a", "b"];
        assert_eq!(index_label(0.0, &labels), "a");
        assert_eq!(index_label(1.02, &labels), "b");
        assert_eq!(index_label(0.5, &labels), "");
        assert_eq!(index_label(2.0, &labels), "");
        assert_eq!(index_label(-1.0, &labels), "");
    }

    #[test]
    fn ticks_scale_into_k_and_m() {
        assert_eq!(scaled_tick(&0.0), "0");
        assert_eq!(scaled_tick(&950.0), "950");
        assert_eq!(scaled_tick(&12_000.0), "12K");
        assert_eq!(scaled_tick(&2_400_000.0), "2.4M");
    }
}
