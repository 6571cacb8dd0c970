//! Two-panel figure construction (timeline bars + duration pie)
//!
//! Builds a Plotly-compatible figure: serialized to JSON it renders directly
//! with `Plotly.newPlot(div, figure.data, figure.layout)`. The bar panel
//! shows one horizontal bar per stage in transcript order; the pie panel
//! aggregates total synthetic duration per category.

use crate::classify::Category;
use crate::parser::Stage;
use serde::Serialize;

/// Bars wider than this get their label truncated with an ellipsis.
const LABEL_CAP: usize = 50;

/// A single Plotly trace. The `type` tag selects the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Bar {
        x: Vec<f64>,
        y: Vec<usize>,
        orientation: &'static str,
        text: Vec<String>,
        textposition: &'static str,
        marker: BarMarker,
        name: String,
        hovertemplate: String,
        legendgroup: String,
        showlegend: bool,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        hole: f64,
        marker: PieMarker,
        showlegend: bool,
        legendgroup: &'static str,
        textinfo: &'static str,
        textposition: &'static str,
        domain: Domain,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct BarMarker {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieMarker {
    pub colors: Vec<&'static str>,
}

/// Horizontal extent of the pie panel within the figure.
#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub x: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    pub title: AxisTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: LayoutTitle,
    pub height: u32,
    pub showlegend: bool,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    pub legend: Legend,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutTitle {
    pub text: &'static str,
}

/// The complete two-panel figure, transient per request.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Serialize to a Plotly-compatible JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Render a standalone HTML page for the figure (the CLI artifact).
    pub fn to_html(&self, title: &str) -> Result<String, serde_json::Error> {
        let figure_json = self.to_json()?;
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
</head>
<body>
    <div id="chart"></div>
    <script>
        const figure = {figure_json};
        Plotly.newPlot('chart', figure.data, figure.layout);
    </script>
</body>
</html>
"#
        ))
    }
}

/// Build the two-panel figure for an ordered stage list.
///
/// Zero stages produce a figure with an empty trace list; rendering it is a
/// blank chart, not an error.
pub fn build_figure(stages: &[Stage]) -> Figure {
    let mut data = Vec::with_capacity(stages.len() + 1);
    let mut seen_in_legend: Vec<Category> = Vec::new();

    // One bar per stage; only the first bar of each category shows a
    // legend entry.
    for stage in stages {
        let category = stage.stage_type;
        let show_legend = !seen_in_legend.contains(&category);
        if show_legend {
            seen_in_legend.push(category);
        }

        let label = truncate_label(&stage.content);
        data.push(Trace::Bar {
            x: vec![stage.duration],
            y: vec![stage.index],
            orientation: "h",
            text: vec![label.clone()],
            textposition: "inside",
            marker: BarMarker {
                color: category.color(),
            },
            name: category.display_name().to_string(),
            hovertemplate: format!(
                "<b>{}</b><br>Duration: {:.1}s<extra></extra>",
                label, stage.duration
            ),
            legendgroup: category.display_name().to_string(),
            showlegend: show_legend,
        });
    }

    let totals = aggregate_durations(stages);
    if !totals.is_empty() {
        data.push(Trace::Pie {
            labels: totals
                .iter()
                .map(|(c, _)| c.display_name().to_string())
                .collect(),
            values: totals.iter().map(|(_, d)| *d).collect(),
            hole: 0.3,
            marker: PieMarker {
                colors: totals.iter().map(|(c, _)| c.color()).collect(),
            },
            showlegend: true,
            legendgroup: "pie",
            textinfo: "label+percent",
            textposition: "inside",
            domain: Domain { x: [0.65, 1.0] },
        });
    }

    Figure {
        data,
        layout: Layout {
            title: LayoutTitle {
                text: "Chain-of-Thought Analysis",
            },
            height: 650,
            showlegend: true,
            xaxis: AxisLayout {
                domain: Some([0.0, 0.55]),
                title: AxisTitle {
                    text: "Duration (seconds)",
                },
            },
            yaxis: AxisLayout {
                domain: None,
                title: AxisTitle {
                    text: "Thinking Sequence",
                },
            },
            legend: Legend {
                orientation: "v",
                x: 1.02,
                y: 0.9,
            },
        },
    }
}

/// Total duration per category, in first-appearance order. Categories with
/// no stages are absent rather than zero-valued.
fn aggregate_durations(stages: &[Stage]) -> Vec<(Category, f64)> {
    let mut totals: Vec<(Category, f64)> = Vec::new();
    for stage in stages {
        match totals.iter_mut().find(|(c, _)| *c == stage.stage_type) {
            Some((_, total)) => *total += stage.duration,
            None => totals.push((stage.stage_type, stage.duration)),
        }
    }
    totals
}

fn truncate_label(content: &str) -> String {
    if content.chars().count() > LABEL_CAP {
        let capped: String = content.chars().take(LABEL_CAP).collect();
        format!("{}...", capped)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_thinking;

    #[test]
    fn test_one_bar_per_stage_plus_pie() {
        let stages = parse_thinking("I analyze. I plan. I analyze more.");
        let figure = build_figure(&stages);
        // 3 bars + 1 pie
        assert_eq!(figure.data.len(), 4);
        assert!(matches!(figure.data[0], Trace::Bar { .. }));
        assert!(matches!(figure.data[3], Trace::Pie { .. }));
    }

    #[test]
    fn test_legend_deduplicated_by_category() {
        let stages = parse_thinking("I analyze this. I analyze that. I plan.");
        let figure = build_figure(&stages);
        let legend_flags: Vec<bool> = figure
            .data
            .iter()
            .filter_map(|t| match t {
                Trace::Bar { showlegend, .. } => Some(*showlegend),
                _ => None,
            })
            .collect();
        assert_eq!(legend_flags, vec![true, false, true]);
    }

    #[test]
    fn test_pie_conserves_total_duration() {
        let stages =
            parse_thinking("I analyze the problem carefully. Then I plan. Something generic here.");
        let figure = build_figure(&stages);
        let stage_total: f64 = stages.iter().map(|s| s.duration).sum();
        let pie_total: f64 = figure
            .data
            .iter()
            .filter_map(|t| match t {
                Trace::Pie { values, .. } => Some(values.iter().sum::<f64>()),
                _ => None,
            })
            .sum();
        assert!((stage_total - pie_total).abs() < 1e-9);
    }

    #[test]
    fn test_pie_slices_in_first_appearance_order() {
        let stages = parse_thinking("Generic start. I analyze. More generic. I plan.");
        let figure = build_figure(&stages);
        let labels = figure
            .data
            .iter()
            .find_map(|t| match t {
                Trace::Pie { labels, .. } => Some(labels.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(labels, vec!["General", "Analysis", "Planning"]);
    }

    #[test]
    fn test_empty_stages_build_empty_figure() {
        let figure = build_figure(&[]);
        assert!(figure.data.is_empty());
        // Still serializes and renders
        assert!(figure.to_json().unwrap().contains("Chain-of-Thought"));
    }

    #[test]
    fn test_long_content_truncated_in_label() {
        let long = "word ".repeat(30);
        let stages = parse_thinking(&long);
        let figure = build_figure(&stages);
        if let Trace::Bar { text, .. } = &figure.data[0] {
            assert!(text[0].ends_with("..."));
            assert_eq!(text[0].chars().count(), 53);
        } else {
            panic!("expected bar trace");
        }
    }

    #[test]
    fn test_html_embeds_figure() {
        let stages = parse_thinking("I analyze.");
        let html = build_figure(&stages).to_html("Chart").unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("#FF6B6B"));
    }
}
