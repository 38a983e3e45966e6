//! Visualization data for a score table.
//!
//! Two bar charts are produced: scores per candidate, and years of
//! experience per candidate with a dashed reference line at the required
//! experience. Charts serialize to JSON for the HTTP frontend and render to
//! plain text for the terminal.

use serde::Serialize;

use crate::models::ScoreTable;

/// Default width, in characters, of the longest bar in text output.
pub const DEFAULT_TEXT_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Horizontal line drawn across a chart at `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceLine>,
}

/// Both charts shown for a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub score: BarChart,
    pub experience: BarChart,
}

pub fn charts(table: &ScoreTable, required_experience: f64) -> Charts {
    Charts {
        score: score_chart(table),
        experience: experience_chart(table, required_experience),
    }
}

pub fn score_chart(table: &ScoreTable) -> BarChart {
    BarChart {
        title: "Score Visualization".to_string(),
        x_label: "Candidate".to_string(),
        y_label: "Score (1-10)".to_string(),
        bars: table
            .iter()
            .map(|c| Bar {
                label: c.name.clone(),
                value: c.score,
            })
            .collect(),
        reference: None,
    }
}

pub fn experience_chart(table: &ScoreTable, required_experience: f64) -> BarChart {
    BarChart {
        title: "Experience Visualization".to_string(),
        x_label: "Candidate".to_string(),
        y_label: "Experience (years)".to_string(),
        bars: table
            .iter()
            .map(|c| Bar {
                label: c.name.clone(),
                value: f64::from(c.experience),
            })
            .collect(),
        reference: Some(ReferenceLine {
            label: "Required Experience".to_string(),
            value: required_experience,
            style: LineStyle::Dashed,
        }),
    }
}

impl BarChart {
    /// Renders the chart as horizontal text bars, `width` characters for the
    /// largest value. The reference line, if any, is drawn as a `:` column.
    pub fn render_text(&self, width: usize) -> String {
        let mut out = format!("{}\n", self.title);
        out.push_str(&format!("{} vs {}\n", self.y_label, self.x_label));

        if self.bars.is_empty() {
            out.push_str("  (no data)\n");
            return out;
        }

        let label_width = self.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        let scale_max = self
            .bars
            .iter()
            .map(|b| b.value)
            .chain(self.reference.iter().map(|r| r.value))
            .fold(0.0f64, f64::max);
        let columns = |value: f64| -> usize {
            if scale_max <= 0.0 || value <= 0.0 {
                0
            } else {
                ((value / scale_max) * width as f64).round() as usize
            }
        };
        let reference_col = self.reference.as_ref().map(|r| columns(r.value));

        for bar in &self.bars {
            let filled = columns(bar.value).min(width);
            let mut row: Vec<char> = std::iter::repeat('#')
                .take(filled)
                .chain(std::iter::repeat(' ').take(width + 1 - filled))
                .collect();
            if let Some(col) = reference_col {
                let col = col.min(width);
                if row[col] == ' ' {
                    row[col] = ':';
                }
            }
            let row: String = row.into_iter().collect();
            out.push_str(&format!(
                "  {:<lw$} | {} {}\n",
                bar.label,
                row.trim_end(),
                format_value(bar.value),
                lw = label_width
            ));
        }

        if let Some(r) = &self.reference {
            out.push_str(&format!("  : {} = {}\n", r.label, format_value(r.value)));
        }
        out
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
