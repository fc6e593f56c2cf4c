//! Plain-text rendering of classified tables for terminal output.

use std::fmt::Write;

use crate::prediction::{Label, PredictionResult, PREDICTION_COLUMN};

/// Columns shown for each group of individuals.
pub const DISPLAY_COLUMNS: [&str; 5] = ["age", "sex", "chol", "trestbps", "thalach"];

/// Canned guidance shown alongside each group.
pub fn guidance(label: Label) -> &'static [&'static str] {
    match label {
        Label::HeartDisease => &[
            "Seek medical attention: consult a healthcare provider for further evaluation and treatment.",
            "Lifestyle changes: focus on a balanced diet, regular exercise, and stress management.",
            "Medication: follow any prescribed medication regimens carefully.",
            "Regular check-ups: keep track of your heart health with regular medical visits.",
        ],
        Label::NoHeartDisease => &[
            "Healthy diet: eat a diet rich in fruits, vegetables, and whole grains.",
            "Stay active: aim for at least 30 minutes of moderate physical activity most days.",
            "Avoid smoking: smoking significantly increases heart disease risk.",
            "Regular check-ups: continue to monitor your health, even if you're at low risk.",
        ],
    }
}

fn heading(label: Label) -> &'static str {
    match label {
        Label::HeartDisease => "Advice for individuals with heart disease",
        Label::NoHeartDisease => "Tips for maintaining heart health",
    }
}

/// Renders `result` as an aligned text table.
pub fn render_table(result: &PredictionResult) -> String {
    let header = result.columns();
    let rows: Vec<Vec<String>> = result
        .iter()
        .map(|(cells, label)| {
            cells
                .iter()
                .map(ToString::to_string)
                .chain(std::iter::once(label.to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<&str>, out: &mut String| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };
    line(header, &mut out);
    for row in &rows {
        line(row.iter().map(String::as_str).collect(), &mut out);
    }
    out
}

/// Every column of every row, prediction included, under a heading.
pub fn render_preview(result: &PredictionResult) -> String {
    format!("Data preview ({} rows):\n{}", result.len(), render_table(result))
}

/// Full report: label totals, then each non-empty group with its guidance.
pub fn render(result: &PredictionResult) -> String {
    let counts = result.counts();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Predictions: {} total, {} {}, {} {}",
        counts.total(),
        counts.heart_disease,
        Label::HeartDisease,
        counts.no_heart_disease,
        Label::NoHeartDisease,
    );

    for label in [Label::HeartDisease, Label::NoHeartDisease] {
        let group = result.rows_with_label(label);
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", heading(label));
        for tip in guidance(label) {
            let _ = writeln!(out, "  - {}", tip);
        }

        let view = group.select(&DISPLAY_COLUMNS).unwrap_or(group);
        let _ = writeln!(out, "\n{} ({} rows):", label, view.len());
        out.push_str(&render_table(&view));
    }
    out
}
