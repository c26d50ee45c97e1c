// src/pdf/layout.rs
//! Reading-order reconstruction from positioned glyph runs

/// Vertical distance, in user-space units, within which runs share a row.
pub const ROW_THRESHOLD: f64 = 5.0;

/// A positioned string from a content stream. `transform` is the affine
/// matrix `[a, b, c, d, e, f]`; `e` and `f` are the x and y translation.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub transform: [f64; 6],
}

impl GlyphRun {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            transform: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn x(&self) -> f64 {
        self.transform[4]
    }

    pub fn y(&self) -> f64 {
        self.transform[5]
    }
}

/// Cluster runs into rows, top of page first, each row ordered left to right.
///
/// The row's reference y follows the most recently joined run, so a slowly
/// drifting baseline stays in one row.
pub fn group_into_rows(mut runs: Vec<GlyphRun>) -> Vec<Vec<GlyphRun>> {
    runs.sort_by(|a, b| b.y().total_cmp(&a.y()));

    let mut rows = Vec::new();
    let mut current: Vec<GlyphRun> = Vec::new();
    let mut current_y: Option<f64> = None;

    for run in runs {
        let y = run.y();
        let same_row = current_y.is_none_or(|row_y| (y - row_y).abs() <= ROW_THRESHOLD);
        if !same_row {
            rows.push(close_row(std::mem::take(&mut current)));
        }
        current.push(run);
        current_y = Some(y);
    }

    if !current.is_empty() {
        rows.push(close_row(current));
    }

    rows
}

fn close_row(mut row: Vec<GlyphRun>) -> Vec<GlyphRun> {
    row.sort_by(|a, b| a.x().total_cmp(&b.x()));
    row
}

/// Rows joined with single spaces, one line per row, each newline-terminated.
pub fn reconstruct_text(runs: Vec<GlyphRun>) -> String {
    group_into_rows(runs)
        .iter()
        .map(|row| {
            let line = row
                .iter()
                .map(|run| run.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}\n", line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_rows_ordered_by_x() {
        let runs = vec![
            GlyphRun::new("Doe", 120.0, 700.0),
            GlyphRun::new("Engineer", 200.0, 650.0),
            GlyphRun::new("Jane", 72.0, 700.0),
            GlyphRun::new("Senior", 72.0, 650.0),
        ];
        assert_eq!(reconstruct_text(runs), "Jane Doe\nSenior Engineer\n");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let runs = vec![
            GlyphRun::new("a", 0.0, 100.0),
            GlyphRun::new("b", 10.0, 95.0),
            GlyphRun::new("c", 20.0, 89.0),
        ];
        let rows = group_into_rows(runs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][0].text, "c");
    }

    #[test]
    fn test_row_reference_follows_last_run() {
        // 100 -> 96 -> 92 chains into one row even though 100 and 92 differ by 8
        let runs = vec![
            GlyphRun::new("one", 0.0, 100.0),
            GlyphRun::new("two", 10.0, 96.0),
            GlyphRun::new("three", 20.0, 92.0),
        ];
        assert_eq!(group_into_rows(runs).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_into_rows(Vec::new()).is_empty());
        assert_eq!(reconstruct_text(Vec::new()), "");
    }
}
