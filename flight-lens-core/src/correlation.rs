use flight_lens_common::{FlightLensError, Result};
use serde::{Deserialize, Serialize};

/// selector text that stands for "show every feature"
pub const FULL_MATRIX_LABEL: &str = "Full Correlation Matrix";
/// colour scale bounds shared by both views
pub const Z_RANGE: (f64, f64) = (-1.0, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>, // values[row][col], row/col share `labels`
}

impl CorrelationMatrix {
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        let n = labels.len();
        if values.len() != n {
            return Err(FlightLensError::InvalidArgument(format!(
                "correlation matrix has {} labels but {} rows",
                n,
                values.len()
            )));
        }
        if let Some((i, row)) = values.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(FlightLensError::InvalidArgument(format!(
                "correlation matrix row {} ({}) has {} cells, expected {n}",
                i,
                labels[i],
                row.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(FlightLensError::InvalidArgument(format!(
                "duplicate correlation label '{dup}'"
            )));
        }
        Ok(Self { labels, values })
    }
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.values[self.index_of(row)?][self.index_of(col)?])
    }
    /// options offered by the feature selector, sentinel first
    pub fn selector_options(&self) -> Vec<String> {
        std::iter::once(FULL_MATRIX_LABEL.to_string())
            .chain(self.labels.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Full,
    Feature(String),
}

impl Selection {
    pub fn parse(text: &str) -> Self {
        if text == FULL_MATRIX_LABEL {
            Selection::Full
        } else {
            Selection::Feature(text.to_string())
        }
    }
    pub fn label(&self) -> &str {
        match self {
            Selection::Full => FULL_MATRIX_LABEL,
            Selection::Feature(f) => f,
        }
    }
}

/// A rectangular heat grid ready to be coloured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapView {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
    pub zmin: f64,
    pub zmax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixView {
    Full(HeatmapView),
    Row(HeatmapView),
}

impl MatrixView {
    pub fn heatmap(&self) -> &HeatmapView {
        match self {
            MatrixView::Full(h) | MatrixView::Row(h) => h,
        }
    }
    pub fn title(&self) -> String {
        match self {
            MatrixView::Full(_) => "Full Feature Correlation Matrix".into(),
            MatrixView::Row(h) => format!(
                "Correlation Heatmap for {}",
                h.row_labels.first().map(String::as_str).unwrap_or("-")
            ),
        }
    }
}

pub fn slice(matrix: &CorrelationMatrix, selection: &Selection) -> Result<MatrixView> {
    let (zmin, zmax) = Z_RANGE;
    match selection {
        Selection::Full => Ok(MatrixView::Full(HeatmapView {
            row_labels: matrix.labels.clone(),
            col_labels: matrix.labels.clone(),
            cells: matrix.values.clone(),
            zmin,
            zmax,
        })),
        Selection::Feature(label) => {
            let idx = matrix.index_of(label).ok_or_else(|| {
                FlightLensError::NotFound(format!("feature '{label}' is not in the correlation matrix"))
            })?;
            Ok(MatrixView::Row(HeatmapView {
                row_labels: vec![label.clone()],
                col_labels: matrix.labels.clone(),
                cells: vec![matrix.values[idx].clone()],
                zmin,
                zmax,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CorrelationMatrix {
        CorrelationMatrix::new(
            vec!["DISTANCE".into(), "PASSENGERS".into(), "GROUND_TIME".into()],
            vec![
                vec![1.0, 0.42, -0.13],
                vec![0.42, 1.0, 0.27],
                vec![-0.13, 0.27, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn full_is_unchanged() {
        let m = sample();
        let MatrixView::Full(h) = slice(&m, &Selection::Full).unwrap() else { panic!("expected full view") };
        assert_eq!(h.row_labels, m.labels());
        assert_eq!(h.col_labels, m.labels());
        assert_eq!(h.cells, m.values());
        assert_eq!((h.zmin, h.zmax), (-1.0, 1.0));
    }

    #[test]
    fn feature_is_single_row() {
        let m = sample();
        let MatrixView::Row(h) = slice(&m, &Selection::Feature("PASSENGERS".into())).unwrap() else {
            panic!("expected row view")
        };
        assert_eq!(h.row_labels, vec!["PASSENGERS".to_string()]);
        assert_eq!(h.col_labels, m.labels());
        assert_eq!(h.cells, vec![vec![0.42, 1.0, 0.27]]);
        assert_eq!(m.get("PASSENGERS", "GROUND_TIME"), Some(0.27));
    }

    #[test]
    fn unknown_feature_not_found() {
        let err = slice(&sample(), &Selection::Feature("nonexistent".into())).unwrap_err();
        assert!(matches!(err, FlightLensError::NotFound(_)));
    }

    #[test]
    fn sentinel_parses_to_full() {
        assert_eq!(Selection::parse(FULL_MATRIX_LABEL), Selection::Full);
        assert_eq!(Selection::parse("DISTANCE"), Selection::Feature("DISTANCE".into()));
        assert_eq!(Selection::Full.label(), FULL_MATRIX_LABEL);
    }

    #[test]
    fn options_match_labels() {
        let opts = sample().selector_options();
        assert_eq!(opts[0], FULL_MATRIX_LABEL);
        assert_eq!(&opts[1..], sample().labels());
    }

    #[test]
    fn rejects_non_square() {
        let ragged = CorrelationMatrix::new(vec!["a".into(), "b".into()], vec![vec![1.0, 0.0], vec![0.0]]);
        assert!(matches!(ragged, Err(FlightLensError::InvalidArgument(_))));
        let short = CorrelationMatrix::new(vec!["a".into(), "b".into()], vec![vec![1.0, 0.0]]);
        assert!(short.is_err());
        let dup = CorrelationMatrix::new(vec!["a".into(), "a".into()], vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(dup.is_err());
    }

    #[test]
    fn titles() {
        let m = sample();
        assert_eq!(slice(&m, &Selection::Full).unwrap().title(), "Full Feature Correlation Matrix");
        assert_eq!(
            slice(&m, &Selection::Feature("DISTANCE".into())).unwrap().title(),
            "Correlation Heatmap for DISTANCE"
        );
    }
}
