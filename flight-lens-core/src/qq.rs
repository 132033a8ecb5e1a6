use flight_lens_common::{FlightLensError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Exp, Laplace, Normal, Uniform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Normal,
    Exponential,
    Logistic,
    Uniform,
    Laplace,
    Gumbel,
}

impl Distribution {
    pub const ALL: [Distribution; 6] = [
        Distribution::Normal,
        Distribution::Exponential,
        Distribution::Logistic,
        Distribution::Uniform,
        Distribution::Laplace,
        Distribution::Gumbel,
    ];

    /// short name as used by the selector (`norm`, `expon`, ...)
    pub fn code(self) -> &'static str {
        match self {
            Distribution::Normal => "norm",
            Distribution::Exponential => "expon",
            Distribution::Logistic => "logistic",
            Distribution::Uniform => "uniform",
            Distribution::Laplace => "laplace",
            Distribution::Gumbel => "gumbel_r",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Normal => "Normal",
            Distribution::Exponential => "Exponential",
            Distribution::Logistic => "Logistic",
            Distribution::Uniform => "Uniform",
            Distribution::Laplace => "Laplace",
            Distribution::Gumbel => "Gumbel",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.code() == lower || d.display_name().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| {
                FlightLensError::InvalidArgument(format!(
                    "unknown distribution '{s}' (use norm, expon, logistic, uniform, laplace or gumbel_r)"
                ))
            })
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Quantile function of the standard form (loc 0, scale 1), `p` in (0, 1).
    pub fn ppf(self, p: f64) -> Result<f64> {
        let stat_err = |e: &dyn std::fmt::Display| FlightLensError::Other(format!("{}: {e}", self.code()));
        let q = match self {
            Distribution::Normal => Normal::new(0.0, 1.0).map_err(|e| stat_err(&e))?.inverse_cdf(p),
            Distribution::Exponential => Exp::new(1.0).map_err(|e| stat_err(&e))?.inverse_cdf(p),
            Distribution::Uniform => Uniform::new(0.0, 1.0).map_err(|e| stat_err(&e))?.inverse_cdf(p),
            Distribution::Laplace => Laplace::new(0.0, 1.0).map_err(|e| stat_err(&e))?.inverse_cdf(p),
            Distribution::Logistic => (p / (1.0 - p)).ln(),
            Distribution::Gumbel => -(-p.ln()).ln(),
        };
        Ok(q)
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QqPlot {
    pub distribution: Distribution,
    pub theoretical: Vec<f64>,
    pub ordered: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
}

impl QqPlot {
    pub fn title(&self) -> String {
        format!(
            "QQ Plot of Log-Transformed GROUND_TIME Against {} Distribution",
            self.distribution.display_name()
        )
    }
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.theoretical.iter().copied().zip(self.ordered.iter().copied()).collect()
    }
    /// end points of the fitted line over the theoretical range
    pub fn fit_line(&self) -> [(f64, f64); 2] {
        let x0 = self.theoretical.first().copied().unwrap_or(0.0);
        let x1 = self.theoretical.last().copied().unwrap_or(0.0);
        [(x0, self.intercept + self.slope * x0), (x1, self.intercept + self.slope * x1)]
    }
}

/// Filliben's estimate of the uniform order statistic medians.
pub fn order_statistic_medians(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let nf = n as f64;
    let last = 0.5f64.powf(1.0 / nf);
    let mut v: Vec<f64> = (1..=n).map(|i| (i as f64 - 0.3175) / (nf + 0.365)).collect();
    v[n - 1] = last;
    v[0] = 1.0 - last;
    v
}

pub fn probplot(samples: &[f64], distribution: Distribution) -> Result<QqPlot> {
    let mut ordered: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if ordered.len() < 2 {
        return Err(FlightLensError::InvalidArgument(format!(
            "QQ plot needs at least 2 finite samples, got {}",
            ordered.len()
        )));
    }
    ordered.sort_by(|a, b| a.total_cmp(b));
    let theoretical = order_statistic_medians(ordered.len())
        .into_iter()
        .map(|p| distribution.ppf(p))
        .collect::<Result<Vec<f64>>>()?;
    let (slope, intercept, r) = least_squares(&theoretical, &ordered);
    Ok(QqPlot { distribution, theoretical, ordered, slope, intercept, r })
}

/// (slope, intercept, r); r is 0 when either side has no spread
fn least_squares(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
        sxy += (a - mx) * (b - my);
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let r = if sxx > 0.0 && syy > 0.0 { sxy / (sxx * syy).sqrt() } else { 0.0 };
    (slope, my - slope * mx, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medians_match_filliben() {
        let m = order_statistic_medians(5);
        let last = 0.5f64.powf(0.2);
        assert!((m[4] - last).abs() < 1e-12);
        assert!((m[0] - (1.0 - last)).abs() < 1e-12);
        assert!((m[2] - (3.0 - 0.3175) / 5.365).abs() < 1e-12);
        assert!(m.windows(2).all(|w| w[0] < w[1]));
        assert!(order_statistic_medians(0).is_empty());
        assert_eq!(order_statistic_medians(1), vec![0.5]);
    }

    #[test]
    fn quantile_functions() {
        assert!((Distribution::Normal.ppf(0.975).unwrap() - 1.959964).abs() < 1e-4);
        assert!((Distribution::Exponential.ppf(0.5).unwrap() - 2f64.ln()).abs() < 1e-4);
        assert!((Distribution::Uniform.ppf(0.3).unwrap() - 0.3).abs() < 1e-4);
        assert!((Distribution::Laplace.ppf(0.75).unwrap() - 2f64.ln()).abs() < 1e-4);
        assert!(Distribution::Logistic.ppf(0.5).unwrap().abs() < 1e-12);
        assert!((Distribution::Gumbel.ppf((-1f64).exp()).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn exact_fit_on_scaled_quantiles() {
        let n = 40;
        let samples: Vec<f64> = order_statistic_medians(n)
            .into_iter()
            .map(|p| 3.0 + 2.0 * Distribution::Logistic.ppf(p).unwrap())
            .rev()
            .collect();
        let qq = probplot(&samples, Distribution::Logistic).unwrap();
        assert!((qq.slope - 2.0).abs() < 1e-9);
        assert!((qq.intercept - 3.0).abs() < 1e-9);
        assert!((qq.r - 1.0).abs() < 1e-12);
        assert!(qq.ordered.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(qq.points().len(), n);
    }

    #[test]
    fn too_few_samples() {
        assert!(matches!(probplot(&[1.0], Distribution::Normal), Err(FlightLensError::InvalidArgument(_))));
        assert!(probplot(&[1.0, f64::NAN], Distribution::Normal).is_err());
    }

    #[test]
    fn constant_samples_have_zero_r() {
        let qq = probplot(&[4.0, 4.0, 4.0], Distribution::Normal).unwrap();
        assert_eq!(qq.slope, 0.0);
        assert_eq!(qq.intercept, 4.0);
        assert_eq!(qq.r, 0.0);
    }

    #[test]
    fn parse_and_cycle() {
        assert_eq!(Distribution::parse("gumbel_r").unwrap(), Distribution::Gumbel);
        assert_eq!(Distribution::parse("Normal").unwrap(), Distribution::Normal);
        assert!(Distribution::parse("cauchy").is_err());
        assert_eq!(Distribution::Gumbel.next(), Distribution::Normal);
        assert_eq!(Distribution::Normal.to_string(), "norm");
    }
}
