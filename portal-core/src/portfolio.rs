use crate::config::Tone;
use crate::dto::{HoldingDto, PortfolioDto};

impl PortfolioDto {
    /// Today's change in currency units, estimated from each holding's value
    /// and percentage move.
    pub fn estimated_change(&self) -> f64 {
        self.holdings
            .iter()
            .map(|h| h.value.unwrap_or(0.0) * h.change_percent.unwrap_or(0.0) / 100.0)
            .sum()
    }

    pub fn currency_or_default(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("USD")
    }
}

impl HoldingDto {
    pub fn is_up(&self) -> bool {
        self.change_percent.unwrap_or(0.0) >= 0.0
    }

    pub fn change_tone(&self) -> Tone {
        if self.is_up() {
            Tone::Green
        } else {
            Tone::Red
        }
    }

    /// `▲ 1.25%` / `▼ 0.40%`.
    pub fn change_label(&self) -> String {
        let pct = self.change_percent.unwrap_or(0.0);
        let arrow = if self.is_up() { "▲" } else { "▼" };
        format!("{arrow} {:.2}%", pct.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(value: f64, change: f64) -> HoldingDto {
        HoldingDto {
            symbol: "X".into(),
            value: Some(value),
            change_percent: Some(change),
            ..HoldingDto::default()
        }
    }

    #[test]
    fn change_is_value_weighted() {
        let portfolio = PortfolioDto {
            holdings: vec![holding(10_000.0, 2.0), holding(5_000.0, -4.0)],
            ..PortfolioDto::default()
        };
        assert_eq!(portfolio.estimated_change(), 0.0);
        assert_eq!(portfolio.currency_or_default(), "USD");
    }

    #[test]
    fn change_label_has_direction() {
        assert_eq!(holding(1.0, 1.254).change_label(), "▲ 1.25%");
        assert_eq!(holding(1.0, -0.4).change_label(), "▼ 0.40%");
        assert_eq!(holding(1.0, -0.4).change_tone(), Tone::Red);
    }
}
