//! Bar-chart shaped output for ranked aggregates.
//!
//! Produces plain labels and series so any plotting front end can render it.

use serde::{Deserialize, Serialize};

use crate::models::Aggregate;

pub const LIGHT_FILL_COLORS: [&str; 7] = [
    "rgba(255, 99, 132, 0.2)",
    "rgba(255, 159, 64, 0.2)",
    "rgba(255, 205, 86, 0.2)",
    "rgba(75, 192, 192, 0.2)",
    "rgba(54, 162, 235, 0.2)",
    "rgba(153, 102, 255, 0.2)",
    "rgba(201, 203, 207, 0.2)",
];

pub const SOLID_FILL_COLORS: [&str; 7] = [
    "rgb(255, 99, 132)",
    "rgb(255, 159, 64)",
    "rgb(255, 205, 86)",
    "rgb(75, 192, 192)",
    "rgb(54, 162, 235)",
    "rgb(153, 102, 255)",
    "rgb(201, 203, 207)",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub background_colors: Vec<String>,
    pub border_colors: Vec<String>,
    pub border_width: u32,
}

impl ChartSeries {
    /// Overlay `style` on this series. Colour lists cycle across the bars;
    /// unset or empty entries keep the current values.
    pub fn apply_style(&mut self, style: &ChartStyle) {
        if let Some(width) = style.border_width {
            self.border_width = width;
        }
        if let Some(colors) = style.background_colors.as_deref() {
            if let Some(cycled) = cycle(colors, self.data.len()) {
                self.background_colors = cycled;
            }
        }
        if let Some(colors) = style.border_colors.as_deref() {
            if let Some(cycled) = cycle(colors, self.data.len()) {
                self.border_colors = cycled;
            }
        }
    }
}

/// Optional presentation overrides for a chart series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

impl BarChartData {
    pub fn with_style(mut self, style: &ChartStyle) -> Self {
        for series in &mut self.datasets {
            series.apply_style(style);
        }
        self
    }
}

fn cycle<S: AsRef<str>>(palette: &[S], len: usize) -> Option<Vec<String>> {
    if palette.is_empty() {
        return None;
    }
    Some(
        (0..len)
            .map(|index| palette[index % palette.len()].as_ref().to_string())
            .collect(),
    )
}

/// Shape aggregates into one labelled series, cycling the palettes per bar.
pub fn aggregate_to_bar_chart<K, L, V>(
    aggregates: &[Aggregate<K>],
    chart_label: &str,
    label_of: L,
    value_of: V,
) -> BarChartData
where
    L: Fn(&Aggregate<K>) -> String,
    V: Fn(&Aggregate<K>) -> f64,
{
    let labels = aggregates.iter().map(&label_of).collect();
    let data = aggregates.iter().map(&value_of).collect();
    let background_colors = cycle(&LIGHT_FILL_COLORS[..], aggregates.len()).unwrap_or_default();
    let border_colors = cycle(&SOLID_FILL_COLORS[..], aggregates.len()).unwrap_or_default();

    BarChartData {
        labels,
        datasets: vec![ChartSeries {
            label: chart_label.to_string(),
            data,
            background_colors,
            border_colors,
            border_width: 1,
        }],
    }
}

/// Time per key in minutes, labelled by the key itself.
pub fn minutes_chart(aggregates: &[Aggregate<String>], chart_label: &str) -> BarChartData {
    aggregate_to_bar_chart(
        aggregates,
        chart_label,
        |aggregate| aggregate.key.clone(),
        |aggregate| aggregate.total_time as f64 / 60_000.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_values() {
        let aggregates = vec![
            Aggregate::new("a".to_string(), 120_000),
            Aggregate::new("b".to_string(), 30_000),
        ];
        let chart = minutes_chart(&aggregates, "Minutes");

        assert_eq!(chart.labels, vec!["a", "b"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Minutes");
        assert_eq!(chart.datasets[0].data, vec![2.0, 0.5]);
        assert_eq!(chart.datasets[0].border_width, 1);
    }

    #[test]
    fn test_colors_cycle() {
        let aggregates: Vec<Aggregate<String>> = (0..9)
            .map(|i| Aggregate::new(format!("k{i}"), i))
            .collect();
        let chart = minutes_chart(&aggregates, "x");
        let series = &chart.datasets[0];

        assert_eq!(series.background_colors.len(), 9);
        assert_eq!(series.background_colors[7], LIGHT_FILL_COLORS[0]);
        assert_eq!(series.border_colors[8], SOLID_FILL_COLORS[1]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let chart = minutes_chart(&[Aggregate::new("a".to_string(), 60_000)], "m");
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json["datasets"][0].get("backgroundColors").is_some());
        assert_eq!(json["datasets"][0]["borderWidth"], 1);
    }

    #[test]
    fn test_style_overrides_series() {
        let aggregates: Vec<Aggregate<String>> = (0..3)
            .map(|i| Aggregate::new(format!("k{i}"), i * 60_000))
            .collect();
        let style: ChartStyle =
            serde_json::from_str(r##"{"borderWidth": 3, "borderColors": ["#000", "#fff"]}"##)
                .unwrap();

        let chart = minutes_chart(&aggregates, "m").with_style(&style);
        let series = &chart.datasets[0];

        assert_eq!(series.border_width, 3);
        assert_eq!(series.border_colors, vec!["#000", "#fff", "#000"]);
        // Untouched fields keep the default palette.
        assert_eq!(series.background_colors[2], LIGHT_FILL_COLORS[2]);
        assert_eq!(series.data, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_style_changes_nothing() {
        let aggregates = vec![Aggregate::new("a".to_string(), 60_000)];
        let plain = minutes_chart(&aggregates, "m");

        let empty = ChartStyle {
            background_colors: Some(Vec::new()),
            ..ChartStyle::default()
        };
        assert_eq!(plain.clone().with_style(&empty), plain);
        assert_eq!(serde_json::to_value(ChartStyle::default()).unwrap(), serde_json::json!({}));
    }
}
