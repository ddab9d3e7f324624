//! Day-bucketed series for the node count and block height charts

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::error::PanelError;
use crate::models::{BlockchainBlock, BlockchainBlockData, BlockchainNode};

/// `Jan 1, 2024`
pub const DATE_FORMAT: &str = "%b %-d, %Y";
pub const DEFAULT_DAYS: u32 = 7;
pub const MAX_PERIOD_DAYS: u32 = 366;
/// Axis upper bound used when a pane has nothing to plot
pub const EMPTY_Y_MAX: u64 = 500;

const NAIVE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const BAR_WIDTH: u64 = 40;

/// Inclusive range of calendar days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub name: String,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PanelError> {
        if start > end {
            return Err(PanelError::InvalidPeriod {
                start: format_day(start),
                end: format_day(end),
            });
        }
        let days = (end - start).num_days() + 1;
        if days > i64::from(MAX_PERIOD_DAYS) {
            return Err(PanelError::PeriodTooLong {
                days,
                max: MAX_PERIOD_DAYS,
            });
        }
        Ok(Self {
            start,
            end,
            name: format!("{} - {}", format_day(start), format_day(end)),
        })
    }

    /// The `days` calendar days ending with `today`
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        let days = days.max(1);
        Self {
            start: today - Duration::days(i64::from(days) - 1),
            end: today,
            name: format!("Last {} days", days),
        }
    }

    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartPoint {
    pub date: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<u64>,
}

impl ChartPoint {
    fn zero(day: NaiveDate) -> Self {
        Self {
            date: format_day(day),
            count: 0,
            blocks: None,
        }
    }
}

/// Which labeled values a chart shows when hovering a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TooltipExtra {
    NodeCount,
    BlockCount,
    None,
}

impl TooltipExtra {
    pub fn entries(&self, point: &ChartPoint) -> Vec<(&'static str, u64)> {
        match self {
            TooltipExtra::NodeCount => vec![("Nodes", point.count)],
            TooltipExtra::BlockCount => vec![("Blocks", point.blocks.unwrap_or(0))],
            TooltipExtra::None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartSeries {
    pub data: Vec<ChartPoint>,
    pub tooltip: TooltipExtra,
}

/// One chart with its display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartPane {
    pub title: String,
    pub explanation: String,
    pub time_period: String,
    pub series: ChartSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_max: Option<u64>,
}

impl ChartPane {
    fn new(title: &str, explanation: &str, time_period: &str, series: ChartSeries) -> Self {
        let empty = series.data.iter().all(|p| p.count == 0);
        Self {
            title: title.to_string(),
            explanation: explanation.to_string(),
            time_period: time_period.to_string(),
            series,
            y_max: empty.then_some(EMPTY_Y_MAX),
        }
    }
}

/// Both panes of the network chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BlockChart {
    pub title: String,
    pub node_amount: ChartPane,
    pub block_height: ChartPane,
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Calendar day of a block's save time in the given offset. Naive
/// timestamps are taken to be in that offset already.
pub fn save_day(save_time: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let save_time = save_time.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(save_time) {
        return Some(dt.with_timezone(&offset).date_naive());
    }
    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(save_time, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(save_time, "%Y-%m-%d").ok())
}

/// `days` points ending with `today`. Only the roster size is known, so it
/// is plotted on the last day and every earlier day is zero.
pub fn node_count_series(roster_len: usize, days: u32, today: NaiveDate) -> Vec<ChartPoint> {
    let days = days.max(1);
    (0..days)
        .map(|index| {
            let day = today - Duration::days(i64::from(days - 1 - index));
            let mut point = ChartPoint::zero(day);
            if index == days - 1 {
                point.count = roster_len as u64;
            }
            point
        })
        .collect()
}

/// One point per day present in `blocks`: `count` is the highest block
/// number saved that day, `blocks` the number of records.
pub fn block_height_series(blocks: &[BlockchainBlock], offset: FixedOffset) -> Vec<ChartPoint> {
    let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for block in blocks {
        let Some(day) = save_day(&block.save_time, offset) else {
            tracing::warn!(
                "Skipping block {} with unreadable save time {:?}",
                block.block_num,
                block.save_time
            );
            continue;
        };
        let entry = by_day.entry(day).or_insert((0, 0));
        entry.0 = entry.0.max(block.block_num);
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(day, (height, count))| ChartPoint {
            date: format_day(day),
            count: height,
            blocks: Some(count),
        })
        .collect()
}

/// Zero-filled series covering every day of `period`
pub fn placeholder_series(period: &Period) -> Vec<ChartPoint> {
    (0..period.days())
        .map(|index| ChartPoint::zero(period.start + Duration::days(i64::from(index))))
        .collect()
}

/// Assemble both panes. A missing or empty block page falls back to the
/// zero-filled placeholder over the period.
pub fn build_block_chart(
    roster: &[BlockchainNode],
    blocks: Option<&BlockchainBlockData>,
    period: Option<&Period>,
    today: NaiveDate,
    offset: FixedOffset,
) -> BlockChart {
    let period = period
        .cloned()
        .unwrap_or_else(|| Period::last_days(DEFAULT_DAYS, today));

    let nodes = ChartSeries {
        data: node_count_series(roster.len(), period.days(), today),
        tooltip: TooltipExtra::NodeCount,
    };

    let heights = blocks
        .map(|page| block_height_series(&page.blocks, offset))
        .filter(|series| !series.is_empty());
    let heights = match heights {
        Some(data) => ChartSeries {
            data,
            tooltip: TooltipExtra::BlockCount,
        },
        None => ChartSeries {
            data: placeholder_series(&period),
            tooltip: TooltipExtra::None,
        },
    };

    BlockChart {
        title: "Network overview".to_string(),
        node_amount: ChartPane::new(
            "Node amount",
            "Number of peer nodes in the network",
            &period.name,
            nodes,
        ),
        block_height: ChartPane::new(
            "Block height",
            "Highest block saved each day",
            &period.name,
            heights,
        ),
    }
}

impl fmt::Display for ChartPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.time_period)?;
        writeln!(f, "  {}", self.explanation)?;

        let top = self
            .y_max
            .unwrap_or_else(|| self.series.data.iter().map(|p| p.count).max().unwrap_or(0))
            .max(1);
        let width = self.series.data.iter().map(|p| p.date.len()).max().unwrap_or(0);

        for point in &self.series.data {
            let bar = "#".repeat((point.count * BAR_WIDTH / top) as usize);
            write!(
                f,
                "  {:<width$} | {:<bar_width$} {}",
                point.date,
                bar,
                point.count,
                width = width,
                bar_width = BAR_WIDTH as usize
            )?;
            for (label, value) in self.series.tooltip.entries(point) {
                write!(f, "  {}: {}", label, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{}", self.node_amount)?;
        write!(f, "{}", self.block_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn block(num: u64, save_time: &str) -> BlockchainBlock {
        BlockchainBlock {
            block_num: num,
            save_time: save_time.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_node_series_length_and_last_point() {
        let today = day(2024, 3, 10);
        let period = Period::new(day(2024, 3, 1), day(2024, 3, 10)).unwrap();
        let series = node_count_series(3, period.days(), today);

        assert_eq!(series.len(), 10);
        assert!(series[..9].iter().all(|p| p.count == 0));
        assert_eq!(series[9].count, 3);
        assert_eq!(series[9].date, "Mar 10, 2024");
        assert_eq!(series[0].date, "Mar 1, 2024");
    }

    #[test]
    fn test_node_series_empty_roster_is_zero_filled() {
        let series = node_count_series(0, DEFAULT_DAYS, day(2024, 1, 7));
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_single_day_period() {
        let period = Period::new(day(2024, 5, 5), day(2024, 5, 5)).unwrap();
        assert_eq!(period.days(), 1);
        assert_eq!(node_count_series(4, period.days(), day(2024, 5, 5)), vec![ChartPoint {
            date: "May 5, 2024".into(),
            count: 4,
            blocks: None,
        }]);
    }

    #[test]
    fn test_reversed_period_rejected() {
        let err = Period::new(day(2024, 5, 6), day(2024, 5, 5)).unwrap_err();
        assert!(matches!(err, PanelError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_period_length_is_capped() {
        let year = Period::new(day(2024, 1, 1), day(2024, 12, 31)).unwrap();
        assert_eq!(year.days(), MAX_PERIOD_DAYS);

        let err = Period::new(day(2024, 1, 1), day(2025, 1, 1)).unwrap_err();
        assert_eq!(err, PanelError::PeriodTooLong { days: 367, max: MAX_PERIOD_DAYS });
        assert!(Period::new(day(1, 1, 1), day(9999, 12, 31)).is_err());
    }

    #[test]
    fn test_block_series_example() {
        let blocks = vec![
            block(5, "2024-01-01T10:00:00Z"),
            block(7, "2024-01-01T18:00:00Z"),
            block(6, "2024-01-02T09:00:00Z"),
        ];
        let series = block_height_series(&blocks, utc());
        assert_eq!(
            series,
            vec![
                ChartPoint { date: "Jan 1, 2024".into(), count: 7, blocks: Some(2) },
                ChartPoint { date: "Jan 2, 2024".into(), count: 6, blocks: Some(1) },
            ]
        );
    }

    #[test]
    fn test_block_series_orders_by_date_not_label() {
        // "Dec 31, 2023" sorts after "Jan 1, 2024" as text
        let blocks = vec![
            block(20, "2024-01-01T00:30:00Z"),
            block(19, "2023-12-31T23:00:00Z"),
            block(30, "2024-02-10 08:00:00"),
        ];
        let dates: Vec<_> = block_height_series(&blocks, utc())
            .into_iter()
            .map(|p| p.date)
            .collect();
        assert_eq!(dates, vec!["Dec 31, 2023", "Jan 1, 2024", "Feb 10, 2024"]);
    }

    #[test]
    fn test_block_series_uses_offset_for_day_boundary() {
        let blocks = vec![block(1, "2024-01-01T18:00:00Z")];
        let east8 = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(block_height_series(&blocks, east8)[0].date, "Jan 2, 2024");
    }

    #[test]
    fn test_unreadable_save_time_skipped() {
        let blocks = vec![block(1, "yesterday"), block(2, "2024-01-01T00:00:00Z")];
        let series = block_height_series(&blocks, utc());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].blocks, Some(1));
    }

    #[test]
    fn test_empty_blocks_fall_back_to_placeholder() {
        let today = day(2024, 1, 7);
        let empty = BlockchainBlockData::default();

        for page in [None, Some(&empty)] {
            let chart = build_block_chart(&[], page, None, today, utc());
            let pane = &chart.block_height;
            assert_eq!(pane.series.data.len(), 7);
            assert!(pane.series.data.iter().all(|p| p.count == 0 && p.blocks.is_none()));
            assert_eq!(pane.series.data[0].date, "Jan 1, 2024");
            assert_eq!(pane.series.data[6].date, "Jan 7, 2024");
            assert_eq!(pane.series.tooltip, TooltipExtra::None);
            assert_eq!(pane.y_max, Some(EMPTY_Y_MAX));
            assert_eq!(pane.time_period, "Last 7 days");
        }
    }

    #[test]
    fn test_placeholder_spans_requested_period() {
        let period = Period::new(day(2024, 2, 27), day(2024, 3, 2)).unwrap();
        let chart = build_block_chart(&[], None, Some(&period), day(2024, 3, 2), utc());
        let dates: Vec<_> = chart.block_height.series.data.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["Feb 27, 2024", "Feb 28, 2024", "Feb 29, 2024", "Mar 1, 2024", "Mar 2, 2024"]);
        assert_eq!(chart.node_amount.series.data.len(), 5);
    }

    #[test]
    fn test_chart_with_data_has_no_axis_hint() {
        let roster = vec![BlockchainNode::default(), BlockchainNode::default()];
        let page = BlockchainBlockData {
            blocks: vec![block(9, "2024-01-07T01:00:00Z")],
            ..Default::default()
        };
        let chart = build_block_chart(&roster, Some(&page), None, day(2024, 1, 7), utc());

        assert_eq!(chart.node_amount.y_max, None);
        assert_eq!(chart.block_height.y_max, None);
        assert_eq!(chart.block_height.series.tooltip, TooltipExtra::BlockCount);
        let last = chart.node_amount.series.data.last().unwrap();
        assert_eq!(chart.node_amount.series.tooltip.entries(last), vec![("Nodes", 2)]);
    }

    #[test]
    fn test_identical_inputs_give_identical_charts() {
        let page = BlockchainBlockData {
            blocks: vec![block(3, "2024-01-05T01:00:00Z"), block(4, "2024-01-06T01:00:00Z")],
            ..Default::default()
        };
        let a = build_block_chart(&[], Some(&page), None, day(2024, 1, 7), utc());
        let b = build_block_chart(&[], Some(&page), None, day(2024, 1, 7), utc());
        assert_eq!(a, b);
    }

    #[test]
    fn test_pane_renders_tooltip_values() {
        let page = BlockchainBlockData {
            blocks: vec![block(5, "2024-01-01T10:00:00Z"), block(7, "2024-01-01T18:00:00Z")],
            ..Default::default()
        };
        let chart = build_block_chart(&[], Some(&page), None, day(2024, 1, 7), utc());
        let text = chart.block_height.to_string();
        assert!(text.contains("Jan 1, 2024"));
        assert!(text.contains("Blocks: 2"));
    }
}
