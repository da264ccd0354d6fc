//! # Dashboard Rendering
//!
//! The browser dashboard hands the series from [`crate::chart`] to a charting
//! library. Every redraw must dispose the previous chart on the same canvas
//! before drawing a new one, so chart handles live in a [`RendererSession`]
//! keyed by chart id rather than in a global registry.
//!
//! For development the same series can be drawn to the terminal with the
//! ASCII charts in this module.

use crate::chart::{CarouselButton, DayChart, TideChart};
use std::collections::HashMap;

/// A live chart that holds resources until disposed.
pub trait Chart {
    fn dispose(&mut self);
}

/// Owns the charts currently on screen.
pub struct RendererSession<C: Chart> {
    charts: HashMap<String, C>,
}

impl<C: Chart> Default for RendererSession<C> {
    fn default() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }
}

impl<C: Chart> RendererSession<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `chart` under `id`, disposing whatever was there before.
    pub fn replace(&mut self, id: impl Into<String>, chart: C) {
        if let Some(mut previous) = self.charts.insert(id.into(), chart) {
            previous.dispose();
        }
    }

    pub fn get(&self, id: &str) -> Option<&C> {
        self.charts.get(id)
    }

    /// Dispose and forget one chart. Returns false if nothing was drawn under `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.charts.remove(id) {
            Some(mut chart) => {
                chart.dispose();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl<C: Chart> Drop for RendererSession<C> {
    fn drop(&mut self) {
        for chart in self.charts.values_mut() {
            chart.dispose();
        }
    }
}

/// A chart rendered to lines of terminal text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsciiChart {
    pub title: String,
    pub lines: Vec<String>,
}

impl AsciiChart {
    pub fn print(&self) {
        println!("{}", self.title);
        for line in &self.lines {
            println!("{line}");
        }
        println!();
    }
}

impl Chart for AsciiChart {
    fn dispose(&mut self) {
        self.lines.clear();
    }
}

const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "█".repeat(filled)
}

fn placeholder(title: &str, message: &str) -> AsciiChart {
    AsciiChart {
        title: title.to_string(),
        lines: vec![format!("  ({message})")],
    }
}

/// Day selector: one line per day with its peak score.
pub fn draw_carousel(buttons: &[CarouselButton], selected: &str) -> AsciiChart {
    if buttons.is_empty() {
        return placeholder("Days", "weather data unavailable");
    }
    let lines = buttons
        .iter()
        .map(|b| {
            let marker = if b.key == selected { '>' } else { ' ' };
            format!("{marker} {:<7} {:>2}/10 {}", b.label, b.peak, bar(b.peak.into(), 10.0))
        })
        .collect();
    AsciiChart {
        title: "Days".to_string(),
        lines,
    }
}

/// Hour-by-hour playability with the main weather values.
pub fn draw_day(chart: &DayChart) -> AsciiChart {
    let title = "Temperature & Playability";
    if chart.is_empty() {
        return placeholder(title, "no hours for this day");
    }

    let value = |v: Option<f64>, precision: usize| match v {
        Some(v) => format!("{v:>5.precision$}"),
        None => "    -".to_string(),
    };

    let mut lines = vec!["  hour  score   °C  km/h  rain  hum%".to_string()];
    for i in 0..chart.labels.len() {
        lines.push(format!(
            "  {} {:>5} {} {} {} {}  {}",
            chart.labels[i],
            chart.score[i],
            value(chart.temp[i], 1),
            value(chart.wind_speed[i], 1),
            value(chart.rain_mm[i], 1),
            value(chart.humidity[i], 0),
            bar(chart.score[i].into(), 10.0),
        ));
    }
    AsciiChart {
        title: title.to_string(),
        lines,
    }
}

/// Tide curve as a character grid, high water at the top.
pub fn draw_tide(chart: &TideChart) -> AsciiChart {
    const ROWS: usize = 12;
    const Y_AXIS_WIDTH: usize = 6;
    let title = "Tide Levels (High/Low)";

    if chart.is_empty() {
        return placeholder(title, "no tide data for this day");
    }

    let (min, max) = chart
        .heights
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &h| {
            (min.min(h), max.max(h))
        });
    let range = (max - min).max(f64::EPSILON);
    let to_row = |h: f64| (((max - h) / range) * (ROWS as f64 - 1.0)).round() as usize;

    // One column per hour of the 15-minute curve
    let columns: Vec<usize> = (0..chart.heights.len()).step_by(4).collect();
    let mut grid = vec![vec![' '; columns.len() + Y_AXIS_WIDTH]; ROWS];

    for (row, label) in [(0, max), (ROWS - 1, min)] {
        for (i, ch) in format!("{label:>4.1}m").chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
    }
    for line in grid.iter_mut() {
        line[Y_AXIS_WIDTH - 1] = '│';
    }
    for (col, &i) in columns.iter().enumerate() {
        grid[to_row(chart.heights[i])][col + Y_AXIS_WIDTH] = '•';
    }

    let mut lines: Vec<String> = grid.into_iter().map(|r| r.into_iter().collect()).collect();
    let first = chart.labels.first().map(String::as_str).unwrap_or("");
    let last = chart.labels.last().map(String::as_str).unwrap_or("");
    lines.push(format!(
        "{}{first:<width$}{last}",
        " ".repeat(Y_AXIS_WIDTH),
        width = columns.len().saturating_sub(last.len()),
    ));

    AsciiChart {
        title: title.to_string(),
        lines,
    }
}

/// Typical busyness per hour of the selected weekday.
pub fn draw_busyness(hours: Option<&[u8]>) -> AsciiChart {
    let title = "Estimated Busyness";
    let Some(hours) = hours else {
        return placeholder(title, "busyness data unavailable");
    };
    let lines = hours
        .iter()
        .enumerate()
        .map(|(hour, &pct)| format!("  {hour:02}:00 {pct:>3}% {}", bar(pct.into(), 100.0)))
        .collect();
    AsciiChart {
        title: title.to_string(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records disposals in a shared log.
    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Chart for Tracked {
        fn dispose(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    #[test]
    fn replace_disposes_previous_chart() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = RendererSession::new();

        session.replace("tideChart", Tracked { name: "first", log: log.clone() });
        assert!(log.borrow().is_empty());

        session.replace("tideChart", Tracked { name: "second", log: log.clone() });
        assert_eq!(*log.borrow(), ["first"]);
        assert_eq!(session.len(), 1);
        assert_eq!(session.get("tideChart").unwrap().name, "second");
    }

    #[test]
    fn dropping_session_disposes_everything() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut session = RendererSession::new();
            session.replace("a", Tracked { name: "a", log: log.clone() });
            session.replace("b", Tracked { name: "b", log: log.clone() });
            assert!(session.remove("a"));
            assert!(!session.remove("missing"));
        }
        let mut disposed = log.borrow().clone();
        disposed.sort();
        assert_eq!(disposed, ["a", "b"]);
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        assert_eq!(draw_day(&DayChart::default()).lines.len(), 1);
        assert_eq!(draw_tide(&TideChart::default()).lines.len(), 1);
        assert!(draw_busyness(None).lines[0].contains("unavailable"));
        assert!(draw_carousel(&[], "2025-01-16").lines[0].contains("unavailable"));
    }

    #[test]
    fn tide_grid_marks_extremes() {
        let chart = TideChart {
            labels: (0..9).map(|i| format!("{:02}:00", i)).collect(),
            heights: vec![0.0, 0.1, 0.2, 0.3, 1.0, 0.3, 0.2, 0.1, 0.0],
        };
        let drawn = draw_tide(&chart);

        // 12 grid rows plus the time axis
        assert_eq!(drawn.lines.len(), 13);
        assert!(drawn.lines[0].contains('•'));
        assert!(drawn.lines[11].contains('•'));
    }

    #[test]
    fn carousel_marks_selected_day() {
        let buttons = vec![
            CarouselButton { key: "2025-01-16".into(), label: "Thu 16".into(), peak: 9 },
            CarouselButton { key: "2025-01-17".into(), label: "Fri 17".into(), peak: 3 },
        ];
        let drawn = draw_carousel(&buttons, "2025-01-17");
        assert!(drawn.lines[0].starts_with(' '));
        assert!(drawn.lines[1].starts_with('>'));
    }
}
