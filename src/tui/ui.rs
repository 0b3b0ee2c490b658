use super::app::App;
use chrono::{TimeZone, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header (single line, no border)
            Constraint::Min(10),   // Chart
            Constraint::Length(1), // Footer (single line, no border)
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    app.set_chart_area(chunks[1]);
    render_chart(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.last_error().is_some() {
        Span::styled(" ERR ", Style::default().bg(Color::Red).fg(Color::White))
    } else if app.is_refreshing() {
        Span::styled(
            " REFRESH ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        )
    } else {
        Span::styled(" LIVE ", Style::default().bg(Color::Green).fg(Color::Black))
    };

    let latest = match &app.model().latest {
        Some(reading) => format!(" {:.1} °C │ {} UTC", reading.value, reading.formatted),
        None => " no reading today (UTC)".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            "tempwatch",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        status,
        Span::raw(latest),
        Span::raw(format!(" │ [{}]", app.window_label())),
    ];

    if let Some(message) = app.last_error() {
        spans.push(Span::styled(
            format!("  {message}"),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Temperature [{}] ", app.window_label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if app.is_latest_only() {
        let message = Paragraph::new("Latest-only mode: pass a valid --period (e.g. 1d) to chart history")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let model = app.model();
    let Some((x_min, x_max)) = model.x_range else {
        frame.render_widget(block, area);
        return;
    };

    if model.series.is_empty() {
        let message = Paragraph::new("No samples in window")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let mut data: Vec<(f64, f64)> = model
        .series
        .iter()
        .map(|p| (p.x as f64, p.y))
        .collect();
    data.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (y_min, y_max) = y_bounds(&data);

    let window_len = x_max.saturating_sub(x_min);
    let x_labels = vec![
        Span::raw(format_axis_time(x_min, window_len)),
        Span::raw(format_axis_time((x_min + x_max) / 2, window_len)),
        Span::raw(format_axis_time(x_max, window_len)),
    ];
    let y_labels = vec![
        Span::raw(format!("{y_min:.1}°")),
        Span::raw(format!("{:.1}°", (y_min + y_max) / 2.0)),
        Span::raw(format!("{y_max:.1}°")),
    ];

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min as f64, x_max as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hint = |key: &str| {
        Span::styled(
            format!(" {key} "),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    };

    let mut spans = vec![
        hint("q"),
        Span::raw(" quit "),
        hint("r"),
        Span::raw(" refresh "),
    ];
    if !app.is_latest_only() {
        spans.extend([
            hint("←/→"),
            Span::raw(" pan "),
            hint("+/-"),
            Span::raw(" zoom "),
            hint("space"),
            Span::raw(" follow "),
        ]);
    } else {
        spans.extend([hint("+"), Span::raw(" chart history ")]);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Pad the observed value range so the trace does not hug the frame. A flat
/// series still gets a visible band.
fn y_bounds(data: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, y) in data {
        min = min.min(y);
        max = max.max(y);
    }
    let pad = ((max - min) * 0.1).max(0.5);
    (min - pad, max + pad)
}

/// Time-of-day labels for short windows, dates for long ones.
fn format_axis_time(epoch: i64, window_len: i64) -> String {
    let Some(dt) = Utc.timestamp_opt(epoch, 0).single() else {
        return epoch.to_string();
    };
    if window_len > 120 * 86_400 {
        dt.format("%Y-%m").to_string()
    } else if window_len > 2 * 86_400 {
        dt.format("%m-%d").to_string()
    } else {
        dt.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_still_gets_a_visible_band() {
        let data = vec![(0.0, 21.0), (300.0, 21.0)];
        let (min, max) = y_bounds(&data);
        assert!(min < 21.0 && max > 21.0);
    }

    #[test]
    fn axis_labels_scale_with_the_window() {
        let epoch = 1_552_000_000; // 2019-03-07 23:06:40 UTC
        assert_eq!(format_axis_time(epoch, 3_600), "23:06");
        assert_eq!(format_axis_time(epoch, 7 * 86_400), "03-07");
        assert_eq!(format_axis_time(epoch, 365 * 86_400), "2019-03");
    }
}
