use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Cell, Clear, Paragraph, Row, Table};

use crate::tui::app::{App, ChartView, FormField, InputMode};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 12 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);

    let body = Layout::horizontal([Constraint::Length(44), Constraint::Fill(1)]).split(chunks[1]);
    render_form(frame, body[0], app);
    render_results(frame, body[1], app);

    render_status_bar(frame, chunks[2], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Editing => render_edit_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let total = format!("Total: {:.1} MD", app.estimator.breakdown().total_md);
    let left = "MD Estimator";
    let padding = (area.width as usize).saturating_sub(left.len() + total.len());

    let title = Line::from(vec![
        Span::styled(left, Style::default().fg(app.theme.title_color).bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(total, app.theme.total_style),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = FormField::ALL
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = field_display(app, *field);
            let row_style = if idx == app.selected {
                app.theme.row_selected
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(field.label()),
                Cell::from(value).style(Style::default().fg(app.theme.value_color)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [Constraint::Length(27), Constraint::Fill(1)];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Parameter", "Value"])
                .style(app.theme.header_style)
                .bottom_margin(1),
        )
        .block(Block::bordered().title(" Project Parameters "));

    frame.render_widget(table, area);
}

// Display text for a form row. The QA row doubles as the percentage slider
// while auto-QA is on.
fn field_display(app: &App, field: FormField) -> String {
    match field {
        FormField::Qa if app.estimator.auto_qa().enabled => {
            format!(
                "{}% of Dev = {} MD",
                app.estimator.auto_qa().percentage,
                app.estimator.inputs().qa
            )
        }
        FormField::Qa => format!("{} MD", app.estimator.inputs().qa),
        FormField::Dev | FormField::Arch | FormField::Pm => {
            format!("{} MD", app.field_value(field))
        }
        _ => format!("{}", app.field_value(field)),
    }
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(area);
    render_summary(frame, chunks[0], app);
    match app.chart_view {
        ChartView::Share => render_share_chart(frame, chunks[1], app),
        ChartView::Bars => render_bar_chart(frame, chunks[1], app),
    }
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let breakdown = app.estimator.breakdown();
    let label_style = Style::default().fg(app.theme.muted);

    let lines = vec![
        Line::from(vec![
            Span::styled("Base MD        ", label_style),
            Span::raw(format!("{:>7.1}", breakdown.base_md)),
        ]),
        Line::from(vec![
            Span::styled("Core Effort    ", label_style),
            Span::raw(format!("{:>7.1}", breakdown.core_effort)),
        ]),
        Line::from(vec![
            Span::styled("Total Buffers  ", label_style),
            Span::raw(format!("{:>7.1}", breakdown.total_buffers)),
        ]),
        Line::from(vec![
            Span::styled("Total MD       ", label_style),
            Span::styled(format!("{:>7.1}", breakdown.total_md), app.theme.total_style),
        ]),
    ];

    let summary =
        Paragraph::new(lines).block(Block::bordered().title(" Estimation Results "));
    frame.render_widget(summary, area);
}

// Indexed categories with zero values dropped; the index keeps each category
// tied to its fixed theme color across both chart views.
fn indexed_series(app: &App) -> Vec<(usize, &'static str, f64)> {
    app.estimator
        .breakdown()
        .categories()
        .into_iter()
        .enumerate()
        .filter(|(_, (_, value))| *value > 0.0)
        .map(|(idx, (label, value))| (idx, label, value))
        .collect()
}

fn render_share_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered().title(" Effort Distribution [share] ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let series = indexed_series(app);
    if series.is_empty() {
        let empty = Paragraph::new("Nothing to estimate yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let total = app.estimator.breakdown().total_md;
    let label_width = 22;
    let bar_width = (inner.width as usize).saturating_sub(label_width + 18).min(30);

    let lines: Vec<Line> = series
        .iter()
        .map(|(idx, label, value)| {
            let share = if total > 0.0 { value / total } else { 0.0 };
            let filled = (share * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let color = app.theme.category_color(*idx);

            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{:<width$}", label, width = label_width)),
                Span::raw(format!("{:>6.1} MD ", value)),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled("░".repeat(empty), Style::default().fg(app.theme.bar_empty)),
                Span::styled(
                    format!(" {:>4.0}%", share * 100.0),
                    Style::default().fg(app.theme.muted),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered().title(" Effort Distribution [bars] ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let series = indexed_series(app);
    if series.is_empty() {
        let empty = Paragraph::new("Nothing to estimate yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let bars: Vec<Bar> = series
        .iter()
        .map(|(idx, label, value)| {
            // BarChart wants integers; scale by 10 to keep one decimal of
            // resolution and print the real value on the bar
            Bar::default()
                .value((value * 10.0).round() as u64)
                .text_value(format!("{:.1}", value))
                .label(Line::from(short_label(label)))
                .style(Style::default().fg(app.theme.category_color(*idx)))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2);

    frame.render_widget(chart, inner);
}

fn short_label(label: &str) -> &'static str {
    match label {
        "Development" => "Dev",
        "QA" => "QA",
        "Arch/Research" => "Arch",
        "PM/BA/Management" => "PM",
        "Risk Buffer" => "Risk",
        "Communication Buffer" => "Comm",
        _ => "?",
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Export failed") {
            app.theme.flash_error
        } else {
            app.theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("j/k", ":nav "),
            ("h/l", ":adjust "),
            ("Enter", ":edit "),
            ("a", ":auto-QA "),
            ("c", ":chart "),
            ("e", ":export "),
            ("r", ":reset "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = Vec::new();
        for (key, label) in hints {
            spans.push(Span::styled(
                key,
                Style::default().fg(app.theme.status_key_color),
            ));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area,
    );
}

/// Render the field edit popup
fn render_edit_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(44, 5, frame.area());

    frame.render_widget(Clear, popup_area);

    let field = app.selected_field();
    let title = if field == FormField::Qa && app.estimator.auto_qa().enabled {
        " QA percentage of Dev ".to_string()
    } else {
        format!(" {} ", field.label())
    };
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);
    let chunks =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

    let input = Paragraph::new(format!("{}|", app.edit_buffer));
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("Enter: apply | Esc: cancel")
        .style(Style::default().fg(app.theme.muted));
    frame.render_widget(help, chunks[1]);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(52, 16, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let help_lines = vec![
        Line::from(vec![
            Span::styled("j / Down      ", key_style),
            Span::raw("Next field"),
        ]),
        Line::from(vec![
            Span::styled("k / Up        ", key_style),
            Span::raw("Previous field"),
        ]),
        Line::from(vec![
            Span::styled("h / l, - / +  ", key_style),
            Span::raw("Adjust field by its step"),
        ]),
        Line::from(vec![
            Span::styled("Enter / i     ", key_style),
            Span::raw("Type a value"),
        ]),
        Line::from(vec![
            Span::styled("a             ", key_style),
            Span::raw("Toggle auto-QA (% of Dev)"),
        ]),
        Line::from(vec![
            Span::styled("c             ", key_style),
            Span::raw("Toggle share/bar chart"),
        ]),
        Line::from(vec![
            Span::styled("e             ", key_style),
            Span::raw("Export CSV"),
        ]),
        Line::from(vec![
            Span::styled("r             ", key_style),
            Span::raw("Reset to baseline"),
        ]),
        Line::from(vec![
            Span::styled("?             ", key_style),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("q / Ctrl-c    ", key_style),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(app.theme.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(help_lines), inner);
}
