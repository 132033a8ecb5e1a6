use crate::tui::app::{App, Focus, Item, View};
use crate::tui::theme::Theme;
use flight_lens_core::boxplot::Y_RANGE;
use flight_lens_core::drop_test::{FINDINGS, INTRO};
use flight_lens_core::{Colormap, Snapshot};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Row, Table, Wrap,
    },
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    // sidebar auto-hides on narrow terminals
    let show_sidebar = app.sidebar_visible && area.width >= 80;
    let sidebar_w = if show_sidebar { app.sidebar_width } else { 0 };
    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_w), Constraint::Min(0)])
        .split(chunks[1]);
    if show_sidebar {
        render_sidebar(frame, app, mid[0], theme);
    }
    render_main(frame, app, mid[1], theme);
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help {
        render_help(frame, app, area);
    }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let panel = app.last_panel;
    let pos = View::PANELS.iter().position(|v| *v == panel).map(|i| i + 1).unwrap_or(1);
    let badge = Span::styled(format!("[{}]", panel.title()), Style::default().fg(theme.highlight));
    let info = match &app.data {
        Some(d) => format!(
            " {} | {} summary rows | {} features | panel {pos}/{}",
            app.data_dir,
            d.flights.len(),
            d.correlation.len(),
            View::PANELS.len()
        ),
        None => format!(" {}", app.data_dir),
    };
    let line = Line::from(vec![badge, Span::raw(info)]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Controls")
        .border_style(if focused { Style::default().fg(theme.highlight) } else { Style::default() });
    let inner = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app
        .sidebar_items()
        .iter()
        .map(|item| ListItem::new(sidebar_line(app, item, inner, theme)))
        .collect();
    if items.is_empty() {
        frame.render_widget(Paragraph::new("No controls for this panel.").block(block), area);
        return;
    }
    let mut state = ListState::default();
    state.select(Some(app.sidebar_selected.min(items.len().saturating_sub(1))));
    let list = List::new(items).block(block).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn sidebar_line<'a>(app: &App, item: &Item, width: usize, theme: &Theme) -> Line<'a> {
    let check = |on: bool| {
        if on {
            Span::styled("[x] ", Style::default().fg(theme.success))
        } else {
            Span::raw("[ ] ")
        }
    };
    let Some(c) = &app.controls else { return Line::from("") };
    let selector = |name: &str, value: String| {
        Line::from(vec![
            Span::raw(format!("{name:<9}")),
            Span::styled(format!("< {} >", truncate(&value, width.saturating_sub(13))), Style::default().fg(theme.highlight)),
        ])
    };
    match item {
        Item::Year(y) => Line::from(vec![check(app.is_checked(item)), Span::raw(format!("year {y}"))]),
        Item::BoxYear(y) => Line::from(vec![check(app.is_checked(item)), Span::raw(format!("box year {y}"))]),
        Item::Config(s) | Item::BoxConfig(s) => Line::from(vec![check(app.is_checked(item)), Span::raw(truncate(s, width))]),
        Item::Colormap => selector("Colormap", c.colormap.to_string()),
        Item::Feature => selector("Feature", c.selection.label().to_string()),
        Item::Bins => selector("Bins", format!("{:>2}", c.bins)),
        Item::Distribution => selector("Dist", c.distribution.display_name().to_string()),
    }
}

fn render_main(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let panel = if app.view == View::Help { app.last_panel } else { app.view };
    if panel == View::Docs {
        render_docs(frame, app, area);
        return;
    }
    let Some(snap) = &app.snapshot else {
        let msg = format!("No data loaded.\n\n{}\n\nPress r to retry.", app.status_msg);
        frame.render_widget(
            Paragraph::new(msg).wrap(Wrap { trim: false }).block(Block::default().borders(Borders::ALL).title(panel.title())),
            area,
        );
        return;
    };
    match panel {
        View::Flights => render_flights(frame, app, snap, area, theme),
        View::GroundTime => render_ground_time(frame, snap, area, theme),
        View::Correlation => render_correlation(frame, snap, area, theme),
        View::Histogram => render_histogram(frame, snap, area, theme),
        View::Boxplot => render_boxplot(frame, snap, area, theme),
        View::Qq => render_qq(frame, snap, area, theme),
        View::DropTest => render_drop_test(frame, app, snap, area, theme),
        View::Docs | View::Help => {}
    }
}

fn main_block(title: String, theme: &Theme) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(theme.axis))
}

// --- flight statistics: line chart over the filtered table ---

fn render_flights(frame: &mut Frame, app: &App, snap: &Snapshot, area: Rect, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let series: Vec<(String, Vec<(f64, f64)>)> = snap
        .flights_over_time
        .iter()
        .map(|s| (s.aircraft_config.clone(), s.points.iter().map(|&(y, n)| (y as f64, n as f64)).collect()))
        .collect();
    let (x0, x1) = bounds(series.iter().flat_map(|(_, p)| p.iter().map(|q| q.0)));
    let (_, y1) = bounds(series.iter().flat_map(|(_, p)| p.iter().map(|q| q.1)));
    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (name, pts))| {
            Dataset::default()
                .name(name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.series_color(i)))
                .data(pts)
        })
        .collect();
    let chart = Chart::new(datasets)
        .block(main_block("Total Flights Over Time by Aircraft Configuration".into(), theme))
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(theme.axis))
                .bounds([x0 - 0.5, x1 + 0.5])
                .labels(vec![Line::from(format!("{x0:.0}")), Line::from(format!("{x1:.0}"))]),
        )
        .y_axis(
            Axis::default()
                .title("Total Flights")
                .style(Style::default().fg(theme.axis))
                .bounds([0.0, y1 * 1.1 + 1.0])
                .labels(vec![Line::from("0"), Line::from(format!("{y1:.0}"))]),
        );
    frame.render_widget(chart, chunks[0]);

    let header = Row::new(
        ["Year", "Aircraft Configuration", "Total Flights", "Avg Ground Time"]
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    );
    let rows: Vec<Row> = snap
        .filtered
        .iter()
        .skip(app.main_scroll)
        .map(|r| {
            Row::new([
                Cell::from(r.year.to_string()),
                Cell::from(r.aircraft_config.clone()),
                Cell::from(r.total_flights.to_string()),
                Cell::from(format!("{:.2}", r.average_ground_time)),
            ])
        })
        .collect();
    let title = format!("Flight Statistics ({} rows)", snap.filtered.len());
    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(28), Constraint::Length(14), Constraint::Length(16)])
        .header(header)
        .block(main_block(title, theme));
    frame.render_widget(table, chunks[1]);
}

// --- average ground time per configuration ---

fn render_ground_time(frame: &mut Frame, snap: &Snapshot, area: Rect, theme: &Theme) {
    let block = main_block("Average Ground Time by Aircraft Configuration".into(), theme);
    if snap.ground_time_by_config.is_empty() {
        frame.render_widget(Paragraph::new("No rows match the current filters.").block(block), area);
        return;
    }
    let n = snap.ground_time_by_config.len() as u16;
    let bar_width = (area.width.saturating_sub(2) / n.max(1)).saturating_sub(1).clamp(3, 24);
    let bars: Vec<Bar> = snap
        .ground_time_by_config
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::default()
                .value(m.average_ground_time.max(0.0).round() as u64)
                .text_value(format!("{:.1}", m.average_ground_time))
                .label(Line::from(truncate(&m.aircraft_config, bar_width as usize)))
                .style(Style::default().fg(theme.series_color(i)))
        })
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

// --- correlation heatmap ---

fn render_correlation(frame: &mut Frame, snap: &Snapshot, area: Rect, theme: &Theme) {
    let view = &snap.correlation;
    let h = view.heatmap();
    let cmap = snap.controls.colormap;
    let label_w = 14usize;
    let cell_w = 7usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut header = vec![Span::raw(" ".repeat(label_w))];
    header.extend(h.col_labels.iter().map(|c| {
        Span::styled(format!("{:>w$}", truncate(c, cell_w - 1), w = cell_w), Style::default().add_modifier(Modifier::BOLD))
    }));
    lines.push(Line::from(header));
    for (label, row) in h.row_labels.iter().zip(&h.cells) {
        let mut spans = vec![Span::raw(format!("{:<w$}", truncate(label, label_w - 1), w = label_w))];
        spans.extend(row.iter().map(|&v| heat_cell(v, h.zmin, h.zmax, cmap, cell_w)));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(colorbar(cmap, h.zmin, h.zmax, 28));
    let title = format!("{} [{}]", view.title(), cmap);
    frame.render_widget(
        Paragraph::new(lines).block(main_block(title, theme)),
        area,
    );
}

fn heat_cell(v: f64, zmin: f64, zmax: f64, cmap: Colormap, w: usize) -> Span<'static> {
    let (r, g, b) = cmap.for_value(v, zmin, zmax);
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    let fg = if luminance > 140.0 { Color::Black } else { Color::White };
    Span::styled(format!("{v:>w$.2}", w = w), Style::default().bg(Color::Rgb(r, g, b)).fg(fg))
}

fn colorbar(cmap: Colormap, zmin: f64, zmax: f64, steps: usize) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{zmin:>5.1} "))];
    spans.extend((0..steps).map(|i| {
        let (r, g, b) = cmap.sample(i as f64 / (steps - 1).max(1) as f64);
        Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b)))
    }));
    spans.push(Span::raw(format!(" {zmax:.1}")));
    Line::from(spans)
}

// --- log ground time histogram ---

fn render_histogram(frame: &mut Frame, snap: &Snapshot, area: Rect, theme: &Theme) {
    let hv = &snap.histogram;
    let title = format!(
        "Interactive Histogram of Log-Transformed Ground Time ({} bins, slider {})",
        hv.bins.len(),
        snap.controls.bins
    );
    let block = main_block(title, theme);
    if hv.bins.is_empty() {
        frame.render_widget(Paragraph::new("Histogram summary is empty.").block(block), area);
        return;
    }
    let x0 = hv.edges.first().copied().unwrap_or(0.0);
    let x1 = hv.edges.last().copied().unwrap_or(1.0);
    let ymax = hv.bins.iter().map(|b| b.frequency).max().unwrap_or(0) as f64;
    let color = theme.bar;
    let axis = theme.axis;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([x0, x1.max(x0 + f64::EPSILON)])
        .y_bounds([0.0, ymax * 1.1 + 1.0])
        .paint(move |ctx| {
            for (b, w) in hv.bins.iter().zip(&hv.widths) {
                fill_rect(ctx, b.left_edge, 0.0, *w, b.frequency as f64, color);
                ctx.draw(&Rectangle { x: b.left_edge, y: 0.0, width: *w, height: b.frequency as f64, color: axis });
            }
            ctx.print(x0, ymax * 1.05, Line::from(format!("max {ymax:.0}")));
        });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    frame.render_widget(canvas, chunks[0]);
    let caption = format!(" log(GROUND_TIME) {x0:.2} .. {x1:.2}   frequency 0 .. {ymax:.0}");
    frame.render_widget(Paragraph::new(caption).style(Style::default().fg(axis)), chunks[1]);
}

// braille canvases only outline rectangles; fill with vertical strokes
fn fill_rect(ctx: &mut Context, x: f64, y: f64, w: f64, h: f64, color: Color) {
    const STROKES: usize = 24;
    for i in 0..=STROKES {
        let xi = x + w * i as f64 / STROKES as f64;
        ctx.draw(&CanvasLine { x1: xi, y1: y, x2: xi, y2: y + h, color });
    }
}

// --- boxplot of log ground time by (year, configuration) ---

fn render_boxplot(frame: &mut Frame, snap: &Snapshot, area: Rect, theme: &Theme) {
    let block = main_block("Boxplot of LOG_GROUND_TIME by Year and Aircraft Configuration".into(), theme);
    if snap.boxplot.is_empty() {
        frame.render_widget(Paragraph::new("No samples match the selected years and configurations.").block(block), area);
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let colors = colors_for(snap, theme);
    let n = snap.boxplot.len() as f64;
    let groups = &snap.boxplot;
    let palette = &colors;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-0.5, n - 0.5])
        .y_bounds([Y_RANGE.0, Y_RANGE.1])
        .paint(move |ctx| {
            for (i, (g, &color)) in groups.iter().zip(palette).enumerate() {
                let x = i as f64;
                let s = &g.stats;
                ctx.draw(&Rectangle { x: x - 0.3, y: s.q1, width: 0.6, height: s.iqr, color });
                ctx.draw(&CanvasLine { x1: x - 0.3, y1: s.median, x2: x + 0.3, y2: s.median, color: Color::White });
                ctx.draw(&CanvasLine { x1: x, y1: s.whisker_low, x2: x, y2: s.q1, color });
                ctx.draw(&CanvasLine { x1: x, y1: s.q3, x2: x, y2: s.whisker_high, color });
                ctx.draw(&CanvasLine { x1: x - 0.15, y1: s.whisker_low, x2: x + 0.15, y2: s.whisker_low, color });
                ctx.draw(&CanvasLine { x1: x - 0.15, y1: s.whisker_high, x2: x + 0.15, y2: s.whisker_high, color });
                ctx.print(x - 0.3, Y_RANGE.0 + 0.5, Line::from(g.year.to_string()));
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let header = Row::new(
        ["Year", "Configuration", "n", "Q1", "Median", "Q3", "Whiskers"]
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    );
    let rows: Vec<Row> = snap
        .boxplot
        .iter()
        .zip(&colors)
        .map(|(g, &color)| {
            let s = &g.stats;
            Row::new([
                Cell::from(g.year.to_string()),
                Cell::from(g.aircraft_config.clone()).style(Style::default().fg(color)),
                Cell::from(s.count.to_string()),
                Cell::from(format!("{:.2}", s.q1)),
                Cell::from(format!("{:.2}", s.median)),
                Cell::from(format!("{:.2}", s.q3)),
                Cell::from(format!("{:.2} .. {:.2}", s.whisker_low, s.whisker_high)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(24),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

fn colors_for(snap: &Snapshot, theme: &Theme) -> Vec<Color> {
    snap.boxplot
        .iter()
        .map(|g| {
            let i = snap.controls.box_configs.iter().position(|c| *c == g.aircraft_config).unwrap_or(0);
            theme.series_color(i)
        })
        .collect()
}

// --- QQ plot ---

fn render_qq(frame: &mut Frame, snap: &Snapshot, area: Rect, theme: &Theme) {
    let Some(qq) = &snap.qq else {
        let msg = snap.qq_error.as_deref().unwrap_or("QQ sample unavailable");
        let block = main_block("QQ Plot".to_string(), theme);
        frame.render_widget(
            Paragraph::new(format!("Cannot plot QQ sample: {msg}")).style(Style::default().fg(theme.error)).block(block),
            area,
        );
        return;
    };
    let points = qq.points();
    let line = qq.fit_line().to_vec();
    let (x0, x1) = bounds(qq.theoretical.iter().copied());
    let (y0, y1) = bounds(qq.ordered.iter().copied().chain(line.iter().map(|p| p.1)));
    let pad = |lo: f64, hi: f64| ((hi - lo) * 0.05).max(1e-6);
    let (xp, yp) = (pad(x0, x1), pad(y0, y1));
    let datasets = vec![
        Dataset::default()
            .name("Data Points")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.series_color(0)))
            .data(&points),
        Dataset::default()
            .name(format!("Fit Line (r = {:.4})", qq.r))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.series_color(1)))
            .data(&line),
    ];
    let chart = Chart::new(datasets)
        .block(main_block(qq.title(), theme))
        .x_axis(
            Axis::default()
                .title("Theoretical Quantiles")
                .style(Style::default().fg(theme.axis))
                .bounds([x0 - xp, x1 + xp])
                .labels(vec![Line::from(format!("{x0:.2}")), Line::from(format!("{x1:.2}"))]),
        )
        .y_axis(
            Axis::default()
                .title("Ordered Values")
                .style(Style::default().fg(theme.axis))
                .bounds([y0 - yp, y1 + yp])
                .labels(vec![Line::from(format!("{y0:.2}")), Line::from(format!("{y1:.2}"))]),
        );
    frame.render_widget(chart, area);
}

// --- drop test ---

fn render_drop_test(frame: &mut Frame, app: &App, snap: &Snapshot, area: Rect, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(snap.drop_test.len() as u16 + 3), Constraint::Min(0)])
        .split(area);
    let header = Row::new(
        ["Dropped Variable", "Weighted RMSE", "Unweighted RMSE", "Diff (Weighted)", "Diff (Unweighted)"]
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    );
    let diff = |v: f64| {
        let color = if v > 0.0 { theme.warning } else if v < 0.0 { theme.success } else { theme.fg };
        Cell::from(format!("{v:+.4}")).style(Style::default().fg(color))
    };
    let rows: Vec<Row> = snap
        .drop_test
        .iter()
        .skip(app.main_scroll)
        .map(|r| {
            Row::new([
                Cell::from(r.dropped_variable.clone()),
                Cell::from(format!("{:.4}", r.weighted_rmse)),
                Cell::from(format!("{:.4}", r.unweighted_rmse)),
                diff(r.diff_weighted),
                diff(r.diff_unweighted),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(24), Constraint::Length(14), Constraint::Length(16), Constraint::Length(16), Constraint::Length(18)],
    )
    .header(header)
    .block(main_block("Drop Test Results".into(), theme));
    frame.render_widget(table, chunks[0]);

    let mut text = vec![Line::from(INTRO), Line::from("")];
    text.push(Line::from(Span::styled("Summary of Findings", Style::default().add_modifier(Modifier::BOLD))));
    text.extend(FINDINGS.iter().enumerate().map(|(i, f)| Line::from(format!("{}. {f}", i + 1))));
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}

// --- documentation ---

const DOCS: &[&str] = &[
    "# Flight Statistics Interactive Documentation",
    "",
    "Purpose",
    "  Flight statistics for the United States: total number of flights and the average",
    "  ground time by aircraft configuration.",
    "",
    "Instructions",
    "  Select Year / Aircraft Configuration: toggle them in the sidebar (panels 1 and 2).",
    "  Heatmap: pick the colormap and the feature to focus on (panel 3).",
    "  Histogram: move the bin slider between 5 and 30 (panel 4).",
    "",
    "Data Description",
    "  YEAR                  year of data",
    "  AIRCRAFT_CONFIG_DESC  type of aircraft: passenger, freight, seaplane, ...",
    "  total_flights         total number of flights",
    "  average_ground_time   the average ground time",
    "",
    "Notes",
    "  Ground time is log-transformed because of its long tail. It is derived from",
    "  RAMP-TO-RAMP = AIR_TIME + GROUND_TIME.",
    "  Ground time is stable over time, but Q1 shows a cyclic pattern that moves the IQR",
    "  and whiskers; a time-series analysis may be worthwhile.",
    "  The QQ plot matches none of the candidate distributions. The histogram has two",
    "  local maxima, so the data may hide a segmentation worth exploring.",
];

fn render_docs(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = DOCS.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Docs"))
            .scroll((app.main_scroll as u16, 0)),
        area,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q          Quit"),
        Line::from("  ?          Toggle help"),
        Line::from("  Tab        Cycle focus"),
        Line::from("  1-8        Jump to panel"),
        Line::from("  n / p      Next / previous panel"),
        Line::from("  j/k        Navigate sidebar / scroll main"),
        Line::from("  Space      Toggle or step the selected control"),
        Line::from("  h/l  -/+   Step selector or bin count"),
        Line::from("  a / x      Select all / none"),
        Line::from("  [ ]        Sidebar width"),
        Line::from("  `          Toggle sidebar"),
        Line::from("  r          Reload data"),
        Line::from("  E          Export snapshot as JSON"),
        Line::from("  Esc        Back"),
    ];
    let popup = centered_rect(50, 70, area);
    frame.render_widget(ratatui::widgets::Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help (?)"))
            .scroll((app.help_scroll as u16, 0)),
        popup,
    );
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let watch = if app.watch_rx.is_some() { " [watch]" } else { "" };
    let bar_text = format!(" {}{watch} | q:quit ?:help Tab:focus 1-8 n p r E", app.status_msg);
    let fg = if app.status_msg.starts_with("error") || app.status_msg.contains("failed") { theme.error } else { theme.fg };
    frame.render_widget(Paragraph::new(bar_text).style(Style::default().bg(theme.bg).fg(fg)), area);
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

// (min, max) of finite values; (0, 1) when there are none
fn bounds(vals: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = vals
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_owned() } else { format!("{}\u{2026}", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::{loaded_app, sample_data};
    use flight_lens_core::binning::HistogramSummary;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn every_panel_renders() {
        let mut app = loaded_app();
        let expected = [
            "Total Flights Over Time",
            "Average Ground Time by",
            "Full Feature Correlation",
            "Interactive Histogram",
            "Boxplot of LOG_GROUND_TIME",
            "QQ Plot of Log-Transformed",
            "Drop Test Results",
            "Data Description",
        ];
        for (view, title) in View::PANELS.into_iter().zip(expected) {
            app.show(view);
            assert!(screen(&app).contains(title), "{title} missing in {view:?}");
        }
    }

    #[test]
    fn help_overlay_and_empty_state() {
        let mut app = loaded_app();
        app.view = View::Help;
        assert!(screen(&app).contains("Keybindings"));
        let empty = App::new(flight_lens_common::Config::default());
        assert!(screen(&empty).contains("No data loaded"));
    }

    #[test]
    fn empty_histogram_renders_message() {
        let mut data = sample_data();
        data.histogram = HistogramSummary::new(Vec::new()).unwrap();
        let mut app = App::new(flight_lens_common::Config::default());
        app.set_data(data);
        app.show(View::Histogram);
        assert!(screen(&app).contains("Histogram summary is empty."));
    }

    #[test]
    fn bad_qq_sample_leaves_other_panels() {
        let mut data = sample_data();
        data.qq = vec![3.0];
        let mut app = App::new(flight_lens_common::Config::default());
        app.set_data(data);
        assert!(app.snapshot.is_some());
        app.show(View::Qq);
        assert!(screen(&app).contains("Cannot plot QQ sample"));
        app.show(View::Histogram);
        assert!(screen(&app).contains("Interactive Histogram"));
        app.show(View::Correlation);
        assert!(screen(&app).contains("Full Feature Correlation"));
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Passenger Configuration", 5), "Pass\u{2026}");
        assert_eq!(truncate("abc", 5), "abc");
    }

    #[test]
    fn bounds_skip_nan() {
        assert_eq!(bounds([f64::NAN, 2.0, -1.0].into_iter()), (-1.0, 2.0));
        assert_eq!(bounds(std::iter::empty()), (0.0, 1.0));
    }
}
