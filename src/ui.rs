use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, ClickableRegions, InputMode, LoadState};
use crate::detail::{Detail, PriceChart};
use crate::format::{format_date, format_price};
use crate::grid::{Card, GridView};

pub const CARD_WIDTH: u16 = 26;
pub const CARD_HEIGHT: u16 = 4;

const ALL_CATEGORIES: &str = " All categories ";

/// One horizontal band of the grid
#[derive(Debug, PartialEq)]
enum GridLine<'a> {
    Title(&'a str),
    /// Card indices in display order
    Cards(Vec<usize>),
}

impl GridLine<'_> {
    fn height(&self) -> u16 {
        match self {
            GridLine::Title(_) => 1,
            GridLine::Cards(_) => CARD_HEIGHT,
        }
    }
}

fn grid_lines(view: &GridView, columns: usize) -> Vec<GridLine<'_>> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut offset = 0;

    match view {
        GridView::Empty => {}
        GridView::Flat(cards) => push_card_rows(&mut lines, &mut offset, cards.len(), columns),
        GridView::Grouped(sections) => {
            for section in sections {
                lines.push(GridLine::Title(&section.title));
                push_card_rows(&mut lines, &mut offset, section.cards.len(), columns);
            }
        }
    }
    lines
}

fn push_card_rows(lines: &mut Vec<GridLine<'_>>, offset: &mut usize, count: usize, columns: usize) {
    let indices: Vec<usize> = (*offset..*offset + count).collect();
    for chunk in indices.chunks(columns) {
        lines.push(GridLine::Cards(chunk.to_vec()));
    }
    *offset += count;
}

pub fn ui(f: &mut Frame, app: &mut App) {
    // Clear clickable regions before each render
    app.clickable_regions = ClickableRegions::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Length(3), // Search + refresh
            Constraint::Min(6),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);
    render_toolbar(f, app, chunks[1]);
    render_grid(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    if app.input_mode == InputMode::Detail {
        if let Some(detail) = &app.detail {
            render_detail_view(f, detail);
        }
    }
}

fn render_tabs(f: &mut Frame, app: &mut App, area: Rect) {
    let selected = app.category_index();
    let mut titles: Vec<Line> = Vec::with_capacity(app.categories.len() + 1);
    let mut tab_widths: Vec<usize> = Vec::with_capacity(app.categories.len() + 1);

    titles.push(Line::from(ALL_CATEGORIES));
    tab_widths.push(ALL_CATEGORIES.chars().count());
    for category in &app.categories {
        let title = format!(" {} ", category);
        tab_widths.push(title.chars().count());
        titles.push(Line::from(title));
    }

    // Tabs sit inside the border, separated by a one-cell divider
    let mut current_x = area.x + 1;
    for (i, width) in tab_widths.iter().enumerate() {
        let tab_rect = Rect::new(current_x, area.y + 1, *width as u16, 1);
        app.clickable_regions.category_tabs.push((tab_rect, i));
        current_x += *width as u16 + 1;
    }

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Categories "))
        .padding("", "")
        .divider("|")
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .select(selected);
    f.render_widget(tabs, area);
}

fn render_toolbar(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(42)])
        .split(area);

    app.clickable_regions.search_bar = chunks[0];
    app.clickable_regions.refresh_button = chunks[1];

    let editing = app.input_mode == InputMode::Search;
    let search = if app.filter.search_term.is_empty() && !editing {
        Line::from(Span::styled("press / to search", Style::default().fg(Color::DarkGray)))
    } else {
        let cursor = if editing { "█" } else { "" };
        Line::from(format!("{}{}", app.filter.search_term, cursor))
    };
    let search_border = if editing { Style::default().fg(Color::Yellow) } else { Style::default() };
    f.render_widget(
        Paragraph::new(search)
            .block(Block::default().borders(Borders::ALL).title(" Search ").border_style(search_border)),
        chunks[0],
    );

    let button_style = if app.controller.is_locked() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let status = Line::from(vec![
        Span::raw(format!(" Next refresh in {:>2}s  ", app.controller.countdown())),
        Span::styled(format!("[r] {}", app.controller.button_label()), button_style),
    ]);
    f.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}

fn render_grid(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Items ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let message = match app.load_state {
        LoadState::Loading => Some(("Loading data...", Color::Yellow)),
        LoadState::Failed => Some(("Failed to load data", Color::Red)),
        LoadState::Ready if app.view == GridView::Empty => Some(("No items found", Color::DarkGray)),
        LoadState::Ready => None,
    };
    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color));
        f.render_widget(paragraph, inner);
        return;
    }

    let columns = ((inner.width / CARD_WIDTH) as usize).max(1);
    app.grid_columns = columns;

    let cards = app.view.cards();
    let lines = grid_lines(&app.view, columns);
    let scroll = scroll_to_selected(&lines, app.selected, app.scroll, inner.height);

    let mut y = inner.y;
    for line in lines.iter().skip(scroll) {
        let height = line.height();
        if y + height > inner.bottom() {
            break;
        }
        match line {
            GridLine::Title(title) => {
                let title = Paragraph::new(Line::from(*title).yellow().bold());
                f.render_widget(title, Rect::new(inner.x, y, inner.width, 1));
            }
            GridLine::Cards(indices) => {
                for (col, index) in indices.iter().enumerate() {
                    let rect = Rect::new(inner.x + col as u16 * CARD_WIDTH, y, CARD_WIDTH, CARD_HEIGHT);
                    if let Some(card) = cards.get(*index) {
                        render_card(f, card, rect, *index == app.selected);
                        app.clickable_regions.cards.push((rect, *index));
                    }
                }
            }
        }
        y += height;
    }

    app.scroll = scroll;
}

/// Smallest change to `scroll` that keeps the selected card's line on screen.
fn scroll_to_selected(lines: &[GridLine], selected: usize, scroll: usize, height: u16) -> usize {
    let Some(target) = lines
        .iter()
        .position(|l| matches!(l, GridLine::Cards(indices) if indices.contains(&selected)))
    else {
        return 0;
    };

    // Keep a section title visible together with its first row
    let top = if target > 0 && matches!(lines[target - 1], GridLine::Title(_)) { target - 1 } else { target };
    let mut scroll = scroll.min(top);
    while scroll < target {
        let used: u16 = lines[scroll..=target].iter().map(|l| l.height()).sum();
        if used <= height {
            break;
        }
        scroll += 1;
    }
    scroll
}

fn render_card(f: &mut Frame, card: &Card, area: Rect, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let lines = vec![
        Line::from(card.name.clone()).bold(),
        Line::from(vec![
            Span::styled(card.buy.clone(), Style::default().fg(Color::Green)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(card.sell.clone(), Style::default().fg(Color::Red)),
        ]),
    ];
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let updated = app
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(
            " Tab=Category | /=Search | ←↑↓→=Nav | Enter=Detail | r=Refresh | q=Quit ",
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(" {} items | Updated: {} | {}", app.view.len(), updated, app.source_label),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.is_fetching() {
        spans.push(Span::styled("  Refreshing...", Style::default().fg(Color::Yellow).bold()));
    } else if app.refresh_failed {
        spans.push(Span::styled("  Last refresh failed", Style::default().fg(Color::Red).bold()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_detail_view(f: &mut Frame, detail: &Detail) {
    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Info header
            Constraint::Min(8),    // Chart
            Constraint::Length(1), // Footer
        ])
        .margin(1)
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", detail.name))
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let mut info = vec![
        Line::from(format!("  Category: {}", detail.category)),
        Line::from(vec![
            Span::styled(format!("  Buy:  {}", detail.buy_price), Style::default().fg(Color::Green).bold()),
            Span::raw(format!("  ({})", detail.buy_orders)),
        ]),
        Line::from(vec![
            Span::styled(format!("  Sell: {}", detail.sell_price), Style::default().fg(Color::Red).bold()),
            Span::raw(format!("  ({})", detail.sell_orders)),
        ]),
        Line::from(Span::styled(format!("  Icon: {}", detail.icon_url), Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];
    if let Some(latest) = detail.chart().and_then(PriceChart::latest) {
        info.push(Line::from(format!(
            "  {}: avg {} | min {} | max {} | {} transactions | {} items traded",
            format_date(&latest.timestamp),
            format_price(latest.avg_price),
            format_price(latest.min_price),
            format_price(latest.max_price),
            latest.transactions,
            latest.items,
        )));
    }
    f.render_widget(Paragraph::new(info), chunks[0]);

    match detail.chart() {
        Some(chart) if !chart.is_empty() => render_history_chart(f, chart, chunks[1]),
        _ => {
            let no_data = Paragraph::new("  No price history available")
                .block(Block::default().borders(Borders::ALL).title(" Price History "))
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(no_data, chunks[1]);
        }
    }

    let footer = Paragraph::new("  Press Esc or Enter to close").style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

fn render_history_chart(f: &mut Frame, chart: &PriceChart, area: Rect) {
    let datasets = vec![
        Dataset::default()
            .name("Avg")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&chart.avg),
        Dataset::default()
            .name("Min")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&chart.min),
        Dataset::default()
            .name("Max")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&chart.max),
    ];

    let first = chart.entries.first().map(|e| format_date(&e.timestamp)).unwrap_or_default();
    let last = chart.entries.last().map(|e| format_date(&e.timestamp)).unwrap_or_default();

    let widget = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" Price History (hourly) "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(chart.x_bounds)
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(chart.y_bounds)
                .labels(vec![
                    Span::raw(format_price(chart.y_bounds[0])),
                    Span::raw(format_price(chart.y_bounds[1])),
                ]),
        );
    f.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
