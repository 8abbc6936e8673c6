//! Console rendering
//!
//! Pure view code: reads the [`App`] state and draws it. The status
//! badges follow the additive convention — every row gets a stock badge,
//! and an expiry badge only when the product is expired or expiring
//! soon.

use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use shared::{ExpiryStatus, StockStatus};

use crate::app::{App, FetchState, FilterInput, InputMode, MutationState, View};
use crate::form::{Field, FormMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filter bar
            Constraint::Min(1),    // Table (+ logs)
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_filter_bar(f, app, chunks[1]);

    if app.show_logs {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);
        draw_table(f, app, main[0]);
        draw_logs(f, app, main[1]);
    } else {
        draw_table(f, app, chunks[2]);
    }

    draw_footer(f, app, chunks[3]);

    match app.view {
        View::Form(_) => draw_form_modal(f, app),
        View::ConfirmDelete(id) => draw_confirm_modal(f, app, id),
        View::Table => {}
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let state = match &app.fetch {
        FetchState::Loading => Span::styled(
            " LOADING... ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        FetchState::Loaded => Span::styled(
            format!(" {} products ", app.rows.len()),
            Style::default().fg(Color::Green),
        ),
        FetchState::Failed(_) => Span::styled(
            " FETCH FAILED ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let title = Paragraph::new(vec![Line::from(vec![
        Span::raw(" Pestle "),
        Span::styled(" Pharmacy Inventory ", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        state,
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let on = Style::default().fg(Color::Yellow);
    let off = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::raw(" ")];

    if let InputMode::Editing(target) = app.input_mode {
        let label = match target {
            FilterInput::Search => "search",
            FilterInput::Supplier => "supplier",
        };
        spans.push(Span::styled(
            format!("{label}> {}", app.filter_input.value()),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            format!("search:{}", app.filter.search.as_deref().unwrap_or("-")),
            if app.filter.search.is_some() { on } else { off },
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("category:{}", app.filter.category.as_deref().unwrap_or("-")),
            if app.filter.category.is_some() { on } else { off },
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("supplier:{}", app.filter.supplier.as_deref().unwrap_or("-")),
            if app.filter.supplier.is_some() { on } else { off },
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("stock:{}", app.filter.stock_status.label()),
            off,
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("expiry:{}", app.filter.expiry_status.label()),
            off,
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "[low-stock]",
            if app.filter.low_stock { on } else { off },
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "[expiring]",
            if app.filter.expiring_soon { on } else { off },
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM)),
    );
    f.render_widget(bar, area);

    if let InputMode::Editing(target) = app.input_mode {
        let prefix = match target {
            FilterInput::Search => "search> ",
            FilterInput::Supplier => "supplier> ",
        };
        f.set_cursor_position((
            area.x + 1 + prefix.len() as u16 + app.filter_input.visual_cursor() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn stock_badge(status: StockStatus) -> Span<'static> {
    let style = match status {
        StockStatus::InStock => Style::default().fg(Color::Green),
        StockStatus::LowStock => Style::default().fg(Color::Yellow),
        StockStatus::OutOfStock => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    Span::styled(status.label(), style)
}

fn expiry_badge(status: ExpiryStatus) -> Option<Span<'static>> {
    match status {
        ExpiryStatus::Expired => Some(Span::styled(
            "Expired",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        ExpiryStatus::ExpiringSoon => Some(Span::styled(
            "Expiring Soon",
            Style::default().fg(Color::Magenta),
        )),
        ExpiryStatus::Valid => None,
    }
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Products ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    match &app.fetch {
        FetchState::Failed(message) => {
            // A failed fetch is not an empty result; say so loudly.
            let banner = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Could not load products",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw(message.clone())),
                Line::from(Span::styled(
                    "Press 'r' to retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            f.render_widget(banner, area);
            return;
        }
        FetchState::Loaded if app.rows.is_empty() => {
            let empty = Paragraph::new("No products match the active filters")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
            return;
        }
        _ => {}
    }

    let today = App::today();
    let header = Row::new(vec![
        "Name", "Category", "Supplier", "Price", "Qty", "Expiry", "Status",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|p| {
            let mut status = vec![stock_badge(p.stock_status())];
            if let Some(badge) = expiry_badge(p.expiry_status(today)) {
                status.push(Span::raw(" / "));
                status.push(badge);
            }
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.category.clone()),
                Cell::from(p.supplier.clone()),
                Cell::from(p.price.to_string()),
                Cell::from(p.stock_quantity.to_string()),
                Cell::from(p.expiry_date.to_string()),
                Cell::from(Line::from(status)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Min(18),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM)),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match (&app.view, app.input_mode) {
        (View::Form(_), _) => {
            "Tab/Shift-Tab field | Enter submit | Esc cancel".to_string()
        }
        (View::ConfirmDelete(_), _) => "y confirm | n/Esc cancel".to_string(),
        (_, InputMode::Editing(_)) => "Enter apply | Esc cancel".to_string(),
        _ => concat!(
            "n new | e edit | d delete | r refresh | / search | u supplier | ",
            "c category | s stock | x expiry | l low-stock | g expiring | ",
            "C clear | L logs | q quit"
        )
        .to_string(),
    };

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {hints}"),
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_form_modal(f: &mut Frame, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let title = match form.mode {
        FormMode::Create => " New Product ",
        FormMode::Edit(_) => " Edit Product ",
    };

    let area = centered_rect(f.area(), 56, (Field::ALL.len() + 7) as u16);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    const LABEL_WIDTH: usize = 26;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in Field::ALL.iter().enumerate() {
        let focused = idx == form.focused;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut spans = vec![
            Span::raw(marker),
            Span::styled(
                format!("{:<LABEL_WIDTH$}", field.label()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(form.inputs[idx].value().to_string(), value_style),
        ];
        if let Some(message) = form.error_for(*field) {
            spans.push(Span::styled(
                format!("  ({message})"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    match &app.mutation {
        MutationState::Pending(kind) => lines.push(Line::from(Span::styled(
            format!("Saving ({})...", kind.label()),
            Style::default().fg(Color::Yellow),
        ))),
        MutationState::Failed(message) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
        MutationState::Idle => {
            if !form.errors.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Fix the highlighted fields to submit",
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), inner);

    // Place the cursor at the end of the focused input
    let cursor_x = inner.x
        + 2
        + LABEL_WIDTH as u16
        + form.inputs[form.focused].visual_cursor() as u16;
    let cursor_y = inner.y + form.focused as u16;
    f.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), cursor_y));
}

fn draw_confirm_modal(f: &mut Frame, app: &App, id: i64) {
    let name = app
        .rows
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("product {id}"));

    let area = centered_rect(f.area(), 48, 7);
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(format!("Delete \"{name}\"?")),
        Line::from(""),
    ];
    match &app.mutation {
        MutationState::Pending(_) => lines.push(Line::from(Span::styled(
            "Deleting...",
            Style::default().fg(Color::Yellow),
        ))),
        MutationState::Failed(message) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
        MutationState::Idle => lines.push(Line::from(Span::styled(
            "y to confirm, n to cancel",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(dialog, area);
}

/// A centered rect of fixed size, clamped to the frame
fn centered_rect(frame: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(frame.width);
    let height = height.min(frame.height);
    Rect {
        x: frame.x + (frame.width.saturating_sub(width)) / 2,
        y: frame.y + (frame.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
