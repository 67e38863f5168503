use chrono::Datelike;
use unicode_width::UnicodeWidthChar;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use mindguard_chat::theme::Palette;
use mindguard_chat::{Author, Language, COMMON_QUESTIONS, WELCOME_MESSAGE};

use crate::app::{App, InputMode};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' || chars.peek() != Some(&'*') {
            current_text.push(c);
            continue;
        }
        // Consume the second *
        chars.next();

        let mut bold_text = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                found_close = true;
                break;
            }
            bold_text.push(c);
        }

        if found_close && !bold_text.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            spans.push(Span::styled(
                bold_text,
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            // No closing **, treat as literal
            current_text.push_str("**");
            current_text.push_str(&bold_text);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = app.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, &palette, frame, header_area);
    render_chat(app, &palette, frame, chat_area);
    render_input(app, &palette, frame, input_area);
    render_footer(app, &palette, frame, footer_area);

    // Render popups (in order of priority)
    if let Some(message) = app.alert.clone() {
        render_alert(&message, &palette, frame, area);
    } else if app.show_language_picker {
        render_language_picker(app, &palette, frame, area);
    }
}

fn render_header(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" MindGuard ", Style::default().fg(palette.accent).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(palette.muted),
        ),
        Span::styled(
            format!(" {} ", app.language.display_name()),
            Style::default().fg(palette.text),
        ),
        Span::styled(
            format!(" {} {} ", app.theme.icon(), app.theme.label()),
            Style::default().fg(palette.muted),
        ),
    ];

    if app.widget.is_listening() {
        spans.push(Span::styled(
            " ● Listening ",
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        ));
    }
    if app.is_translating() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        spans.push(Span::styled(
            format!(" Translating{} ", dots),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        ));
    }

    let header = Paragraph::new(Line::from(spans));
    frame.render_widget(header, area);
}

/// Lines of the chat view; the line count must agree with `App::total_chat_lines`
fn chat_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.widget.log().iter() {
        let (label, color) = match msg.author {
            Author::User => ("You:", palette.user),
            Author::Assistant => ("MindGuard:", palette.assistant),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        for line in msg.text.lines() {
            if msg.is_error() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(palette.error),
                )));
            } else if msg.author == Author::Assistant {
                lines.push(parse_markdown_line(line));
            } else {
                lines.push(Line::from(line.to_string()));
            }
        }
        lines.push(Line::default());
    }

    if app.widget.is_pending() {
        lines.push(Line::from(Span::styled(
            "MindGuard:",
            Style::default().fg(palette.assistant).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn welcome_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            WELCOME_MESSAGE,
            Style::default().fg(palette.assistant),
        )),
        Line::default(),
    ];

    if app.widget.show_common_questions() {
        lines.push(Line::from(Span::styled(
            "Common questions:",
            Style::default().fg(palette.muted).add_modifier(Modifier::BOLD),
        )));
        for (i, question) in COMMON_QUESTIONS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Style::default().fg(palette.accent).bold()),
                Span::raw(question.to_string()),
            ]));
        }
    }

    lines
}

fn render_chat(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    // Store chat area for mouse hit-testing and its inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(" Chat ");

    let text = if app.widget.log().is_empty() && !app.widget.is_pending() {
        Text::from(welcome_lines(app, palette))
    } else {
        Text::from(chat_lines(app, palette))
    };

    let chat = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let border_color = if app.input_mode == InputMode::Editing {
        palette.accent
    } else {
        palette.muted
    };

    let title = if app.widget.is_listening() {
        " Listening... "
    } else {
        " Type your message "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scroll to keep the cursor visible (inner width excludes borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let (first_visible, cursor_x) = input_window(&app.input, app.cursor, inner_width);

    let mut used = 0;
    let visible_text: String = app
        .input
        .chars()
        .skip(first_visible)
        .take_while(|&c| {
            used += cell_width(c);
            used <= inner_width
        })
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(palette.user))
        .block(block);
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing && app.alert.is_none() && !app.show_language_picker {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn cell_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

/// First visible char of the input and the cursor's column, in terminal cells.
/// Wide characters (CJK) take two cells, so the cursor is placed by width, not char count.
fn input_window(input: &str, cursor: usize, width: usize) -> (usize, u16) {
    if width == 0 {
        return (0, 0);
    }
    let widths: Vec<usize> = input.chars().map(cell_width).collect();
    let cursor = cursor.min(widths.len());

    let mut first = 0;
    let mut column: usize = widths[..cursor].iter().sum();
    // The cursor needs a free cell at the right edge
    while column >= width && first < cursor {
        column -= widths[first];
        first += 1;
    }
    (first, column.min(u16::MAX as usize) as u16)
}

fn render_footer(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(palette.accent).fg(palette.background),
        InputMode::Editing => Style::default().bg(palette.user).fg(palette.background),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " CHAT ",
        InputMode::Editing => " TYPING ",
    };

    let key_style = Style::default().bg(palette.muted).fg(palette.background);
    let label_style = Style::default().fg(palette.text);

    let mut hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" commands ", label_style),
        ],
        InputMode::Normal => {
            let mut hints = vec![
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
            ];
            if app.widget.show_common_questions() {
                hints.extend(vec![
                    Span::styled(" 1-5 ", key_style),
                    Span::styled(" ask ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" v ", key_style),
                Span::styled(" voice ", label_style),
                Span::styled(" t ", key_style),
                Span::styled(format!(" {} ", app.theme.icon()), label_style),
                Span::styled(" l ", key_style),
                Span::styled(" language ", label_style),
                Span::styled(" s ", key_style),
                Span::styled(" save ", label_style),
                Span::styled(" c ", key_style),
                Span::styled(" clear ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
    };

    if let Some(status) = &app.status {
        hints.push(Span::styled(format!("  {}", status), Style::default().fg(palette.accent)));
    }

    let footer = Line::from(
        vec![Span::styled(mode_text, mode_style), Span::raw(" ")]
            .into_iter()
            .chain(hints)
            .chain(std::iter::once(Span::styled(
                format!("  © {} MindGuard", chrono::Local::now().year()),
                Style::default().fg(palette.muted),
            )))
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(footer), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn render_language_picker(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let languages = Language::all();
    let popup_area = centered(area, 40, languages.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(" Language (Enter to select, Esc to cancel) ");

    let items: Vec<ListItem> = languages
        .iter()
        .map(|language| {
            let style = if *language == app.language {
                Style::default().fg(palette.assistant).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(format!(" {} ", language.display_name())).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().bg(palette.background))
        .highlight_style(
            Style::default()
                .bg(palette.accent)
                .fg(palette.background)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.language_picker_state);
}

fn render_alert(message: &str, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 50, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error))
        .title(" Notice (Enter to dismiss) ");

    let alert = Paragraph::new(message.to_string())
        .style(Style::default().bg(palette.background).fg(palette.text))
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(alert, popup_area);
}
