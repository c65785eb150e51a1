use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use resumerrr_core::{Analysis, Message};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use crate::app::{App, Focus, HitTarget};
use crate::composer::Composer;

const USER_BUBBLE_BG: Color = Color::Rgb(47, 47, 47);
const AI_BUBBLE_BG: Color = Color::Rgb(42, 42, 42);
const ERROR_BUBBLE_BG: Color = Color::Rgb(61, 31, 31);
const ERROR_FG: Color = Color::Rgb(252, 165, 165);
const PROJECTS_BG: Color = Color::Rgb(26, 37, 54);
const PROJECTS_FG: Color = Color::Rgb(96, 165, 250);
const SKILLS_BG: Color = Color::Rgb(49, 41, 24);
const SKILLS_FG: Color = Color::Rgb(251, 191, 36);
const CHIP_BG: Color = Color::Rgb(60, 60, 60);

/// Narrowest a bubble is allowed to get, in columns
const MIN_BUBBLE_WIDTH: usize = 12;

/// Wrap text to fit within a given width, returning multiple lines.
/// Wraps at word boundaries, keeps explicit line breaks and splits words
/// longer than the width.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.width();

            if current_len > 0 && current_len + 1 + word_len <= width {
                // Word fits on current line
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
            }

            // Word starts a line; split it if it can never fit
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_len + w > width && current_len > 0 {
                    lines.push(std::mem::take(&mut current_line));
                    current_len = 0;
                }
                current_line.push(ch);
                current_len += w;
            }
        }

        // Blank paragraphs keep their line
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Shorten text to `max` columns, marking the cut with an ellipsis
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Lay rows out as a padded block with a shared background, aligned left or
/// right within `width`.
fn push_bubble(
    lines: &mut Vec<Line<'static>>,
    rows: Vec<Span<'static>>,
    bg: Style,
    width: usize,
    align_right: bool,
) {
    let inner_width = rows.iter().map(|s| s.width()).max().unwrap_or(0);
    let bubble_width = inner_width + 2;
    let indent = if align_right {
        width.saturating_sub(bubble_width)
    } else {
        0
    };

    for row in rows {
        let pad = inner_width.saturating_sub(row.width());
        let style = bg.patch(row.style);
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(indent)),
            Span::styled(" ", bg),
            Span::styled(row.content, style),
            Span::styled(" ".repeat(pad + 1), bg),
        ]));
    }
}

fn text_rows(text: &str, width: usize, style: Style) -> Vec<Span<'static>> {
    wrap_text_to_width(text, width)
        .into_iter()
        .map(|line| Span::styled(line, style))
        .collect()
}

/// Heading plus bulleted items, the way the answer's side panels look
fn list_panel_rows(title: &str, items: &[String], width: usize, accent: Color) -> Vec<Span<'static>> {
    let mut rows = vec![Span::styled(
        title.to_string(),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )];
    let item_style = Style::default().fg(Color::Rgb(209, 213, 219));

    for item in items {
        for (i, line) in wrap_text_to_width(item, width.saturating_sub(2)).into_iter().enumerate() {
            let prefix = if i == 0 { "• " } else { "  " };
            rows.push(Span::styled(format!("{}{}", prefix, line), item_style));
        }
    }
    rows
}

fn push_analysis(lines: &mut Vec<Line<'static>>, analysis: &Analysis, max_bubble: usize, width: usize) {
    let text_width = max_bubble.saturating_sub(2);

    push_bubble(
        lines,
        text_rows(&analysis.answer, text_width, Style::default().fg(Color::Rgb(232, 232, 232))),
        Style::default().bg(AI_BUBBLE_BG),
        width,
        false,
    );

    if !analysis.recommended_projects.is_empty() {
        push_bubble(
            lines,
            list_panel_rows("💡 Recommended Projects", &analysis.recommended_projects, text_width, PROJECTS_FG),
            Style::default().bg(PROJECTS_BG),
            width,
            false,
        );
    }

    if !analysis.skills_to_focus.is_empty() {
        push_bubble(
            lines,
            list_panel_rows("🎯 Skills to Focus On", &analysis.skills_to_focus, text_width, SKILLS_FG),
            Style::default().bg(SKILLS_BG),
            width,
            false,
        );
    }
}

/// Build the transcript as pre-wrapped lines for a given width
pub fn transcript_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let max_bubble = (width * app.viewport.bubble_percent() as usize / 100)
        .max(MIN_BUBBLE_WIDTH)
        .min(width);
    let text_width = max_bubble.saturating_sub(2);

    let mut lines: Vec<Line<'static>> = Vec::new();

    for (i, msg) in app.session.messages().iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }

        match msg {
            Message::User { content, attached_file_name } => {
                if let Some(name) = attached_file_name {
                    let chip = format!(" 📎 {} ", truncate_to_width(name, max_bubble.saturating_sub(5)));
                    let indent = width.saturating_sub(chip.width());
                    lines.push(Line::from(vec![
                        Span::raw(" ".repeat(indent)),
                        Span::styled(chip, Style::default().bg(CHIP_BG).fg(Color::Gray)),
                    ]));
                }
                push_bubble(
                    &mut lines,
                    text_rows(content, text_width, Style::default().fg(Color::White)),
                    Style::default().bg(USER_BUBBLE_BG),
                    width,
                    true,
                );
            }
            Message::Ai(analysis) => push_analysis(&mut lines, analysis, max_bubble, width),
            Message::Error { content } => {
                let text = format!("⚠ {}", content);
                push_bubble(
                    &mut lines,
                    text_rows(&text, text_width, Style::default().fg(ERROR_FG)),
                    Style::default().bg(ERROR_BUBBLE_BG),
                    width,
                    false,
                );
            }
        }
    }

    if app.session.is_submitting() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        push_bubble(
            &mut lines,
            vec![Span::styled(
                format!("Thinking{:<3}", dots),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )],
            Style::default().bg(AI_BUBBLE_BG),
            width,
            false,
        );
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    app.set_viewport(area.width);

    let composer_rows = Composer::desired_height(app.session.draft(), area.width.saturating_sub(2));
    let chip_height = if app.session.attachment().is_some() { 1 } else { 0 };

    // Main layout: header, transcript, attachment chip, composer, footer
    let [header_area, transcript_area, chip_area, composer_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(chip_height),
        Constraint::Length(composer_rows + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    render_attachment_chip(app, frame, chip_area);
    render_composer(app, frame, composer_area);
    render_footer(app, frame, footer_area);

    // Popups (in order of priority)
    if let Some(notice) = app.notice.clone() {
        render_notice(&notice, frame, area);
    } else if app.focus == Focus::AttachPrompt {
        render_attach_prompt(app, frame, area);
    }
}

fn new_chat_style(hovered: bool, enabled: bool) -> Style {
    match (enabled, hovered) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().fg(Color::White).bg(Color::Gray).bold(),
        (true, false) => Style::default().fg(Color::White).bg(Color::Rgb(60, 60, 60)),
    }
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Resumerrr ", Style::default().fg(Color::White).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);

    app.new_chat_area = None;
    if app.session.messages().is_empty() {
        return;
    }

    let label = if app.viewport.shows_button_labels() {
        " + New Chat "
    } else {
        " + "
    };
    let label_width = (label.width() as u16).min(area.width);
    let button_area = Rect::new(
        area.x + area.width.saturating_sub(label_width + 1),
        area.y,
        label_width,
        1,
    );

    let hovered = app.hovered == Some(HitTarget::NewChat);
    let enabled = !app.session.is_submitting();
    frame.render_widget(
        Paragraph::new(Span::styled(label, new_chat_style(hovered, enabled))),
        button_area,
    );
    app.new_chat_area = Some(button_area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    app.transcript_area = Some(area);
    let inner = Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height);
    app.transcript_height = inner.height;

    if app.session.messages().is_empty() && !app.session.is_submitting() {
        app.transcript_lines = 0;
        let placeholder = Paragraph::new("How can I help you today?")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, inner.height.min(1));
        frame.render_widget(placeholder, middle);
        return;
    }

    let lines = transcript_lines(app, inner.width);
    app.transcript_lines = lines.len().min(u16::MAX as usize) as u16;

    let max_scroll = app.transcript_lines.saturating_sub(app.transcript_height);
    if app.follow_tail {
        app.transcript_scroll = max_scroll;
    } else {
        app.transcript_scroll = app.transcript_scroll.min(max_scroll);
    }

    let transcript = Paragraph::new(lines).scroll((app.transcript_scroll, 0));
    frame.render_widget(transcript, inner);
}

fn render_attachment_chip(app: &mut App, frame: &mut Frame, area: Rect) {
    app.remove_attachment_area = None;
    let Some(name) = app.session.attachment().map(|a| a.name.clone()) else {
        return;
    };
    if area.height == 0 {
        return;
    }

    let chip = format!(" 📎 {} ", truncate_to_width(&name, area.width.saturating_sub(10) as usize));
    let chip_width = chip.width() as u16;

    let remove_style = if app.hovered == Some(HitTarget::RemoveAttachment) {
        Style::default().bg(Color::Rgb(239, 68, 68)).fg(Color::White).bold()
    } else {
        Style::default().bg(CHIP_BG).fg(Color::Gray)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(chip, Style::default().bg(CHIP_BG).fg(Color::White)),
        Span::styled(" ✕ ", remove_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    app.remove_attachment_area = Some(Rect::new(area.x + 1 + chip_width, area.y, 3, 1));
}

fn render_composer(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Composer && app.notice.is_none();
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };

    let send_hint = if app.session.is_submitting() {
        Span::styled(" waiting for reply ", Style::default().fg(Color::DarkGray).italic())
    } else if app.session.can_submit() {
        Span::styled(" Enter ↵ send ", Style::default().fg(Color::Yellow).bold())
    } else {
        Span::styled(" Enter ↵ send ", Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title_bottom(Line::from(send_hint).right_aligned());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if app.session.draft().is_empty() {
        let placeholder = Paragraph::new("Message").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        (0, 0)
    } else {
        let (rows, cursor) = app.composer.visible_rows(app.session.draft(), inner.width, inner.height);
        let text: Vec<Line> = rows.into_iter().map(Line::from).collect();
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(Color::White)), inner);
        cursor
    };

    if focused && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((inner.x + cursor.0, inner.y + cursor.1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match (app.focus, app.session.is_submitting()) {
        (Focus::AttachPrompt, _) => (" ATTACH ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        (Focus::Composer, true) => (" THINKING ", Style::default().bg(Color::Magenta).fg(Color::White)),
        (Focus::Composer, false) => (" CHAT ", Style::default().bg(Color::Blue).fg(Color::White)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        vec![
            Span::styled(key, key_style),
            Span::styled(label, label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match app.focus {
        Focus::AttachPrompt => {
            hints.extend(hint(" Enter ", " attach "));
            hints.extend(hint(" Esc ", " cancel "));
        }
        Focus::Composer => {
            hints.extend(hint(" Enter ", " send "));
            if app.viewport.shows_button_labels() {
                if app.keyboard_enhanced {
                    hints.extend(hint(" Shift+Enter ", " newline "));
                } else {
                    hints.extend(hint(" Alt+Enter ", " newline "));
                }
            }
            hints.extend(hint(" ^O ", " attach "));
            if app.session.attachment().is_some() {
                hints.extend(hint(" ^X ", " remove "));
            }
            if !app.session.messages().is_empty() && !app.session.is_submitting() {
                hints.extend(hint(" ^N ", " new chat "));
            }
            if app.viewport.shows_button_labels() {
                hints.extend(hint(" PgUp/PgDn ", " scroll "));
            }
            hints.extend(hint(" ^C ", " quit "));
        }
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height);
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn render_notice(notice: &crate::app::Notice, frame: &mut Frame, area: Rect) {
    let text_width = 50.min(area.width.saturating_sub(8)) as usize;
    let lines = wrap_text_to_width(&notice.text, text_width);
    let popup_area = centered_popup(area, text_width as u16 + 4, lines.len() as u16 + 4);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ERROR_FG))
        .title(format!(" {} ", notice.title));

    let mut text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    text.push(Line::default());
    text.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

fn render_attach_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 70, 6);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Attach résumé (PDF) ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 3 {
        return;
    }

    let instructions = Paragraph::new("Type or drop the path to a PDF. Enter to attach, Esc to cancel.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(instructions, Rect::new(inner.x, inner.y, inner.width, 1));

    // Single-line input, scrolled horizontally to keep the cursor visible
    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    let (visible_text, cursor_x) = single_line_view(
        &app.attach_input,
        app.attach_composer.cursor(),
        input_area.width as usize,
    );

    let input = Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan));
    frame.render_widget(input, input_area);
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));
}

/// The slice of a one-line input that fits in `width` columns with the
/// cursor (a char index) in view, plus the cursor's column in that slice.
fn single_line_view(text: &str, cursor: usize, width: usize) -> (String, u16) {
    if width == 0 {
        return (String::new(), 0);
    }
    let widths: Vec<usize> = text.chars().map(|c| c.width().unwrap_or(0)).collect();
    let cursor = cursor.min(widths.len());
    let cursor_col: usize = widths[..cursor].iter().sum();

    // Drop leading chars until the cursor cell fits
    let mut start = 0;
    let mut start_col = 0;
    while start < cursor && cursor_col - start_col >= width {
        start_col += widths[start];
        start += 1;
    }

    let mut used = 0;
    let visible: String = text
        .chars()
        .zip(widths.iter())
        .skip(start)
        .take_while(|(_, w)| {
            used += **w;
            used <= width
        })
        .map(|(c, _)| c)
        .collect();

    let cursor_x = u16::try_from(cursor_col - start_col).unwrap_or(u16::MAX);
    (visible, cursor_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use resumerrr_core::{AnalyzerClient, Reply};

    fn test_app() -> App {
        App::new(AnalyzerClient::new("http://127.0.0.1:9/analyze"), true)
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_reply(question: &str, reply: Reply) -> App {
        let mut app = test_app();
        app.session.draft_mut().push_str(question);
        app.session.begin_submission().unwrap();
        app.session.finish_submission(Ok(reply));
        app
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs_and_splits_long_words() {
        assert_eq!(wrap_text_to_width("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text_to_width("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_single_line_view_measures_wide_chars() {
        let path = "目录/简历.pdf";

        let (visible, cursor_x) = single_line_view(path, path.chars().count(), 6);
        assert_eq!(visible, ".pdf");
        assert_eq!(cursor_x, 4);

        let (visible, cursor_x) = single_line_view(path, 2, 6);
        assert_eq!(visible, "目录/");
        assert_eq!(cursor_x, 4);
        assert!(visible.width() <= 6);
    }

    #[test]
    fn test_single_line_view_ascii_scrolls_to_cursor() {
        let (visible, cursor_x) = single_line_view("/home/me/cv.pdf", 15, 10);
        assert_eq!(visible, "me/cv.pdf");
        assert_eq!(cursor_x, 9);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("resume.pdf", 20), "resume.pdf");
        assert_eq!(truncate_to_width("a-very-long-resume.pdf", 8), "a-very-…");
    }

    #[test]
    fn test_empty_transcript_shows_placeholder_only() {
        let mut app = test_app();
        let screen = render_to_string(&mut app, 100, 20);
        assert!(screen.contains("How can I help you today?"));
        assert!(!screen.contains("New Chat"));
    }

    #[test]
    fn test_skills_panel_without_projects_panel() {
        let mut app = app_with_reply(
            "Review my resume",
            Reply::Analysis(Analysis {
                answer: "Looks solid".to_string(),
                recommended_projects: vec![],
                skills_to_focus: vec!["SQL".to_string()],
            }),
        );

        let screen = render_to_string(&mut app, 100, 30);
        assert!(screen.contains("Review my resume"));
        assert!(screen.contains("Looks solid"));
        assert!(screen.contains("Skills to Focus On"));
        assert!(screen.contains("• SQL"));
        assert!(!screen.contains("Recommended Projects"));
        assert!(!screen.contains("How can I help you today?"));
    }

    #[test]
    fn test_user_bubble_is_right_aligned_and_ai_left() {
        let app = app_with_reply(
            "hi",
            Reply::Analysis(Analysis {
                answer: "hello".to_string(),
                ..Default::default()
            }),
        );

        let lines = transcript_lines(&app, 40);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text[0].ends_with(" hi "));
        assert_eq!(text[0].width(), 40);
        assert!(text[2].starts_with(" hello "));
    }

    #[test]
    fn test_attached_file_chip_on_user_message() {
        let mut app = test_app();
        app.session.attach(resumerrr_core::Attachment::from_bytes("resume.pdf", vec![]).unwrap());
        app.session.draft_mut().push_str("Review my resume");
        app.session.begin_submission().unwrap();

        let lines = transcript_lines(&app, 60);
        assert!(lines[0].to_string().contains("resume.pdf"));
        assert!(lines[1].to_string().contains("Review my resume"));
    }

    #[test]
    fn test_thinking_indicator_while_submitting() {
        let mut app = test_app();
        app.session.draft_mut().push_str("Hello");
        app.session.begin_submission().unwrap();

        let screen = render_to_string(&mut app, 100, 20);
        assert!(screen.contains("Thinking"));
        assert_eq!(app.session.messages().len(), 1);
    }

    #[test]
    fn test_error_message_rendered() {
        let mut app = app_with_reply("Hello", Reply::Failure("PDF unreadable".to_string()));
        let screen = render_to_string(&mut app, 100, 20);
        assert!(screen.contains("PDF unreadable"));
    }

    #[test]
    fn test_new_chat_label_hidden_on_narrow_viewport() {
        let mut app = app_with_reply("Hello", Reply::Unrecognized);

        let wide = render_to_string(&mut app, 100, 20);
        assert!(wide.contains("New Chat"));
        assert!(app.new_chat_area.is_some());

        let narrow = render_to_string(&mut app, 40, 20);
        assert!(!narrow.contains("New Chat"));
        assert!(app.new_chat_area.is_some());
    }

    #[test]
    fn test_composer_grows_with_draft() {
        let mut app = test_app();
        render_to_string(&mut app, 60, 20);
        let empty_height = app.transcript_height;

        app.session.draft_mut().push_str("one\ntwo\nthree");
        render_to_string(&mut app, 60, 20);
        assert_eq!(app.transcript_height, empty_height - 2);
    }

    #[test]
    fn test_follow_tail_scrolls_to_newest() {
        let mut app = test_app();
        for i in 0..10 {
            app.session.draft_mut().push_str(&format!("question {}", i));
            app.session.begin_submission().unwrap();
            app.session.finish_submission(Ok(Reply::Failure(format!("answer {}", i))));
        }

        let screen = render_to_string(&mut app, 80, 16);
        assert!(screen.contains("answer 9"));
        assert!(!screen.contains("question 0"));
        assert!(app.transcript_scroll > 0);
    }
}
