use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, Focus, HitTarget};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await,
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(width, _) => app.set_viewport(width),
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        app.should_quit = true;
        return;
    }

    // A notice swallows everything until dismissed
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }

    match app.focus {
        Focus::Composer => handle_composer_key(app, key),
        Focus::AttachPrompt => handle_attach_prompt_key(app, key).await,
    }
}

fn handle_composer_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let newline_modifier = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    match key.code {
        KeyCode::Enter if newline_modifier => {
            app.composer.insert_char(app.session.draft_mut(), '\n');
        }
        KeyCode::Enter => app.submit(),
        // Ctrl+J is a newline on terminals that can't report Shift+Enter
        KeyCode::Char('j') if ctrl => {
            app.composer.insert_char(app.session.draft_mut(), '\n');
        }

        KeyCode::Char('o') if ctrl => app.open_attach_prompt(),
        KeyCode::Char('x') if ctrl => app.remove_attachment(),
        KeyCode::Char('n') if ctrl => app.new_chat(),

        KeyCode::PageUp => {
            let lines = app.half_page();
            app.scroll_transcript_up(lines);
        }
        KeyCode::PageDown => {
            let lines = app.half_page();
            app.scroll_transcript_down(lines);
        }
        KeyCode::Esc => app.scroll_transcript_to_bottom(),

        KeyCode::Backspace => app.composer.backspace(app.session.draft_mut()),
        KeyCode::Delete => app.composer.delete(app.session.draft_mut()),
        KeyCode::Left => app.composer.move_left(),
        KeyCode::Right => app.composer.move_right(app.session.draft()),
        KeyCode::Home => app.composer.move_home(),
        KeyCode::End => app.composer.move_end(app.session.draft()),
        KeyCode::Char(c) if !ctrl => {
            app.composer.insert_char(app.session.draft_mut(), c);
        }
        _ => {}
    }
}

async fn handle_attach_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_attach_prompt(),
        KeyCode::Enter => app.confirm_attach_prompt().await,
        KeyCode::Backspace => app.attach_composer.backspace(&mut app.attach_input),
        KeyCode::Delete => app.attach_composer.delete(&mut app.attach_input),
        KeyCode::Left => app.attach_composer.move_left(),
        KeyCode::Right => app.attach_composer.move_right(&app.attach_input),
        KeyCode::Home => app.attach_composer.move_home(),
        KeyCode::End => app.attach_composer.move_end(&app.attach_input),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.attach_composer.insert_char(&mut app.attach_input, c);
        }
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.notice.is_some() {
        return;
    }
    match app.focus {
        Focus::Composer => app.composer.insert_str(app.session.draft_mut(), text),
        Focus::AttachPrompt => {
            // Paths are single-line
            let single_line = text.replace(['\r', '\n'], "");
            app.attach_composer.insert_str(&mut app.attach_input, &single_line);
        }
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn hit_test(app: &App, x: u16, y: u16) -> Option<HitTarget> {
    let hit = |area: Option<Rect>| area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    if hit(app.new_chat_area) {
        Some(HitTarget::NewChat)
    } else if hit(app.remove_attachment_area) {
        Some(HitTarget::RemoveAttachment)
    } else {
        None
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    // Overlays are modal
    if app.notice.is_some() || app.focus != Focus::Composer {
        app.hovered = None;
        return;
    }

    let in_transcript = app.transcript_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::Moved => {
            app.hovered = hit_test(app, x, y);
        }
        MouseEventKind::Down(MouseButton::Left) => match hit_test(app, x, y) {
            Some(HitTarget::NewChat) => app.new_chat(),
            Some(HitTarget::RemoveAttachment) => app.remove_attachment(),
            None => {}
        },
        MouseEventKind::ScrollUp if in_transcript => app.scroll_transcript_up(3),
        MouseEventKind::ScrollDown if in_transcript => app.scroll_transcript_down(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use resumerrr_core::{AnalyzerClient, Message};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c), KeyModifiers::NONE)).await.unwrap();
        }
    }

    fn test_app() -> App {
        // Port 9 (discard) on loopback is never expected to answer HTTP
        App::new(AnalyzerClient::new("http://127.0.0.1:9/analyze"), true)
    }

    #[tokio::test]
    async fn test_shift_enter_inserts_newline() {
        let mut app = test_app();
        type_text(&mut app, "line one").await;
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT)).await.unwrap();
        type_text(&mut app, "two").await;

        assert_eq!(app.session.draft(), "line one\ntwo");
        assert!(app.session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_enter_submits() {
        let mut app = test_app();
        type_text(&mut app, "Review my resume").await;
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)).await.unwrap();

        assert_eq!(app.session.messages(), &[Message::user("Review my resume", None)]);
        assert_eq!(app.session.draft(), "");
        assert!(app.session.is_submitting());
    }

    #[tokio::test]
    async fn test_enter_on_blank_draft_does_nothing() {
        let mut app = test_app();
        type_text(&mut app, "   ").await;
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)).await.unwrap();

        assert!(app.session.messages().is_empty());
        assert!(!app.is_waiting_for_reply());
    }

    #[tokio::test]
    async fn test_notice_blocks_input_until_dismissed() {
        let mut app = test_app();
        app.notice = Some(crate::app::Notice {
            title: "Attachment".to_string(),
            text: "Please upload a PDF file only".to_string(),
        });

        type_text(&mut app, "hi").await;
        assert_eq!(app.session.draft(), "");

        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE)).await.unwrap();
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_attach_prompt_rejects_non_pdf() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Char('o'), KeyModifiers::CONTROL)).await.unwrap();
        assert_eq!(app.focus, Focus::AttachPrompt);

        handle_event(&mut app, AppEvent::Paste("/tmp/photo.png".to_string())).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)).await.unwrap();

        assert_eq!(app.focus, Focus::Composer);
        assert!(app.notice.is_some());
        assert!(app.session.attachment().is_none());
    }

    #[tokio::test]
    async fn test_hover_tracks_new_chat_button() {
        let mut app = test_app();
        app.new_chat_area = Some(Rect::new(70, 0, 10, 1));

        let moved = |column, row| {
            AppEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };

        handle_event(&mut app, moved(72, 0)).await.unwrap();
        assert_eq!(app.hovered, Some(HitTarget::NewChat));

        handle_event(&mut app, moved(10, 5)).await.unwrap();
        assert_eq!(app.hovered, None);
    }
}
