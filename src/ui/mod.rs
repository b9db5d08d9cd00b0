pub mod field;

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::sim::GamePhase;
use field::FieldPainter;

const OVERLAY_BG: Color = Color::Rgb(15, 15, 25);
const ACCENT: Color = Color::Rgb(130, 220, 255);
const DIM: Color = Color::Rgb(100, 100, 130);

/// Title text box in logical pixels before pulsing.
const TITLE_BASE: Vec2 = Vec2::new(560.0, 110.0);
const GAME_OVER_BASE: Vec2 = Vec2::new(600.0, 110.0);

/// Breathing size for overlay titles: ±40 wide and ±10 tall, period 4.
pub fn pulse_scale(base: Vec2, t: f32) -> Vec2 {
    let s = (FRAC_PI_2 * t).sin();
    Vec2::new(base.x + 40.0 * s, base.y + 10.0 * s)
}

/// Logical field point to a cell inside `area`.
fn field_to_cell(area: Rect, field: Vec2, at: Vec2) -> (u16, u16) {
    let x = at.x / field.x * area.width as f32;
    let y = at.y / field.y * area.height as f32;
    (
        area.x + (x as u16).min(area.width.saturating_sub(1)),
        area.y + (y as u16).min(area.height.saturating_sub(1)),
    )
}

/// Rect of `w`×`h` cells centred on `center`, kept inside `area`.
fn centered_at(area: Rect, center: (u16, u16), w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = center.0.saturating_sub(w / 2).clamp(area.x, area.right().saturating_sub(w));
    let y = center.1.saturating_sub(h / 2).clamp(area.y, area.bottom().saturating_sub(h));
    Rect::new(x, y, w, h)
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" Asteroids ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(4),    // Field
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

    render_status(frame, app, chunks[0]);

    let session = &app.session;
    let field_area = chunks[1];
    if field_area.width > 0 && field_area.height > 0 {
        let mut painter = FieldPainter::new(
            field_area.width as usize,
            field_area.height as usize,
            session.bounds(),
            app.frames(),
        );
        for drawable in session.drawables() {
            painter.draw(&drawable);
        }
        frame.render_widget(Paragraph::new(painter.into_lines()), field_area);

        match session.phase() {
            GamePhase::Title => render_title(frame, app, field_area),
            GamePhase::GameOver => render_game_over(frame, app, field_area),
            GamePhase::Playing => {}
        }
    }

    render_help(frame, session.phase(), chunks[2]);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
    let status = Line::from(vec![
        Span::styled(" \u{2604} ", Style::default()),
        Span::styled(
            format!("Score: {} ", session.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("Lives: {} ", session.lives().max(0)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(format!("High: {} ", session.high_score()), Style::default().fg(Color::Cyan)),
        sep(),
        Span::styled(
            format!("Rocks: {} ", session.asteroids().len()),
            Style::default().fg(Color::Rgb(160, 140, 120)),
        ),
        sep(),
        Span::styled(format!("FPS: {} ", app.fps()), Style::default().fg(Color::Green)),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

/// Pulsing boxed title centred on a logical field point.
fn render_pulsing_title(frame: &mut Frame, app: &App, area: Rect, text: &str, base: Vec2, at: Vec2, color: Color) {
    let field = app.session.bounds();
    let size = pulse_scale(base, app.session.pulse_time());
    let min_w = text.chars().count() as u16 + 4;
    let w = ((size.x / field.x * area.width as f32) as u16).max(min_w);
    let h = ((size.y / field.y * area.height as f32) as u16).max(3);
    let rect = centered_at(area, field_to_cell(area, field, at), w, h);

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(OVERLAY_BG));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    // Vertically centre the single line
    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_caption(frame: &mut Frame, app: &App, area: Rect, at: Vec2, line: Line<'static>) {
    let w = line.width() as u16 + 2;
    let rect = centered_at(area, field_to_cell(area, app.session.bounds(), at), w, 1);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .style(Style::default().bg(OVERLAY_BG)),
        rect,
    );
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mid = app.session.bounds().x / 2.0;
    render_pulsing_title(frame, app, area, "ASTEROIDS", TITLE_BASE, Vec2::new(mid, 275.0), ACCENT);
    render_caption(
        frame,
        app,
        area,
        Vec2::new(mid, 400.0),
        Line::from(Span::styled(
            "PRESS ENTER OR CLICK TO START",
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )),
    );
}

fn render_game_over(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let mid = session.bounds().x / 2.0;
    render_pulsing_title(
        frame,
        app,
        area,
        "GAME OVER",
        GAME_OVER_BASE,
        Vec2::new(mid, 225.0),
        Color::Rgb(255, 90, 90),
    );
    render_caption(
        frame,
        app,
        area,
        Vec2::new(mid, 350.0),
        Line::from(Span::styled(
            "PRESS ENTER OR CLICK TO RESTART",
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )),
    );
    render_caption(
        frame,
        app,
        area,
        Vec2::new(mid, 480.0),
        Line::from(Span::styled(
            format!("SCORE: {}", session.score()),
            Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
        )),
    );
    if session.new_high_score() {
        render_caption(
            frame,
            app,
            area,
            Vec2::new(mid, 600.0),
            Line::from(Span::styled(
                "\u{2605} NEW HIGH SCORE \u{2605}",
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
            )),
        );
    }
}

fn render_help(frame: &mut Frame, phase: GamePhase, area: Rect) {
    let sep = || Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60)));
    let key = |s: &'static str| Span::styled(s, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let text = |s: &'static str| Span::styled(s, Style::default().fg(DIM));
    let line = match phase {
        GamePhase::Playing => Line::from(vec![
            key(" \u{2190}\u{2192}/AD"),
            text(" Rotate "),
            sep(),
            key("\u{2191}/W"),
            text(" Thrust "),
            sep(),
            Span::styled("Space", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            text(" Shoot "),
            sep(),
            key("Q/Esc"),
            text(" Quit"),
        ]),
        GamePhase::Title | GamePhase::GameOver => Line::from(vec![
            key(" Enter/Click"),
            text(" Start "),
            sep(),
            key("Q/Esc"),
            text(" Quit"),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_scale_swings_around_base() {
        let base = Vec2::new(300.0, 100.0);
        assert_eq!(pulse_scale(base, 0.0), base);
        let peak = pulse_scale(base, 1.0);
        assert!((peak - Vec2::new(340.0, 110.0)).length() < 1e-3);
        let trough = pulse_scale(base, 3.0);
        assert!((trough - Vec2::new(260.0, 90.0)).length() < 1e-3);
    }

    #[test]
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(2, 3, 40, 10);
        let rect = centered_at(area, (2, 3), 20, 4);
        assert_eq!(rect, Rect::new(2, 3, 20, 4));
        let rect = centered_at(area, (41, 12), 20, 4);
        assert_eq!(rect.right(), area.right());
        assert_eq!(rect.bottom(), area.bottom());
        let rect = centered_at(area, (20, 8), 80, 20);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_field_point_maps_into_area() {
        let area = Rect::new(1, 1, 64, 18);
        let field = Vec2::new(1280.0, 720.0);
        assert_eq!(field_to_cell(area, field, Vec2::new(640.0, 360.0)), (33, 10));
        assert_eq!(field_to_cell(area, field, field), (64, 18));
    }
}
