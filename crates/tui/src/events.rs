use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseEventKind};
use ratatui::{backend::Backend, layout::Rect, Terminal};

use crate::{app::App, ui};

pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => {
                    app.insert_text(&s);
                    app.dirty = true;
                }
                Event::Resize(_, _) => app.dirty = true,
                Event::Mouse(me) => {
                    if let Some(area) = app.response_area {
                        if contains(area, me.column, me.row) {
                            match me.kind {
                                MouseEventKind::ScrollUp => {
                                    app.response_scroll = app.response_scroll.saturating_sub(3);
                                    app.dirty = true;
                                }
                                MouseEventKind::ScrollDown => {
                                    app.response_scroll = app.response_scroll.saturating_add(3);
                                    app.dirty = true;
                                }
                                _ => {}
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
