//! Terminal event loop.
//!
//! Draws the page, then waits for whichever comes first: the next terminal
//! event or the next click-timer deadline. The page clock follows wall time
//! from the moment the loop starts.

use std::io;
use std::time::Duration;

use crossterm::event::EventStream;
use futures_util::StreamExt;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::event::input::InputEvent;
use crate::page::Page;
use crate::render::Driver;

/// Restores the terminal when dropped, including on early return or panic
/// unwinding out of the loop.
struct TerminalGuard {
    driver: Driver,
}

impl TerminalGuard {
    fn enter(mut driver: Driver) -> io::Result<Self> {
        driver.enter()?;
        Ok(Self { driver })
    }

    fn draw(&mut self, page: &Page) -> io::Result<()> {
        let strips = page.render().to_strips(page.theme());
        self.driver.draw(&strips)?;
        self.driver.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.driver.leave() {
            warn!(%err, "failed to restore the terminal");
        }
    }
}

/// Run `page` on the real terminal until it is asked to quit (Ctrl+C or
/// [`Page::request_quit`]) or the terminal event stream ends.
pub async fn run(page: &mut Page) -> io::Result<()> {
    let (width, height) = Driver::terminal_size()?;
    page.handle_input(InputEvent::Resize { width, height });

    let mut terminal = TerminalGuard::enter(Driver::new()?)?;
    let mut events = EventStream::new();
    let origin = Instant::now().checked_sub(page.now()).unwrap_or_else(Instant::now);
    debug!(width, height, "event loop started");

    while !page.should_quit() {
        terminal.draw(page)?;

        tokio::select! {
            next = events.next() => match next {
                Some(Ok(event)) => {
                    if let Some(input) = InputEvent::from_crossterm(event) {
                        page.handle_input(input);
                    }
                }
                Some(Err(err)) => return Err(err),
                None => break,
            },
            _ = sleep_for(page.next_timer_in()) => {}
        }
        page.advance_to(origin.elapsed());
    }
    debug!("event loop finished");
    Ok(())
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}
