use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// No input within the tick interval; drives the live WPM readout.
    Tick,
    Resize,
}

/// Reads terminal events on a background thread and forwards them.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(_, _)) => Some(AppEvent::Resize),
                        Ok(_) => None,
                        Err(e) => {
                            tracing::error!(error = %e, "terminal event read failed");
                            return;
                        }
                    },
                    Ok(false) => Some(AppEvent::Tick),
                    Err(e) => {
                        tracing::error!(error = %e, "terminal event poll failed");
                        return;
                    }
                };
                if let Some(ev) = next
                    && tx.send(ev).is_err()
                {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
