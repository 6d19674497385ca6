//! Single-threaded driver loop that owns the controller. User commands,
//! queue messages and finished teardowns multiplex over one channel, so the
//! controller is only ever touched from this loop.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{after, never, select, Sender};
use menu_core::{ActionKeySource, MenuMessage, MessageQueue, PowerMenuController, SystemSignal};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::host::{LoggingControls, TerminalHost};

pub enum LoopEvent {
    Menu(MenuMessage, Option<Duration>),
    Command(String),
    DismissCompleted,
}

#[derive(Clone)]
struct LoopQueue {
    events: Sender<LoopEvent>,
}

impl MessageQueue for LoopQueue {
    fn post(&self, message: MenuMessage) {
        if self.events.send(LoopEvent::Menu(message, None)).is_err() {
            warn!("event loop is gone, dropping message");
        }
    }

    fn post_delayed(&self, message: MenuMessage, delay: Duration) {
        if self
            .events
            .send(LoopEvent::Menu(message, Some(delay)))
            .is_err()
        {
            warn!("event loop is gone, dropping delayed message");
        }
    }
}

struct SettingsKeys(Settings);

impl ActionKeySource for SettingsKeys {
    fn action_keys(&self) -> Vec<String> {
        self.0.action_keys.clone()
    }
}

struct ContextFlags {
    keyguard_showing: bool,
    device_provisioned: bool,
}

pub fn run(settings: Settings, keyguard_showing: bool, device_provisioned: bool) -> Result<()> {
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    spawn_stdin_reader(events_tx.clone());

    let mut controller = PowerMenuController::new(
        Arc::new(SettingsKeys(settings)),
        Arc::new(LoggingControls),
        TerminalHost::new(events_tx.clone()),
        Box::new(LoopQueue { events: events_tx }),
    );
    let mut flags = ContextFlags {
        keyguard_showing,
        device_provisioned,
    };

    println!(
        "commands: show | lock | unlock | provision | press <row> | long <row> | \
         signal screen-off | signal close [reason] | quit"
    );

    let mut deferred: Vec<(Instant, MenuMessage)> = Vec::new();
    loop {
        let timer = match deferred.iter().map(|(due, _)| *due).min() {
            Some(due) => after(due.saturating_duration_since(Instant::now())),
            None => never(),
        };
        select! {
            recv(events_rx) -> event => match event {
                Ok(LoopEvent::Menu(message, Some(delay))) => {
                    deferred.push((Instant::now() + delay, message));
                }
                Ok(LoopEvent::Menu(message, None)) => deliver(&mut controller, message),
                Ok(LoopEvent::DismissCompleted) => controller.on_dismissed(),
                Ok(LoopEvent::Command(line)) => {
                    if !handle_command(&mut controller, &mut flags, line.trim()) {
                        break;
                    }
                }
                Err(_) => break,
            },
            recv(timer) -> _ => {
                for message in take_due(&mut deferred, Instant::now()) {
                    deliver(&mut controller, message);
                }
            }
        }
    }

    info!("power menu loop stopped");
    Ok(())
}

fn spawn_stdin_reader(events: Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if events.send(LoopEvent::Command(line)).is_err() {
                return;
            }
        }
        let _ = events.send(LoopEvent::Command("quit".to_string()));
    });
}

fn deliver(controller: &mut PowerMenuController<TerminalHost>, message: MenuMessage) {
    if let Err(error) = controller.handle_message(message) {
        error!(%error, "menu message failed");
    }
}

fn handle_command(
    controller: &mut PowerMenuController<TerminalHost>,
    flags: &mut ContextFlags,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("show") => {
            if let Err(error) =
                controller.show_dialog(flags.keyguard_showing, flags.device_provisioned)
            {
                error!(%error, "show failed");
            }
        }
        Some("lock") => {
            flags.keyguard_showing = true;
            info!("keyguard on");
        }
        Some("unlock") => {
            flags.keyguard_showing = false;
            info!("keyguard off");
        }
        Some("provision") => {
            flags.device_provisioned = true;
            info!("device provisioned");
        }
        Some("press") => dispatch_row(controller, parts.next(), false),
        Some("long") => dispatch_row(controller, parts.next(), true),
        Some("signal") => match parts.next() {
            Some("screen-off") => controller.handle_signal(SystemSignal::ScreenOff),
            Some("close") => controller.handle_signal(SystemSignal::CloseSystemDialogs {
                reason: parts.next().map(str::to_string),
            }),
            _ => warn!("usage: signal screen-off | signal close [reason]"),
        },
        Some("quit") => return false,
        Some(other) => warn!(command = other, "unknown command"),
        None => {}
    }
    true
}

fn dispatch_row(
    controller: &mut PowerMenuController<TerminalHost>,
    row: Option<&str>,
    long: bool,
) {
    let Some(Ok(index)) = row.map(str::parse::<usize>) else {
        warn!("usage: press <row> | long <row>");
        return;
    };
    if !controller
        .visible_count()
        .is_some_and(|count| index < count)
    {
        warn!(index, "no such visible row");
        return;
    }
    if long {
        let handled = controller.on_item_long_press(index);
        info!(handled, "long press dispatched");
    } else if let Err(error) = controller.on_item_press(index) {
        error!(%error, "press effect failed");
    }
}

fn take_due(deferred: &mut Vec<(Instant, MenuMessage)>, now: Instant) -> Vec<MenuMessage> {
    let mut due = Vec::new();
    deferred.retain(|(when, message)| {
        if *when <= now {
            due.push(*message);
            false
        } else {
            true
        }
    });
    due
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use menu_core::MenuMessage;

    use super::take_due;

    #[test]
    fn take_due_splits_by_deadline_and_keeps_order() {
        let now = Instant::now();
        let later = now + Duration::from_millis(300);
        let mut deferred = vec![
            (now, MenuMessage::Dismiss),
            (later, MenuMessage::Show),
            (now, MenuMessage::Refresh),
        ];

        let due = take_due(&mut deferred, now);

        assert_eq!(due, [MenuMessage::Dismiss, MenuMessage::Refresh]);
        assert_eq!(deferred, [(later, MenuMessage::Show)]);
    }

    #[test]
    fn take_due_with_nothing_due_leaves_queue_untouched() {
        let later = Instant::now() + Duration::from_secs(5);
        let mut deferred = vec![(later, MenuMessage::Show)];

        assert!(take_due(&mut deferred, Instant::now()).is_empty());
        assert_eq!(deferred.len(), 1);
    }
}
