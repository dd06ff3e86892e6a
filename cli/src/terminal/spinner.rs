use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TIP_DURATION: Duration = Duration::from_secs(2);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(1);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &[
    "You can press 'q' to finish early",
    "Use --deadline-secs to bound the whole scan",
    "Pass --domain-user to collect OS and hardware details",
];

/// Style of the progress line attached to `indicatif.pb_show` spans.
pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Drives the message of a span's progress line, rotating tips while the
/// engine has nothing new to say.
pub struct SpinnerHandle {
    tx: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    pub fn start(span: Span) -> Self {
        let (tx, rx) = mpsc::channel::<String>();

        let worker = thread::spawn(move || {
            let mut tip_index = 0;
            let mut next_action_time = Instant::now() + TIP_DURATION;
            let mut is_showing_tip = false;
            let mut last_tip_time = Instant::now();

            loop {
                let wait_time = next_action_time.saturating_duration_since(Instant::now());

                match rx.recv_timeout(wait_time) {
                    Ok(mut msg) => {
                        if is_showing_tip {
                            let elapsed = last_tip_time.elapsed();
                            if elapsed < MIN_TIP_VISIBILITY {
                                thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                            }
                            is_showing_tip = false;
                        }
                        while let Ok(newer_msg) = rx.try_recv() {
                            msg = newer_msg;
                        }
                        span.pb_set_message(&msg);
                        next_action_time = Instant::now() + MESSAGE_READ_TIME;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let tip = TIPS[tip_index % TIPS.len()];
                        span.pb_set_message(&format!("{}", tip.italic().white()));

                        tip_index += 1;
                        is_showing_tip = true;
                        last_tip_time = Instant::now();
                        next_action_time = Instant::now() + TIP_DURATION;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn send_to_queue(&self, message: String) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(message);
        }
    }

    /// Stops the message thread and waits for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn report_phase(handle: &SpinnerHandle, phase: &str, count: usize) {
    handle.send_to_queue(format!(
        "{} {} addresses...",
        phase,
        count.to_string().green().bold()
    ));
}
