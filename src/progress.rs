use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ApiProgress {
    bar: ProgressBar,
}

impl ApiProgress {
    fn spinner(template: &str, message: String, tick: Duration) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        bar.set_message(message);
        bar.enable_steady_tick(tick);

        Self { bar }
    }

    pub fn new_submit(kind: &str) -> Self {
        Self::spinner(
            "🚀 {msg} {spinner:.green}",
            format!("Submitting {kind}..."),
            Duration::from_millis(80),
        )
    }

    pub fn new_polling(kind: &str) -> Self {
        Self::spinner(
            "⏳ {msg} {spinner:.yellow}",
            format!("Waiting for {kind} to finish processing..."),
            Duration::from_millis(120),
        )
    }

    pub fn new_lookup(kind: &str) -> Self {
        Self::spinner(
            "🔎 {msg} {spinner:.cyan}",
            format!("Fetching {kind}..."),
            Duration::from_millis(100),
        )
    }

    pub fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
