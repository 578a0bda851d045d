//! Human-readable progress lines on stdout.
//!
//! This is the user-facing channel; structured diagnostics go through
//! `tracing` instead. A quiet console swallows everything, which is what the
//! tests use.

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn line(&self, text: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", text.as_ref());
        }
    }

    pub fn banner(&self, title: &str) {
        self.line(format!("🚀 {title}"));
        self.line("=".repeat(50));
    }

    pub fn blank(&self) {
        self.line("");
    }

    pub fn step(&self, description: &str) {
        self.line(format!("📋 {description}..."));
    }

    pub fn ok(&self, message: &str) {
        self.line(format!("✅ {message}"));
    }

    pub fn fail(&self, message: &str) {
        self.line(format!("❌ {message}"));
    }

    pub fn warn(&self, message: &str) {
        self.line(format!("⚠️ {message}"));
    }

    pub fn info(&self, message: &str) {
        self.line(format!("ℹ️ {message}"));
    }

    pub fn upload(&self, index: usize, total: usize, path: &str) {
        self.line(format!("📤 Uploading ({index}/{total}): {path}"));
    }

    /// Indented per-item result under an [`Console::upload`] line.
    pub fn item(&self, ok: bool, message: &str) {
        let glyph = if ok { "✅" } else { "❌" };
        self.line(format!("  {glyph} {message}"));
    }

    pub fn done(&self, message: &str) {
        self.line(format!("🎉 {message}"));
    }

    pub fn link(&self, label: &str, url: &str) {
        self.line(format!("🔗 {label}: {url}"));
    }

    pub fn plain(&self, text: &str) {
        self.line(text);
    }
}
