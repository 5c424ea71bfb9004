use colored::{Color, Colorize};

/// 端末への結果表示を担当する。
///
/// 色付けの有無はこの値が持ち、`colored` のグローバル設定には触れない。
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// 成功メッセージ。quiet モードでは表示しない。
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(message, Color::Green));
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.paint(message, Color::Yellow));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(message, Color::Red));
    }

    fn paint(&self, message: &str, color: Color) -> String {
        if self.color {
            message.color(color).to_string()
        } else {
            message.to_string()
        }
    }
}
