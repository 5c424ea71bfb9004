use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::expand_home;

/// 問い合わせコマンドの出力を文字列にするときの解釈方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// Reject output that is not valid UTF-8
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// Replace invalid UTF-8 sequences with U+FFFD
    #[value(name = "utf-8-lossy")]
    Utf8Lossy,
}

impl Encoding {
    fn decode(self, bytes: Vec<u8>) -> Result<String, String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes)
                .map_err(|e| format!("output is not valid utf-8: {e}")),
            Self::Utf8Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

/// スクリーンショットの保存先を表示する外部コマンド。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    program: String,
    args: Vec<String>,
}

impl LocationQuery {
    /// 実行環境の既定の問い合わせコマンドを返す。
    #[cfg(target_os = "macos")]
    pub fn platform_default() -> Self {
        Self {
            program: "defaults".to_string(),
            args: vec![
                "read".to_string(),
                "com.apple.screencapture".to_string(),
                "location".to_string(),
            ],
        }
    }

    /// 実行環境の既定の問い合わせコマンドを返す。
    #[cfg(not(target_os = "macos"))]
    pub fn platform_default() -> Self {
        Self {
            program: "xdg-user-dir".to_string(),
            args: vec!["PICTURES".to_string()],
        }
    }

    /// `[program, args...]` 形式から組み立てる。空なら `None`。
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// コマンドを実行し、前後の空白を除いた出力をディレクトリとして返す。
    pub fn run(&self, encoding: Encoding) -> Result<PathBuf, String> {
        let rendered = self.render();
        log::debug!("querying screenshot location with `{rendered}`");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| format!("shot: cannot run '{rendered}': {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "shot: '{rendered}' failed with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let stdout = encoding
            .decode(output.stdout)
            .map_err(|e| format!("shot: '{rendered}' {e}"))?;
        let location = stdout.trim();
        if location.is_empty() {
            return Err(format!("shot: '{rendered}' printed no directory"));
        }

        Ok(expand_home(Path::new(location)))
    }
}

/// 明示指定があればそれを、なければ問い合わせ結果をソースディレクトリとする。
pub fn resolve_source(
    explicit: Option<&Path>,
    query: &LocationQuery,
    encoding: Encoding,
) -> Result<PathBuf, String> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => {
            let dir = query.run(encoding)?;
            log::debug!("screenshot location resolved to {}", dir.display());
            Ok(dir)
        }
    }
}
