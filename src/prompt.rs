use std::io::{self, BufRead, Stderr, Stdin, StdinLock, Write};

/// 対話的な確認を抽象化する。`true` なら処理を続行する。
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// 行単位の入出力で y/n を尋ねる `Prompter`。
///
/// 入力が `y`/`yes` か `n`/`no` になるまで聞き直す。入力の終端や読み込み失敗は
/// 拒否として扱う。
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<StdinLock<'static>, Stderr> {
    /// 標準入力で回答を受け取るプロンプタを生成する。
    ///
    /// 質問は警告と同じ標準エラーへ出し、標準出力は結果だけにする。
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        loop {
            if write!(self.output, "{question} [y/n]: ")
                .and_then(|_| self.output.flush())
                .is_err()
            {
                return false;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => {
                    let _ = writeln!(self.output, "Please select one of the available options");
                }
            }
        }
    }
}
