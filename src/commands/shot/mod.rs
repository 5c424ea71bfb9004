use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Config, expand_home};
use crate::prompt::Prompter;
use crate::report::Reporter;
use crate::source::{self, Encoding, LocationQuery};

pub mod args;
pub mod handlers;
pub mod select;

use args::Args;
use handlers::{CopyTask, Operation};

const CONTINUE_QUESTION: &str = "Do you want to continue?";

/// CLI 引数と設定ファイルを統合した実行オプション。
#[derive(Debug, Clone)]
pub struct Options {
    pub src: Option<PathBuf>,
    pub dst: PathBuf,
    pub operation: Operation,
    pub start: i64,
    pub num: i64,
    pub yes: bool,
    pub quiet: bool,
    pub color: bool,
    pub dry_run: bool,
    pub debug: bool,
    pub encoding: Encoding,
    pub query: LocationQuery,
}

impl Options {
    /// CLI 指定を優先し、未指定の値は設定ファイル、組み込み既定値の順に埋める。
    pub fn from_args(args: Args, config: &Config) -> Self {
        let defaults = &config.defaults;
        let color = if args.no_color {
            false
        } else {
            args.color.or(defaults.color).unwrap_or(true)
        };
        let query = config
            .source
            .query
            .as_deref()
            .and_then(LocationQuery::from_parts)
            .unwrap_or_else(LocationQuery::platform_default);

        Self {
            src: args.src.or_else(|| defaults.src.clone()),
            dst: args
                .dst
                .or_else(|| defaults.dst.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            operation: if args.mv {
                Operation::Move
            } else {
                Operation::Copy
            },
            start: args.start,
            num: args.num,
            yes: args.yes || defaults.yes,
            quiet: args.quiet || defaults.quiet,
            color,
            dry_run: args.dry_run,
            debug: args.debug,
            encoding: args.encoding,
            query,
        }
    }
}

/// 正常終了時の結果。いずれも終了コード 0 に対応する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed { files: Vec<PathBuf> },
    /// 実行せずに等価なシェルコマンドを返した
    DryRun(String),
    /// オプション検証エラー（全件を改行区切りで保持）
    Invalid(String),
    NoFiles,
    /// 確認プロンプトで中止された
    Aborted,
}

/// 終了コード 1 で終わるエラー。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotError {
    Source(String),
    Select(String),
    Operation { command: String, detail: String },
}

impl ShotError {
    /// `--debug` で追加表示する詳細。
    ///
    /// `Display` がすでに全文を含む `Source`/`Select` では `None`。
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Source(_) | Self::Select(_) => None,
            Self::Operation { detail, .. } => Some(detail.as_str()),
        }
    }
}

impl fmt::Display for ShotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(msg) | Self::Select(msg) => f.write_str(msg),
            Self::Operation { command, .. } => write!(f, "{command} failed"),
        }
    }
}

impl std::error::Error for ShotError {}

/// 検証・選択・確認・実行を順に行う。
pub fn run(
    options: &Options,
    prompter: &mut dyn Prompter,
    reporter: &Reporter,
) -> Result<Outcome, ShotError> {
    let src = options.src.as_deref().map(expand_home);
    let dst = expand_home(&options.dst);

    let errors = validate_options(src.as_deref(), &dst, options.start, options.num);
    if !errors.is_empty() {
        let message = errors.join("\n");
        reporter.error(&message);
        return Ok(Outcome::Invalid(message));
    }
    // 検証済みなので正の値
    let start = options.start as usize;
    let num = options.num as usize;

    let dir = source::resolve_source(src.as_deref(), &options.query, options.encoding)
        .map_err(ShotError::Source)?;
    let selected = select::select(&dir, start, num).map_err(ShotError::Select)?;

    if selected.is_empty() {
        reporter.error(&format!("No files found in {}", dir.display()));
        return Ok(Outcome::NoFiles);
    }

    if selected.len() < num {
        reporter.warning(&format!(
            "Warning: there are not enough files to copy with start:{start}, num:{num}"
        ));
        if !confirmed(options, prompter) {
            return Ok(Outcome::Aborted);
        }
    }

    let command = render_command(options.operation, &selected, &dst);
    if options.dry_run {
        return Ok(Outcome::DryRun(command));
    }

    let Some(tasks) = plan_tasks(&selected, &dst, options, prompter, reporter)
        .map_err(ShotError::Select)?
    else {
        return Ok(Outcome::Aborted);
    };

    for task in &tasks {
        handlers::execute(task, options.operation).map_err(|detail| ShotError::Operation {
            command: command.clone(),
            detail,
        })?;
    }

    let names: Vec<String> = selected
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| format!("  {}", name.to_string_lossy()))
        .collect();
    reporter.success(&format!(
        "{} the following files from {} to {} successfully!\n{}",
        options.operation.past_tense(),
        dir.display(),
        dst.display(),
        names.join("\n")
    ));

    Ok(Outcome::Completed { files: selected })
}

/// オプションの違反を全件集めて返す。問題がなければ空。
pub fn validate_options(src: Option<&Path>, dst: &Path, start: i64, num: i64) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(src) = src {
        if !src.is_dir() {
            errors.push(format!("src must be a directory. got:{}", src.display()));
        }
    }
    if num > 1 && !dst.is_dir() {
        errors.push(format!(
            "dst must be a directory when num > 1. got:{}",
            dst.display()
        ));
    }
    if start < 1 {
        errors.push(format!("start must be > 0. got:{start}"));
    }
    if num < 1 {
        errors.push(format!("num must be > 0. got:{num}"));
    }

    errors
}

/// `cp <files> <dst>` 形式の等価なシェルコマンドを組み立てる。
pub fn render_command(operation: Operation, files: &[PathBuf], dst: &Path) -> String {
    std::iter::once(operation.command().to_string())
        .chain(files.iter().map(|file| shell_quote(file)))
        .chain(std::iter::once(shell_quote(dst)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// シェルで特別な意味を持つ文字を含むパスだけをシングルクォートで囲む。
fn shell_quote(path: &Path) -> String {
    let text = path.to_string_lossy();
    let is_plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c));

    if is_plain {
        text.into_owned()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}

/// 全ファイル分の確認を先に済ませてタスクを組み立てる。
///
/// どれか一つでも拒否されたら `None` を返し、ファイルには一切触れない。
fn plan_tasks(
    selected: &[PathBuf],
    dst: &Path,
    options: &Options,
    prompter: &mut dyn Prompter,
    reporter: &Reporter,
) -> Result<Option<Vec<CopyTask>>, String> {
    let mut tasks = Vec::with_capacity(selected.len());

    for source in selected {
        if let Some((src_ext, dst_ext)) = handlers::extension_mismatch(source, dst) {
            reporter.warning(&format!(
                "Warning: src and dst extensions don't match. src: {src_ext}, dst: {dst_ext}"
            ));
            if !confirmed(options, prompter) {
                return Ok(None);
            }
        }

        let final_target = handlers::resolve_final_target(source, dst)?;
        let replace_existing = final_target.is_file();
        if replace_existing {
            reporter.warning(&format!(
                "Warning: {} already exists.",
                final_target.display()
            ));
            if !confirmed(options, prompter) {
                return Ok(None);
            }
        }

        tasks.push(CopyTask {
            source: source.clone(),
            final_target,
            replace_existing,
        });
    }

    Ok(Some(tasks))
}

fn confirmed(options: &Options, prompter: &mut dyn Prompter) -> bool {
    options.yes || prompter.confirm(CONTINUE_QUESTION)
}
