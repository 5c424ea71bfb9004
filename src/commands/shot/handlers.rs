use std::fs;
#[cfg(unix)]
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
#[cfg(target_os = "macos")]
use trash::macos::{DeleteMethod, TrashContextExtMacos};

/// 実行する操作の種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Copy,
    Move,
}

impl Operation {
    /// 等価なシェルコマンド名を返す。
    pub fn command(self) -> &'static str {
        match self {
            Self::Copy => "cp",
            Self::Move => "mv",
        }
    }

    /// 完了メッセージで使う過去形。
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Copy => "Copied",
            Self::Move => "Moved",
        }
    }
}

/// 実行フェーズで使うコピータスク情報を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source: PathBuf,
    pub final_target: PathBuf,
    /// 既存ターゲットを置き換える確認が済んでいるか
    pub replace_existing: bool,
}

/// ソースと宛先指定から最終ターゲットを決定する。
pub fn resolve_final_target(source_path: &Path, dst: &Path) -> Result<PathBuf, String> {
    if dst.is_dir() {
        let file_name = source_path
            .file_name()
            .ok_or_else(|| format!("shot: invalid source path: '{}'", source_path.display()))?;
        Ok(dst.join(file_name))
    } else {
        Ok(dst.to_path_buf())
    }
}

/// 宛先がファイルパスのとき、拡張子が食い違えば `(src, dst)` の拡張子を返す。
///
/// 拡張子は `.png` のようにドット付き、無ければ空文字列。
pub fn extension_mismatch(source_path: &Path, dst: &Path) -> Option<(String, String)> {
    if dst.is_dir() {
        return None;
    }

    let src_ext = dotted_extension(source_path);
    let dst_ext = dotted_extension(dst);
    (src_ext != dst_ext).then_some((src_ext, dst_ext))
}

fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// タスクを実行する。既存ターゲットはゴミ箱へ移してから書き込む。
pub fn execute(task: &CopyTask, operation: Operation) -> Result<(), String> {
    ensure_not_same_file(&task.source, &task.final_target)?;

    if task.replace_existing && task.final_target.is_file() {
        move_existing_target_to_trash(&task.final_target)?;
    }

    log::debug!(
        "{} {} -> {}",
        operation.command(),
        task.source.display(),
        task.final_target.display()
    );

    match operation {
        Operation::Copy => fs::copy(&task.source, &task.final_target)
            .map(|_| ())
            .map_err(|e| {
                format!(
                    "shot: cannot copy '{}' to '{}': {}",
                    task.source.display(),
                    task.final_target.display(),
                    e
                )
            }),
        Operation::Move => move_file(&task.source, &task.final_target),
    }
}

/// ソースと最終ターゲットが同一実体かを判定し、同一ならエラーにする。
fn ensure_not_same_file(source_path: &Path, final_target: &Path) -> Result<(), String> {
    let target_meta = match fs::metadata(final_target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(format!(
                "shot: cannot access '{}': {}",
                final_target.display(),
                e
            ));
        }
    };

    let source_meta = fs::metadata(source_path)
        .map_err(|e| format!("shot: cannot access '{}': {}", source_path.display(), e))?;

    #[cfg(unix)]
    let same = source_meta.dev() == target_meta.dev() && source_meta.ino() == target_meta.ino();

    #[cfg(not(unix))]
    let same = {
        let _ = (&source_meta, &target_meta);
        match (source_path.canonicalize(), final_target.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    };

    if same {
        return Err(format!(
            "shot: '{}' and '{}' are the same file",
            source_path.display(),
            final_target.display()
        ));
    }

    Ok(())
}

/// rename で移動し、別ファイルシステム間ならコピー後に元を削除する。
fn move_file(source_path: &Path, final_target: &Path) -> Result<(), String> {
    match fs::rename(source_path, final_target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            log::debug!("rename crosses devices, copying {}", source_path.display());
            copy_then_remove(source_path, final_target)
        }
        Err(e) => Err(move_error(source_path, final_target, e)),
    }
}

/// rename できない場合の移動。コピーに失敗したら元ファイルは残す。
fn copy_then_remove(source_path: &Path, final_target: &Path) -> Result<(), String> {
    fs::copy(source_path, final_target)
        .map_err(|e| move_error(source_path, final_target, e))?;
    fs::remove_file(source_path).map_err(|e| move_error(source_path, final_target, e))
}

fn move_error(source_path: &Path, final_target: &Path, e: std::io::Error) -> String {
    format!(
        "shot: cannot move '{}' to '{}': {}",
        source_path.display(),
        final_target.display(),
        e
    )
}

/// 既存ターゲットをシステムのゴミ箱へ移動する。
fn move_existing_target_to_trash(target: &Path) -> Result<(), String> {
    log::debug!("moving existing {} to trash", target.display());

    #[cfg(target_os = "macos")]
    {
        // Finder 経由の削除は権限ダイアログを誘発しうるため NsFileManager を使う。
        let mut context = trash::TrashContext::new();
        context.set_delete_method(DeleteMethod::NsFileManager);
        context
            .delete(target)
            .map_err(|e| format!("shot: failed to move existing file to trash: {e}"))
    }

    #[cfg(not(target_os = "macos"))]
    {
        trash::delete(target)
            .map_err(|e| format!("shot: failed to move existing file to trash: {e}"))
    }
}
