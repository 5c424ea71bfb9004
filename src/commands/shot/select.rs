use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// 選択候補となるファイルとその作成時刻。
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub created: SystemTime,
}

/// ディレクトリ直下の通常ファイルを列挙する。隠しファイルは対象外。
///
/// 作成時刻を記録しないファイルシステムでは更新時刻で代用する。
pub fn list_candidates(dir: &Path) -> Result<Vec<Candidate>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("shot: cannot read directory '{}': {}", dir.display(), e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| format!("shot: error reading directory '{}': {}", dir.display(), e))?;

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }

        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .map_err(|e| format!("shot: cannot read timestamps of '{}': {}", path.display(), e))?;

        candidates.push(Candidate { path, created });
    }

    Ok(candidates)
}

/// 作成時刻の新しい順に並べる。同時刻はパス順。
pub fn newest_first(mut candidates: Vec<Candidate>) -> Vec<PathBuf> {
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates.sort_by(|a, b| b.created.cmp(&a.created));
    candidates.into_iter().map(|c| c.path).collect()
}

/// 1 始まりの `start` から `num` 件を切り出す。範囲外は切り詰める。
pub fn window(sorted: Vec<PathBuf>, start: usize, num: usize) -> Vec<PathBuf> {
    sorted
        .into_iter()
        .skip(start.saturating_sub(1))
        .take(num)
        .collect()
}

/// `dir` の新しい順 `start` 番目から `num` 件のファイルを返す。
pub fn select(dir: &Path, start: usize, num: usize) -> Result<Vec<PathBuf>, String> {
    let candidates = list_candidates(dir)?;
    log::debug!("found {} candidate files in {}", candidates.len(), dir.display());
    Ok(window(newest_first(candidates), start, num))
}
