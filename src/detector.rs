//! テキストの盗用判定サービス。
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::model::ArtifactStore;

/// 学習時に確定したラベル規約: 1 = 盗用あり。
/// モデルの外で決まった値なので、ここから導出はできない。
pub const PLAGIARISM_LABEL: i64 = 1;

/// 分類結果。テンプレートに出す文言は閉じた集合で固定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Plagiarism,
    Clean,
    Empty,
}

impl Verdict {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Plagiarism => "Plagiarism Detected",
            Verdict::Clean => "No Plagiarism Detected",
            Verdict::Empty => "Please enter some text.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlagiarismDetector {
    store: Arc<ArtifactStore>,
}

impl PlagiarismDetector {
    #[must_use]
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    /// 入力テキストを分類する。
    ///
    /// 空白のみの入力はモデルを呼ばずに [`Verdict::Empty`] を返す。
    /// それ以外はベクトライザで変換し、分類器の予測ラベルが
    /// [`PLAGIARISM_LABEL`] なら盗用ありと判定する。
    ///
    /// # Errors
    /// モデル層の変換・予測が失敗した場合はそのまま伝播する。
    /// ここで回復は試みない。
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        if text.trim().is_empty() {
            return Ok(Verdict::Empty);
        }

        let features = self.store.vectorizer().transform(text);
        let label = self.store.classifier().predict(&features)?;
        debug!(label, "raw classifier prediction");

        if label == PLAGIARISM_LABEL {
            Ok(Verdict::Plagiarism)
        } else {
            Ok(Verdict::Clean)
        }
    }
}
