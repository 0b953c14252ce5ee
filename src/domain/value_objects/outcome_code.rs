use serde::Serialize;
use std::fmt;

/// アクションがディスパッチループに返す結果コード
///
/// 値は閉じた集合で、プロセスの終了コードとしてもそのまま使われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i32")]
pub enum OutcomeCode {
    /// 成功
    Success,
    /// 必須属性の欠落・不正（`url`が無い等）
    MissingAttribute,
    /// テンプレートの取得に失敗
    FetchFailure,
    /// テンプレート内の未解決変数
    MissingVariable,
}

impl OutcomeCode {
    /// 数値コードを取得
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::MissingAttribute => 1,
            Self::FetchFailure => 2,
            Self::MissingVariable => 3,
        }
    }

    /// 成功かどうか
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl From<OutcomeCode> for i32 {
    fn from(value: OutcomeCode) -> Self {
        value.code()
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return code {}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(OutcomeCode::Success.code(), 0);
        assert_eq!(OutcomeCode::MissingAttribute.code(), 1);
        assert_eq!(OutcomeCode::FetchFailure.code(), 2);
        assert_eq!(OutcomeCode::MissingVariable.code(), 3);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(OutcomeCode::MissingVariable.to_string(), "return code 3");
        assert_eq!(serde_json::to_string(&OutcomeCode::FetchFailure).unwrap(), "2");
    }
}
